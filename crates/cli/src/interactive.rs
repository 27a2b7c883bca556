//! Menu-driven interactive session.

use std::io::{BufRead, Write};

use chrono::{DateTime, Local};
use greeter::{Clock, Engine, HistoryEntry, StatisticsSnapshot};
use tracing::{debug, info, warn};

use crate::error::Result;

const MENU: &str = "
Choose an option:
1. Standard greeting
2. Multi-language greeting
3. Time-based greeting
4. Custom message
5. Show greeting statistics
6. Show greeting history
7. Clear greeting history
8. Reload configuration
9. Exit";

/// Drives an [`Engine`] from line-based input.
pub struct Interactive<'a, C, R, W> {
    engine: &'a mut Engine<C>,
    input: R,
    output: W,
    json: bool,
}

impl<'a, C: Clock, R: BufRead, W: Write> Interactive<'a, C, R, W> {
    pub fn new(engine: &'a mut Engine<C>, input: R, output: W) -> Self {
        Self {
            engine,
            input,
            output,
            json: false,
        }
    }

    /// Print statistics and history as JSON.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        let app = self.engine.config().app_info();
        writeln!(self.output, "\n🌟 Welcome to {} v{} 🌟", app.name, app.version)?;

        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("\nEnter your choice (1-9): ")? else {
                break;
            };
            debug!(%choice, "menu selection");

            match choice.as_str() {
                "1" => self.standard()?,
                "2" => self.multilang()?,
                "3" => self.time_based()?,
                "4" => self.custom()?,
                "5" => self.statistics()?,
                "6" => self.history()?,
                "7" => self.clear_history()?,
                "8" => self.reload()?,
                "9" | "q" | "quit" | "exit" => break,
                other => {
                    warn!(choice = other, "invalid menu choice");
                    writeln!(self.output, "❌ Invalid choice. Please try again.")?;
                }
            }
        }

        info!("interactive session ended by user");
        writeln!(self.output, "\nGoodbye! 👋")?;
        Ok(())
    }

    /// Print `text` and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_name(&mut self) -> Result<Option<String>> {
        self.prompt("Enter your name (or press Enter for default): ")
    }

    fn standard(&mut self) -> Result<()> {
        let name = self.prompt_name()?.unwrap_or_default();
        let greeting = self.engine.standard_greeting(Some(&name));
        writeln!(self.output, "\n✨ {greeting}")?;
        Ok(())
    }

    fn multilang(&mut self) -> Result<()> {
        let languages = self.engine.available_languages();
        writeln!(self.output, "\nAvailable languages: {}", languages.join(", "))?;

        let code = self.prompt("Enter language code: ")?.unwrap_or_default();
        let name = self.prompt_name()?.unwrap_or_default();

        match self.engine.multilang_greeting(Some(&name), &code) {
            Ok(greeting) => writeln!(self.output, "\n✨ {greeting}")?,
            Err(e) => writeln!(self.output, "❌ {e}")?,
        }
        Ok(())
    }

    fn time_based(&mut self) -> Result<()> {
        let name = self.prompt_name()?.unwrap_or_default();
        let greeting = self.engine.time_based_greeting(Some(&name));
        writeln!(self.output, "\n✨ {greeting}")?;
        Ok(())
    }

    fn custom(&mut self) -> Result<()> {
        let message = self.prompt("Enter your custom message: ")?.unwrap_or_default();
        match self.engine.process_custom_message(&message) {
            Ok(result) => writeln!(self.output, "\n{result}")?,
            Err(e) => writeln!(self.output, "❌ {e}")?,
        }
        Ok(())
    }

    fn statistics(&mut self) -> Result<()> {
        let stats = self.engine.statistics();
        if self.json {
            writeln!(self.output, "{}", serde_json::to_string_pretty(&stats)?)?;
        } else {
            print_statistics(&mut self.output, &stats)?;
        }
        Ok(())
    }

    fn history(&mut self) -> Result<()> {
        let history = self.engine.history();
        if self.json {
            writeln!(self.output, "{}", serde_json::to_string_pretty(&history)?)?;
            return Ok(());
        }

        if history.is_empty() {
            writeln!(self.output, "\nNo greetings yet.")?;
            return Ok(());
        }
        writeln!(self.output, "\n📜 Greeting History:")?;
        for entry in &history {
            print_entry(&mut self.output, entry)?;
        }
        Ok(())
    }

    fn clear_history(&mut self) -> Result<()> {
        let answer = self.prompt("Clear greeting history? [y/N]: ")?.unwrap_or_default();
        if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
            self.engine.clear_history();
            writeln!(self.output, "History cleared.")?;
        } else {
            writeln!(self.output, "History kept.")?;
        }
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        match self.engine.config_mut().reload() {
            Ok(()) => writeln!(self.output, "Configuration reloaded.")?,
            Err(e) => {
                warn!(error = %e, "configuration reload failed");
                writeln!(self.output, "❌ {e}")?;
            }
        }
        Ok(())
    }
}

fn print_statistics(out: &mut impl Write, stats: &StatisticsSnapshot) -> Result<()> {
    let c = &stats.counters;
    writeln!(out, "\n📊 Greeting Statistics:")?;
    writeln!(out, "  total_greetings: {}", c.total_greetings)?;
    writeln!(out, "  standard_greetings: {}", c.standard_greetings)?;
    writeln!(out, "  multilang_greetings: {}", c.multilang_greetings)?;
    writeln!(out, "  time_based_greetings: {}", c.time_based_greetings)?;
    writeln!(out, "  custom_messages: {}", c.custom_messages)?;
    for (code, count) in &c.language_usage {
        writeln!(out, "  language_usage.{code}: {count}")?;
    }
    writeln!(out, "  session_start: {}", timestamp(&stats.session_start))?;
    writeln!(out, "  session_duration_minutes: {}", stats.session_duration_minutes())?;
    Ok(())
}

fn print_entry(out: &mut impl Write, entry: &HistoryEntry) -> Result<()> {
    let time = entry.timestamp.format("%H:%M:%S");
    match &entry.language {
        Some(code) => writeln!(out, "[{time}] {} ({code}): {}", entry.kind, entry.text)?,
        None => writeln!(out, "[{time}] {}: {}", entry.kind, entry.text)?,
    }
    Ok(())
}

fn timestamp(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}
