mod error;
mod interactive;

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use greeter::Engine;
use settings::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::Result;
use interactive::Interactive;

const DEFAULT_CONFIG: &str = "config/settings.toml";

#[derive(Parser)]
#[command(name = "greet")]
#[command(about = "Templated greetings with session statistics", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (TOML). Built-in defaults are used when the default
    /// path does not exist.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu
    Interactive {
        /// Show statistics and history as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a standard greeting
    Hello {
        /// Name to greet
        name: Option<String>,
    },
    /// Print a greeting in another language
    Lang {
        /// Language code (en, es, fr, ...)
        code: String,
        /// Name to greet
        name: Option<String>,
    },
    /// Print a greeting for the current time of day
    Time {
        /// Name to greet
        name: Option<String>,
    },
    /// Decorate a custom message
    Custom {
        /// Message text
        message: String,
    },
    /// List configured language codes
    Languages,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.verbose || config.is_debug_enabled());
    match config.source() {
        Some(path) => info!(path = %path.display(), "using settings file"),
        None => info!("using built-in settings"),
    }

    let mut engine = Engine::new(config, tracing::info_span!("greeter"));

    match cli.command {
        Some(Commands::Interactive { json }) => cmd_interactive(&mut engine, json),
        None => cmd_interactive(&mut engine, false),
        Some(Commands::Hello { name }) => {
            println!("{}", engine.standard_greeting(name.as_deref()));
            Ok(())
        }
        Some(Commands::Lang { code, name }) => {
            println!("{}", engine.multilang_greeting(name.as_deref(), &code)?);
            Ok(())
        }
        Some(Commands::Time { name }) => {
            println!("{}", engine.time_based_greeting(name.as_deref()));
            Ok(())
        }
        Some(Commands::Custom { message }) => {
            println!("{}", engine.process_custom_message(&message)?);
            Ok(())
        }
        Some(Commands::Languages) => {
            for code in engine.available_languages() {
                println!("{code}");
            }
            Ok(())
        }
    }
}

fn cmd_interactive(engine: &mut Engine, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Interactive::new(engine, stdin.lock(), stdout.lock())
        .with_json(json)
        .run()
}

/// Load settings from `path`, or from the default location if present.
fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Ok(Config::load(path)?);
    }

    let default = Path::new(DEFAULT_CONFIG);
    if default.exists() {
        Ok(Config::load(default)?)
    } else {
        Ok(Config::builtin())
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
