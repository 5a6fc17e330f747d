//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;

use crate::core::app::App;
use crate::core::chat_stream::ChatBackend;
use crate::core::config::{
    credential_from_env, path_display, Config, ConfigKey, Overrides, Settings,
};
use crate::core::error::ConfigurationError;
use crate::core::gemini::{GeminiClient, BASE_URL_ENV};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "shadowcoder")]
#[command(version)]
#[command(about = "A terminal chat client for the Gemini API")]
#[command(
    long_about = "ShadowCoder is a full-screen terminal chat interface for Google's Gemini models. \
Replies stream into the transcript as they are generated.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    Your Gemini API key (required)\n\
  GEMINI_BASE_URL   Custom API base URL (optional)\n\
  SHADOWCODER_LOG   Log filter used with --debug-log (defaults to info)\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down           Scroll one line\n\
  PageUp/PageDown   Scroll one page\n\
  End               Jump to the newest message\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use instead of the configured default
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// API base URL, overriding GEMINI_BASE_URL and the config file
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single prompt and stream the reply to stdout
    Say {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set a configuration value (model, base-url, locale, system-instruction)
    Set {
        key: String,
        /// Value to set; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        value: Vec<String>,
    },
    /// Remove a configuration value
    Unset { key: String },
    /// Print the current configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.debug_log.as_deref())?;
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let overrides = Overrides {
        model: args.model,
        base_url: args.base_url,
    };

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let (settings, backend) = prepare_or_exit(&overrides);
            let app = App::new(backend, settings.model, settings.locale);
            run_chat(app).await
        }
        Commands::Say { prompt } => {
            let (settings, backend) = prepare_or_exit(&overrides);
            say::run_say(prompt, backend, settings.locale).await
        }
        Commands::Set { key, value } => {
            let key: ConfigKey = key.parse()?;
            let value = value.join(" ");
            let mut config = Config::load()?;
            config.set(key, &value)?;
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let key: ConfigKey = key.parse()?;
            let mut config = Config::load()?;
            config.unset(key);
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Config => {
            let path = Config::config_path()?;
            let config = Config::load_from_path(&path)?;
            println!("Current configuration ({}):", path_display(&path));
            for line in config.describe() {
                println!("  {line}");
            }
            Ok(())
        }
    }
}

/// Resolves settings and builds the client. Runs before the terminal is
/// touched so configuration problems print plainly.
fn prepare(overrides: &Overrides) -> Result<(Settings, Arc<dyn ChatBackend>), ConfigurationError> {
    let api_key = credential_from_env()?;
    let config = Config::load()?;
    let settings = config.resolve(overrides, std::env::var(BASE_URL_ENV).ok());
    let client = GeminiClient::new(settings.client_config(api_key));
    Ok((settings, Arc::new(client)))
}

fn prepare_or_exit(overrides: &Overrides) -> (Settings, Arc<dyn ChatBackend>) {
    match prepare(overrides) {
        Ok(prepared) => prepared,
        Err(err) => {
            error!(%err, "startup failed");
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}
