use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::config::ConfigAction;
use commands::GlobalOptions;
use droid_doctor::OutputFormat;

/// droid-doctor - Android SDK health check
/// Verifies installed build-tools against android/build.gradle.
#[derive(Parser)]
#[command(name = "droid-doctor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Project root (defaults to the nearest directory with package.json)
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,

    /// Read environment info from an envinfo JSON file instead of detecting it
    #[arg(long, global = true)]
    env_info: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the required Android build-tools are installed
    Doctor,

    /// Show how to install the missing Android SDK components
    Fix,

    /// Show the detected Android SDK environment
    Env,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Create default .droid-doctor.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Validate configuration file
    Validate,
}

/// Logs go to stderr so JSON on stdout stays parseable.
///
/// `--debug` wins over `RUST_LOG`; the default level is WARN.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("droid_doctor=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("droid_doctor=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let format = OutputFormat::from_str(&cli.format);
    let is_json = format == OutputFormat::Json;

    let options = GlobalOptions {
        project_root: cli.project_root,
        env_info: cli.env_info,
    };

    if !is_json {
        println!("{}", "🤖 droid-doctor".bold().green());
        println!("{}", "Android SDK Doctor".dimmed());
        println!();
    }

    let result = match cli.command {
        Commands::Doctor => commands::doctor::run(&options, format).await,
        Commands::Fix => commands::fix::run(&options, format).await,
        Commands::Env => commands::env::run(&options, format),
        Commands::Config { action } => {
            let config_action = match action {
                ConfigCommands::Init { force } => ConfigAction::Init { force },
                ConfigCommands::Validate => ConfigAction::Validate,
            };
            commands::config::run(config_action, &options, format)
        }
    };

    if let Err(e) = result {
        if is_json {
            let error_output = serde_json::json!({
                "success": false,
                "error": e.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            });
            eprintln!("{}", serde_json::to_string_pretty(&error_output).unwrap_or_default());
        } else {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
        }
        std::process::exit(1);
    }
}
