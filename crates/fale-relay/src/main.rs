// Copyright 2026 Fale Relay Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use fale_relay::cli;
use fale_relay::config::ConfigArgs;

#[derive(Parser)]
#[command(
    name = "fale-relay",
    about = "Fale relay — fetch a page and rewrite Yale to Fale in its text",
    version,
    after_help = "Run 'fale-relay <command> --help' for details on each command.\nRun 'fale-relay' with no command to start the server."
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Fetch a single URL, rewrite it and print the result
    Fetch {
        /// URL to fetch
        url: String,
        /// Print the full JSON reply instead of the markup
        #[arg(long)]
        json: bool,
    },
    /// Rewrite a local HTML file ("-" for stdin) and print the result
    Rewrite {
        /// Path to the HTML file
        path: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = match cli.command {
        None | Some(Commands::Serve) => cli::serve::run(&cli.config).await,
        Some(Commands::Fetch { url, json }) => cli::fetch_cmd::run(&url, json, &cli.config).await,
        Some(Commands::Rewrite { path }) => cli::rewrite_cmd::run(&path),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "fale-relay", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}
