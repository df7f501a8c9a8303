//! mergebot - merge branches into develop from chat

mod cli;

use anstream::eprintln;
use clap::{Parser, Subcommand};
use cli::chat::{ChatOptions, run_chat};
use cli::merge::{MergeOptions, run_merge};
use cli::style::Stylize;
use merge_bot::chat::DEFAULT_PREFIX;
use merge_bot::types::MergeRequest;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mergebot")]
#[command(about = "Merge branches into develop from chat, the same way every time")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "MERGEBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log git invocations and merge progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a branch into the target branch of a project
    Merge {
        /// Branch to merge
        #[arg(long = "branch-name")]
        branch_name: String,

        /// Project to merge in
        #[arg(long = "project-name")]
        project_name: String,

        /// Full name recorded as the person authorizing the merge
        #[arg(long = "user-name", env = "MERGEBOT_USER")]
        user_name: String,

        /// Show the plan without touching any working copy
        #[arg(long)]
        dry_run: bool,

        /// Preview the plan and prompt for confirmation
        #[arg(long)]
        confirm: bool,

        /// Print the merge report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clone every configured project that has no working copy yet
    Setup,

    /// Read chat commands from stdin and reply on stdout
    Chat {
        /// Chat handle of the sender
        #[arg(long, env = "USER", default_value = "operator")]
        username: String,

        /// Full name of the sender, recorded in merge commits
        #[arg(long = "user-name", env = "MERGEBOT_USER")]
        user_name: Option<String>,

        /// Prefix marking a message as a command
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print a configuration template
    Template {
        /// Write the template to this path instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration and summarize it
    Check,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "merge_bot=debug,mergebot=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Merge {
            branch_name,
            project_name,
            user_name,
            dry_run,
            confirm,
            json,
        } => {
            let request = MergeRequest::new(project_name, branch_name, user_name);
            run_merge(
                config,
                request,
                MergeOptions {
                    dry_run,
                    confirm,
                    json,
                },
            )
            .await?;
        }
        Commands::Setup => cli::setup::run_setup(config).await?,
        Commands::Chat {
            username,
            user_name,
            prefix,
        } => {
            run_chat(
                config,
                ChatOptions {
                    username,
                    full_name: user_name,
                    prefix,
                },
            )
            .await?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Template { output } => cli::config::run_template(output.as_deref())?,
            ConfigCommands::Check => cli::config::run_check(config)?,
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".error());
            ExitCode::FAILURE
        }
    }
}
