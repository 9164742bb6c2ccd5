//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use synth_git::environment::EnvMap;
use synth_git::output::OutputConfig;

/// Synthetic Git - Generate deterministic multi-repository git history datasets
#[derive(Parser, Debug)]
#[command(name = "synth-git")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the synthetic repositories and JSON datasets, optionally pushing them
    Generate(commands::generate::GenerateArgs),

    /// Show the branch and (masked) remote a push would use
    Remote(commands::remote::RemoteArgs),

    /// Print the built-in plan as YAML
    Plan(commands::plan::PlanArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let env = EnvMap::from_process();
        let out = OutputConfig::from_env_and_flag(&self.color, &env);

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args, &env, out),
            Commands::Remote(args) => commands::remote::execute(args, &env, out),
            Commands::Plan(args) => commands::plan::execute(args),
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A second init (e.g. in tests) is harmless
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
