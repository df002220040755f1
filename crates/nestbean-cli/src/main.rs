//! nestbean CLI
//!
//! Command-line interface for turning flat JSON rows into nested beans

use clap::{Parser, Subcommand, ValueEnum};
use nestbean_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "nestbean")]
#[command(about = "nestbean - flat tuples into nested beans", long_about = None)]
struct Cli {
    /// Logging profile (logs go to stderr; RUST_LOG overrides the level)
    #[arg(long, global = true, value_enum, default_value_t = LogProfile::Production)]
    log_profile: LogProfile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogProfile {
    Development,
    Production,
}

impl From<LogProfile> for Profile {
    fn from(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Development => Profile::Development,
            LogProfile::Production => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Transform JSON rows into nested beans of a catalog class
    Transform(commands::transform::TransformArgs),
    /// Print the combined field table of a catalog class
    Describe(commands::describe::DescribeArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile.into());

    let result = match cli.command {
        Commands::Transform(args) => commands::transform::execute(args),
        Commands::Describe(args) => commands::describe::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
