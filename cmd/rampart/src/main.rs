//! Rampart CLI - firewall policy ordering and analysis.
//!
//! Commands:
//! - `rampart order` - Compute the effective processing order
//! - `rampart analyze` - Report duplicates, conflicts and warnings
//! - `rampart show` - List ordered rules, optionally filtered

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rampart")]
#[command(about = "Firewall policy ordering engine and rule analyzer")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the processing order of a policy
    Order {
        /// Path to the policy JSON file
        #[arg(short, long, default_value = "policy.json")]
        policy: String,

        /// Path to a parent policy JSON file
        #[arg(long)]
        parent: Option<String>,

        /// Output format (json or yaml)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Analyze a policy for duplicate and conflicting rules
    Analyze {
        /// Path to the policy JSON file
        #[arg(short, long, default_value = "policy.json")]
        policy: String,

        /// Path to a parent policy JSON file
        #[arg(long)]
        parent: Option<String>,

        /// Where Allow/Deny is read from (declared or inferred)
        #[arg(long, default_value = "declared")]
        action_source: String,

        /// Fail on warnings (not just high-severity conflicts)
        #[arg(long)]
        strict: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List ordered rules
    Show {
        /// Path to the policy JSON file
        #[arg(short, long, default_value = "policy.json")]
        policy: String,

        /// Path to a parent policy JSON file
        #[arg(long)]
        parent: Option<String>,

        /// Only show rules of this category (dnat, network, application)
        #[arg(short, long)]
        category: Option<String>,

        /// Show a single rule by id
        #[arg(long, conflicts_with = "category")]
        id: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Order {
            policy,
            parent,
            format,
            output,
        } => commands::order::run(&policy, parent.as_deref(), &format, output.as_deref()),
        Commands::Analyze {
            policy,
            parent,
            action_source,
            strict,
            json,
        } => commands::analyze::run(&policy, parent.as_deref(), &action_source, strict, json),
        Commands::Show {
            policy,
            parent,
            category,
            id,
        } => commands::show::run(&policy, parent.as_deref(), category.as_deref(), id.as_deref()),
    }
}
