mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "carbon",
    version,
    about = "Carbon emissions calculator for construction projects"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate emissions for a project input (JSON or XLSX bill of quantities)
    Calculate {
        /// Path to JSON or XLSX input file
        input_file: PathBuf,

        /// Predefined factor table: global, au (default: global)
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Custom JSON factor table (overrides --preset)
        #[arg(short, long = "factors", value_name = "FILE")]
        factors: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show per-line factors and reasoning
        #[arg(long)]
        verbose: bool,

        /// Include the calculation trace in JSON output
        #[arg(long)]
        trace: bool,
    },
    /// Parse an input file into canonical line items (without calculating)
    Parse {
        /// Path to JSON or XLSX input file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Check an input file and its calculated result for problems
    Validate {
        /// Path to JSON or XLSX input file
        input_file: PathBuf,

        /// Predefined factor table: global, au (default: global)
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Custom JSON factor table (overrides --preset)
        #[arg(short, long = "factors", value_name = "FILE")]
        factors: Option<PathBuf>,
    },
    /// Manage and inspect emission factor tables
    Factors {
        #[command(subcommand)]
        action: FactorsAction,
    },
}

#[derive(Subcommand)]
enum FactorsAction {
    /// List predefined factor tables
    List,
    /// Show every factor in a table
    Explain {
        /// Preset name (e.g., "global")
        preset: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom factor table file
    Validate {
        /// Path to JSON factor table
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Calculate {
            input_file,
            preset,
            factors,
            output,
            verbose,
            trace,
        } => commands::calculate::run(input_file, preset, factors, &output, verbose, trace),
        Commands::Parse {
            input_file,
            output,
            out,
        } => commands::parse::run(input_file, &output, out),
        Commands::Validate {
            input_file,
            preset,
            factors,
        } => commands::validate::run(input_file, preset, factors),
        Commands::Factors { action } => match action {
            FactorsAction::List => commands::factors::list(),
            FactorsAction::Explain { preset } => commands::factors::explain(&preset),
            FactorsAction::Schema => commands::factors::schema(),
            FactorsAction::Validate { file } => commands::factors::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
