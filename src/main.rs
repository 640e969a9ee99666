use anyhow::Context;
use clap::{Parser, Subcommand};
use plot_inventory::cli;
use plot_inventory::types::ReportConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plot-inventory")]
#[command(about = "Plant counts per plot from spreadsheet CSV exports")]
#[command(long_about = "Plot Inventory - plant counts from spreadsheet CSV exports

INPUT LAYOUT:
  Row 0:  domain tag, label, then one numeric header per plot (1, 2, 3, ...)
  Row 1:  dates (ignored)
  Row 2+: category, plant name, then one count per plot

  A cell counts as planted when it holds an integer greater than zero.
  Blank cells, \"0\" and non-numeric text are treated as empty.

COMMANDS:
  analyze    - Plots with plants, totals, top plants and plots
  lookup     - Count of one plant in one plot
  normalize  - Rewrite the CSV with \"0\" cells blanked out
  inspect    - Row/column counts and cell statistics

EXAMPLES:
  plot-inventory analyze plants.csv
  plot-inventory lookup plants.csv mango 8
  plot-inventory normalize plants.csv processed.csv

Missing or invalid input files print a diagnostic and exit normally.
Set RUST_LOG=plot_inventory=debug for parse details on stderr.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count plots with plants and total plants per plot and per plant
    Analyze {
        /// Path to the inventory CSV export
        input: PathBuf,

        /// Length of the top plants / top plots rankings
        #[arg(long, default_value = "10")]
        top: usize,

        /// Plot numbers listed before the list is cut short
        #[arg(long, default_value = "20")]
        plot_limit: usize,

        /// Print the structured report as JSON instead
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Find how many of a plant are in a plot.

The plant name is matched case-insensitively as a substring of the plant
column; the first matching row wins. Other matching rows are listed as a
warning so duplicates do not go unnoticed.

EXAMPLE:
  plot-inventory lookup plants.csv mango 8")]
    /// Find the count of one plant in one plot
    Lookup {
        /// Path to the inventory CSV export
        input: PathBuf,

        /// Plant name or part of it (case-insensitive)
        plant: String,

        /// Plot number
        plot: u32,
    },

    #[command(long_about = "Rewrite the CSV with every \"0\" cell blanked out.

All other cells, and the shape of every row, are kept as-is.
With OUTPUT the file is saved and a summary is printed; without it the
normalized CSV is written to stdout.")]
    /// Treat "0" cells as empty and write the result
    Normalize {
        /// Path to the inventory CSV export
        input: PathBuf,

        /// Where to save the normalized CSV (stdout when omitted)
        output: Option<PathBuf>,
    },

    /// Show row/column counts, cell statistics and categories
    Inspect {
        /// Path to the inventory CSV export
        input: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "plot_inventory=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            top,
            plot_limit,
            json,
        } => {
            let config = ReportConfig {
                plot_list_limit: plot_limit,
                top_n: top,
            };
            cli::analyze(input.clone(), config, json)
                .with_context(|| format!("Failed to analyze {}", input.display()))
        }

        Commands::Lookup { input, plant, plot } => cli::lookup(input.clone(), plant, plot)
            .with_context(|| format!("Failed to search {}", input.display())),

        Commands::Normalize { input, output } => cli::normalize(input.clone(), output)
            .with_context(|| format!("Failed to normalize {}", input.display())),

        Commands::Inspect { input } => cli::inspect(input.clone())
            .with_context(|| format!("Failed to inspect {}", input.display())),
    }
}
