mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "esglens",
    version,
    about = "Find ESG framework evidence in sustainability report PDFs"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a PDF and list the frameworks it provides evidence for
    Analyze {
        /// Path to the PDF file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the result document to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Custom framework catalog (JSON) instead of the builtin one
        #[arg(short, long = "frameworks", value_name = "FILE")]
        frameworks: Option<PathBuf>,

        /// Skip the OCR fallback even when selectable text is insufficient
        #[arg(long)]
        no_ocr: bool,
    },
    /// Convert a saved result document into the export format
    Export {
        /// Result JSON written by `esglens analyze --out`
        results_file: PathBuf,

        /// Output file, or directory for a generated file name (default: stdout)
        #[arg(short = 'O', long = "out", value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Inspect and validate framework catalogs
    Frameworks {
        #[command(subcommand)]
        action: FrameworksAction,
    },
}

#[derive(Subcommand)]
enum FrameworksAction {
    /// List the builtin frameworks
    List,
    /// Show the keywords and category of one framework
    Explain {
        /// Framework name (case-insensitive)
        name: String,
    },
    /// Print the catalog JSON schema with field descriptions and example
    Schema,
    /// Validate a custom catalog file
    Validate {
        /// Path to JSON catalog file
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            input_file,
            output,
            out,
            frameworks,
            no_ocr,
        } => commands::analyze::run(input_file, &output, out, frameworks, no_ocr),
        Commands::Export { results_file, out } => commands::export::run(results_file, out),
        Commands::Frameworks { action } => match action {
            FrameworksAction::List => commands::frameworks::list(),
            FrameworksAction::Explain { name } => commands::frameworks::explain(&name),
            FrameworksAction::Schema => commands::frameworks::schema(),
            FrameworksAction::Validate { file } => commands::frameworks::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
