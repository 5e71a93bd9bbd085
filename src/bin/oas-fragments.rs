//! oas-fragments - split an OpenAPI document into fragments and merge them back.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use oas_fragments::{Config, Merger, OutputFormat, SectionTable, Splitter};

#[derive(Debug, Parser)]
#[command(name = "oas-fragments", version, about)]
struct Cli {
    /// YAML file with settings (extension, outputFileName, outputFormat)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split a document into a directory of fragments
    Split {
        /// The document to split
        input: PathBuf,
        /// Directory that receives the section directories
        out_dir: PathBuf,
    },
    /// Merge a directory of fragments into one document
    Merge {
        /// Root of the fragment tree
        root: PathBuf,
        /// Name of the merged file, written inside ROOT
        #[arg(short, long)]
        output: Option<String>,
        /// Output encoding
        #[arg(long)]
        format: Option<OutputFormat>,
    },
}

fn init_logger(verbose: bool) {
    let default = if verbose {
        "oas_fragments=debug,info"
    } else {
        "oas_fragments=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::from_yaml_file(path)?,
        None => Config::default(),
    };
    let table = SectionTable::openapi();

    match cli.command {
        Command::Split { input, out_dir } => {
            let report = Splitter::new(table, &config).split_file(&input, &out_dir)?;
            println!(
                "Split {} into {} ({} files)",
                input.display(),
                out_dir.display(),
                report.written.len()
            );
            for key in &report.dropped {
                println!("  dropped: {}", key);
            }
            for collision in &report.collisions {
                println!(
                    "  collision: {} ({} overwritten by {})",
                    collision.path.display(),
                    collision.overwritten,
                    collision.by
                );
            }
        }
        Command::Merge { root, output, format } => {
            if let Some(format) = format {
                config.output_format = format;
            }
            let output = output.unwrap_or_else(|| config.output_file_name.clone());
            let report = Merger::new(table, &config).merge(&root, &output)?;
            println!(
                "Merged {} fragments into {}",
                report.merged.len(),
                root.join(&output).display()
            );
            for bad in &report.malformed {
                println!("  skipped: {}", bad);
            }
        }
    }

    Ok(())
}
