use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use bnd2_tools::commands::{
    IdPair, compression::set_compression, dump_debug::dump_debug_data, info::bundle_info,
    rename::rename_resources, validate_imports::validate_imports,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a JSON summary of the bundle's resources
    Info,
    /// Change resource IDs, rewriting every import that references them
    Rename {
        /// OLD:NEW pairs of hex resource IDs, applied in order
        #[arg(long = "id", required = true, num_args = 1..)]
        ids: Vec<IdPair>,

        /// Drop the bundle's debug data
        #[arg(long, default_value_t = false)]
        strip_debug: bool,

        /// Path to write the bundle to, defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rewrite the bundle with uncompressed streams
    Decompress {
        /// Path to write the bundle to, defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rewrite the bundle with zlib compressed streams
    Compress {
        /// Path to write the bundle to, defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the bundle's debug data to a side file
    DumpDebug {
        /// Defaults to <bundle>_debug.xml next to the bundle
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List imports that can't be resolved from the bundle or its dependencies
    ValidateImports {
        /// Bundles that may provide the external resources
        #[arg(long, num_args = 1..)]
        deps: Vec<PathBuf>,
    },
}

/// Tools for inspecting and editing bnd2 resource bundles.
#[derive(Parser, Debug)]
#[command(name = "bnd2_tools")]
#[clap(version)]
struct Cli {
    /// Path to the bundle to operate on
    bundle: PathBuf,

    /// Debug logging of the bundle layout. RUST_LOG takes precedence.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Validates user input
fn parse_args() -> Result<Cli> {
    let cli = Cli::parse();

    ensure!(cli.bundle.is_file(), "Bundle {:?} doesn't exist", cli.bundle);
    if let Command::ValidateImports { deps } = &cli.command {
        for dep in deps {
            ensure!(dep.is_file(), "Dependency {dep:?} doesn't exist");
        }
    }

    Ok(cli)
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = args.bundle.as_path();
    match args.command {
        Command::Info => bundle_info(path).context("Info command failed")?,
        Command::Rename {
            ids,
            strip_debug,
            output,
        } => rename_resources(path, &ids, strip_debug, output.as_deref())
            .context("Rename command failed")?,
        Command::Decompress { output } => {
            set_compression(path, false, output.as_deref()).context("Decompress command failed")?
        }
        Command::Compress { output } => {
            set_compression(path, true, output.as_deref()).context("Compress command failed")?
        }
        Command::DumpDebug { output } => {
            dump_debug_data(path, output.as_deref()).context("Dump Debug command failed")?
        }
        Command::ValidateImports { deps } => {
            validate_imports(path, &deps).context("Validate Imports command failed")?
        }
    }

    Ok(())
}
