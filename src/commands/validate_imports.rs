use std::{
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use super::read_bundle;
use crate::file_parsers::bnd2::Bundle;

/// Load dependency bundles in parallel. Any failure aborts the whole check.
fn read_dependencies(paths: &[PathBuf]) -> Result<Vec<Bundle>> {
    paths
        .par_iter()
        .map(|path| read_bundle(path))
        .collect::<Result<Vec<_>>>()
}

/// Print every import that can't be resolved from the bundle or its dependencies
pub fn validate_imports(path: &Path, dependencies: &[PathBuf]) -> Result<()> {
    let bundle = read_bundle(path)?;
    let dependencies = read_dependencies(dependencies)?;
    tracing::info!("Loaded {} external dependencies", dependencies.len());

    let missing = bundle.get_missing_imports(&dependencies);

    let mut stdout = BufWriter::new(io::stdout().lock());
    if missing.is_empty() {
        writeln!(stdout, "No missing imports.").context("Failed to write to stdout")?;
    } else {
        writeln!(stdout, "Missing imports:").context("Failed to write to stdout")?;
        for import in missing {
            writeln!(
                stdout,
                "{:08X} (patch offset {:#X})",
                import.target_id, import.patch_offset
            )
            .context("Failed to write to stdout")?;
        }
    }

    stdout.flush().context("Failed to flush stdout")
}
