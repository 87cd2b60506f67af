use std::path::Path;

use anyhow::Result;

use super::{output_path, read_bundle, write_bundle};

/// Rewrite a bundle with its streams compressed or not. Does nothing if it's already in that state.
pub fn set_compression(path: &Path, compressed: bool, output: Option<&Path>) -> Result<()> {
    let mut bundle = read_bundle(path)?;

    if bundle.compressed == compressed {
        let state = if compressed { "is" } else { "isn't" };
        tracing::info!("The bundle already {state} compressed");
        return Ok(());
    }

    bundle.compressed = compressed;

    let output = output_path(path, output);
    write_bundle(&bundle, &output)?;
    tracing::info!("Saved bundle to {output:?}");

    Ok(())
}
