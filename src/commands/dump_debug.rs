use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::read_bundle;

/// bundle.bin -> bundle_debug.xml
pub fn debug_data_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{stem}_debug.xml"))
}

/// Write a bundle's debug data to a side file
pub fn dump_debug_data(path: &Path, output: Option<&Path>) -> Result<()> {
    let bundle = read_bundle(path)?;

    let debug_data = bundle
        .debug_data
        .filter(|d| !d.is_empty())
        .context("The bundle doesn't have any debug data")?;

    let output = output.map_or_else(|| debug_data_path(path), Path::to_path_buf);
    fs::write(&output, debug_data).with_context(|| format!("Failed to write {output:?}"))?;
    tracing::info!("Dumped debug data to {output:?}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_data_path() {
        assert_eq!(
            debug_data_path(Path::new("dir/VEH_CARBRWDS_AT.BIN")),
            PathBuf::from("dir/VEH_CARBRWDS_AT_debug.xml")
        );
        assert_eq!(
            debug_data_path(Path::new("TRK_UNIT.bndl")),
            PathBuf::from("TRK_UNIT_debug.xml")
        );
    }
}
