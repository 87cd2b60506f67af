use std::path::Path;

use anyhow::{Context, Result};

use super::{IdPair, output_path, read_bundle, write_bundle};
use crate::file_parsers::bnd2::Bundle;

/// Apply renames in order, stopping at the first collision
pub fn apply_renames(bundle: &mut Bundle, pairs: &[IdPair], strip_debug: bool) -> Result<()> {
    for pair in pairs {
        bundle
            .change_resource_id(pair.old_id, pair.new_id)
            .with_context(|| {
                format!(
                    "Failed to change resource ID {:08X} to {:08X}",
                    pair.old_id, pair.new_id
                )
            })?;
        tracing::info!(
            "Changed resource ID from {:08X} to {:08X}",
            pair.old_id,
            pair.new_id
        );
    }

    if strip_debug && bundle.debug_data.take().is_some() {
        tracing::info!("Removed debug data");
    }

    Ok(())
}

/// Rename resources in a bundle and write it back out. Nothing is written if any rename fails.
pub fn rename_resources(
    path: &Path,
    pairs: &[IdPair],
    strip_debug: bool,
    output: Option<&Path>,
) -> Result<()> {
    let mut bundle = read_bundle(path)?;
    apply_renames(&mut bundle, pairs, strip_debug)?;

    let output = output_path(path, output);
    write_bundle(&bundle, &output)?;
    tracing::info!("Saved bundle to {output:?}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_parsers::bnd2::{ImportEntry, Platform, ResourceEntry};

    fn bundle() -> Bundle {
        let mut bundle = Bundle::new(Platform::Pc);
        let mut a = ResourceEntry::new(1, 0);
        a.import_entries.push(ImportEntry {
            target_id: 2,
            patch_offset: 0,
        });
        bundle.add_resource_entry(a).unwrap();
        bundle.add_resource_entry(ResourceEntry::new(2, 0)).unwrap();
        bundle.debug_data = Some(b"debug".to_vec());
        bundle
    }

    #[test]
    fn test_apply_renames() {
        let mut b = bundle();
        let pairs = [
            IdPair {
                old_id: 2,
                new_id: 0x20,
            },
            IdPair {
                old_id: 1,
                new_id: 0x10,
            },
        ];

        apply_renames(&mut b, &pairs, true).unwrap();

        assert_eq!(b.resource_entry(0x10).unwrap().import_entries[0].target_id, 0x20);
        assert!(b.contains(0x20));
        assert_eq!(b.debug_data, None);
    }

    #[test]
    fn test_apply_renames_collision() {
        let mut b = bundle();
        let pairs = [IdPair {
            old_id: 1,
            new_id: 2,
        }];

        assert!(apply_renames(&mut b, &pairs, false).is_err());
        assert!(b.debug_data.is_some());
    }
}
