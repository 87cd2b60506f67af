//! Operations over the references between resources

use std::collections::BTreeSet;

use super::{
    error::{Bnd2Error, Result},
    types::*,
};

impl Bundle {
    /// Rename a resource and re-point every import that referenced the old id.
    /// Imports are rewritten even if no local entry owns `old_id`.
    pub fn change_resource_id(&mut self, old_id: u64, new_id: u64) -> Result<()> {
        if old_id == new_id {
            return Ok(());
        }
        if self.contains(new_id) {
            return Err(Bnd2Error::DuplicateId(new_id));
        }

        let entries = self.resource_entries_mut();
        let mut rewritten = 0;
        for entry in entries.iter_mut() {
            if entry.id() == old_id {
                entry.set_id(new_id);
            }
            for import in entry
                .import_entries
                .iter_mut()
                .filter(|i| i.target_id == old_id)
            {
                import.target_id = new_id;
                rewritten += 1;
            }
        }
        entries.sort_by_key(|e| e.id());

        tracing::debug!(old_id, new_id, rewritten, "changed resource id");

        Ok(())
    }

    /// Every import in the bundle, alongside the id of the resource that owns it
    pub fn import_entries(&self) -> impl Iterator<Item = (u64, &ImportEntry)> {
        self.resource_entries()
            .iter()
            .flat_map(|e| e.import_entries.iter().map(move |i| (e.id(), i)))
    }

    /// Ids referenced by imports that have to be resolved from another bundle
    pub fn get_external_resource_ids(&self) -> BTreeSet<u64> {
        self.import_entries()
            .map(|(_, i)| i.target_id)
            .filter(|&id| !self.contains(id))
            .collect()
    }

    /// Imports that neither this bundle nor any of `external_bundles` can satisfy.
    /// Each unresolved occurrence is reported.
    pub fn get_missing_imports(&self, external_bundles: &[Bundle]) -> Vec<ImportEntry> {
        self.import_entries()
            .map(|(_, i)| *i)
            .filter(|i| !self.contains(i.target_id))
            .filter(|i| !external_bundles.iter().any(|b| b.contains(i.target_id)))
            .collect()
    }
}
