use super::{
    error::{Bnd2Error, Result},
    platform::Platform,
};

/// Reference from a resource's main stream to another resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportEntry {
    pub target_id: u64,
    /// Where in stream 0 the runtime patches in the resolved pointer
    pub patch_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    id: u64,
    pub resource_type: u32,
    /// Main memory, then the two GPU-resident streams
    pub streams: [Vec<u8>; 3],
    /// Kept out of stream 0 in memory, embedded after it on disk
    pub import_entries: Vec<ImportEntry>,
}

impl ResourceEntry {
    pub fn new(id: u64, resource_type: u32) -> Self {
        Self {
            id,
            resource_type,
            streams: Default::default(),
            import_entries: vec![],
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(super) fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    /// Bitwise OR of every import's target id, written to the entry record but never checked
    pub fn imports_hash(&self) -> u64 {
        self.import_entries
            .iter()
            .fold(0, |hash, import| hash | import.target_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    pub platform: Platform,
    pub compressed: bool,
    pub debug_data: Option<Vec<u8>>,
    /// Sorted by id, ids unique
    resource_entries: Vec<ResourceEntry>,
}

impl Bundle {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            ..Default::default()
        }
    }

    /// Build from entries in any order. Duplicate ids are kept as-is.
    pub(super) fn from_parts(
        platform: Platform,
        compressed: bool,
        debug_data: Option<Vec<u8>>,
        mut resource_entries: Vec<ResourceEntry>,
    ) -> Self {
        resource_entries.sort_by_key(|e| e.id);
        Self {
            platform,
            compressed,
            debug_data,
            resource_entries,
        }
    }

    pub fn resource_entries(&self) -> &[ResourceEntry] {
        &self.resource_entries
    }

    pub(super) fn resource_entries_mut(&mut self) -> &mut Vec<ResourceEntry> {
        &mut self.resource_entries
    }

    fn position(&self, id: u64) -> std::result::Result<usize, usize> {
        self.resource_entries.binary_search_by_key(&id, |e| e.id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_ok()
    }

    pub fn resource_entry(&self, id: u64) -> Option<&ResourceEntry> {
        self.position(id).ok().map(|i| &self.resource_entries[i])
    }

    /// The id itself can only be changed through [`Bundle::change_resource_id`]
    pub fn resource_entry_mut(&mut self, id: u64) -> Option<&mut ResourceEntry> {
        self.position(id).ok().map(|i| &mut self.resource_entries[i])
    }

    pub fn add_resource_entry(&mut self, entry: ResourceEntry) -> Result<()> {
        match self.position(entry.id) {
            Ok(_) => Err(Bnd2Error::DuplicateId(entry.id)),
            Err(i) => {
                self.resource_entries.insert(i, entry);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_stay_sorted() {
        let mut bundle = Bundle::new(Platform::Pc);
        for id in [0x30, 0x10, 0x20] {
            bundle.add_resource_entry(ResourceEntry::new(id, 1)).unwrap();
        }

        let ids = bundle
            .resource_entries()
            .iter()
            .map(|e| e.id())
            .collect::<Vec<_>>();
        assert_eq!(ids, [0x10, 0x20, 0x30]);
        assert!(bundle.contains(0x20));
        assert!(bundle.resource_entry(0x40).is_none());

        bundle.resource_entry_mut(0x20).unwrap().streams[1] = vec![1, 2];
        assert_eq!(bundle.resource_entry(0x20).unwrap().streams[1], [1, 2]);
    }

    #[test]
    fn test_add_duplicate() {
        let mut bundle = Bundle::new(Platform::Pc);
        bundle.add_resource_entry(ResourceEntry::new(1, 1)).unwrap();
        let err = bundle.add_resource_entry(ResourceEntry::new(1, 2)).unwrap_err();
        assert!(matches!(err, Bnd2Error::DuplicateId(1)));
        assert_eq!(bundle.resource_entry(1).unwrap().resource_type, 1);
    }

    #[test]
    fn test_imports_hash_is_or() {
        let mut entry = ResourceEntry::new(1, 1);
        entry.import_entries = vec![
            ImportEntry {
                target_id: 0b0101,
                patch_offset: 0,
            },
            ImportEntry {
                target_id: 0b0011,
                patch_offset: 8,
            },
        ];
        assert_eq!(entry.imports_hash(), 0b0111);
        assert_eq!(ResourceEntry::new(2, 1).imports_hash(), 0);
    }
}
