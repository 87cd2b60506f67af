use std::{
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::Serialize;

use super::read_bundle;
use crate::file_parsers::bnd2::{Bundle, Platform, ResourceEntry};

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub target_id: String,
    pub patch_offset: u32,
}

#[derive(Debug, Serialize)]
pub struct EntrySummary {
    pub id: String,
    pub resource_type: u32,
    pub stream_sizes: [usize; 3],
    pub imports: Vec<ImportSummary>,
}

#[derive(Debug, Serialize)]
pub struct BundleSummary {
    pub platform: Platform,
    pub compressed: bool,
    pub debug_data_size: usize,
    pub external_ids: Vec<String>,
    pub entries: Vec<EntrySummary>,
}

fn hex_id(id: u64) -> String {
    format!("{id:08X}")
}

impl From<&ResourceEntry> for EntrySummary {
    fn from(entry: &ResourceEntry) -> Self {
        Self {
            id: hex_id(entry.id()),
            resource_type: entry.resource_type,
            stream_sizes: entry.streams.each_ref().map(Vec::len),
            imports: entry
                .import_entries
                .iter()
                .map(|i| ImportSummary {
                    target_id: hex_id(i.target_id),
                    patch_offset: i.patch_offset,
                })
                .collect(),
        }
    }
}

impl From<&Bundle> for BundleSummary {
    fn from(bundle: &Bundle) -> Self {
        Self {
            platform: bundle.platform,
            compressed: bundle.compressed,
            debug_data_size: bundle.debug_data.as_ref().map_or(0, Vec::len),
            external_ids: bundle
                .get_external_resource_ids()
                .into_iter()
                .map(hex_id)
                .collect(),
            entries: bundle.resource_entries().iter().map(Into::into).collect(),
        }
    }
}

/// Print a JSON summary of a bundle to stdout
pub fn bundle_info(path: &Path) -> Result<()> {
    let bundle = read_bundle(path)?;
    let summary = BundleSummary::from(&bundle);

    let mut stdout = BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut stdout, &summary).context("Failed to write summary")?;
    writeln!(stdout).context("Failed to write to stdout")?;

    stdout.flush().context("Failed to flush stdout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_parsers::bnd2::ImportEntry;

    #[test]
    fn test_summary() {
        let mut bundle = Bundle::new(Platform::Ps3);
        let mut entry = ResourceEntry::new(0x10, 3);
        entry.streams[0] = vec![0; 5];
        entry.streams[2] = vec![0; 7];
        entry.import_entries.push(ImportEntry {
            target_id: 0xABCDEF012,
            patch_offset: 4,
        });
        bundle.add_resource_entry(entry).unwrap();

        let json = serde_json::to_value(BundleSummary::from(&bundle)).unwrap();
        assert_eq!(json["platform"], "Ps3");
        assert_eq!(json["external_ids"][0], "ABCDEF012");
        assert_eq!(json["entries"][0]["id"], "00000010");
        assert_eq!(json["entries"][0]["stream_sizes"][2], 7);
        assert_eq!(json["entries"][0]["imports"][0]["patch_offset"], 4);
    }
}
