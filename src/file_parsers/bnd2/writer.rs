use std::{borrow::Cow, io::Write};

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use flate2::{Compression, write::ZlibEncoder};

use super::{
    alignment::{STREAM_ALIGNMENTS, align_offset, pack, pad_to},
    error::{Bnd2Error, Result},
    parser::{FLAG_COMPRESSED, FLAG_HAS_DEBUG_DATA, HEADER_SIZE, MAGIC},
    platform::Platform,
    types::*,
};

pub const VERSION: u32 = 2;
/// Bits 1 and 2 are always set on write
const FLAG_RESERVED: u32 = 0x6;
const SECTION_ALIGNMENT: usize = 0x10;
const UNCOMPRESSED_ALIGNMENT: u32 = 4;
const DISK_ALIGNMENT: u32 = 1;

fn to_u32(value: usize, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Bnd2Error::SizeOverflow {
        what,
        size: value as u64,
    })
}

fn deflate(data: &[u8], id: u64, stream: usize) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|source| Bnd2Error::Compress { id, stream, source })
}

/// Stream 0 with its import table appended, plus the table's offset.
/// Without imports stream 0 is left as-is and the offset is 0.
///
/// Only the import table forces padding into a stream. Every other stream is aligned by
/// padding its pool after the data, so the recorded sizes stay the logical lengths.
fn embed_imports<B: ByteOrder>(entry: &ResourceEntry) -> Result<(Cow<'_, [u8]>, u32)> {
    if entry.import_entries.is_empty() {
        return Ok((Cow::Borrowed(&entry.streams[0]), 0));
    }

    let mut stream0 = entry.streams[0].clone();
    pad_to(&mut stream0, STREAM_ALIGNMENTS[0] as usize);
    let imports_offset = to_u32(stream0.len(), "imports offset")?;

    for import in &entry.import_entries {
        stream0.write_u64::<B>(import.target_id)?;
        stream0.write_u32::<B>(import.patch_offset)?;
        stream0.write_u32::<B>(0)?;
    }

    Ok((Cow::Owned(stream0), imports_offset))
}

/// Entry records and the three stream pools, before their final placement is known
#[derive(Debug, Default)]
struct Sections {
    entry_table: Vec<u8>,
    pools: [Vec<u8>; 3],
}

impl Sections {
    fn push_entry<B: ByteOrder>(&mut self, entry: &ResourceEntry, compressed: bool) -> Result<()> {
        let id = entry.id();
        let imports_count =
            u16::try_from(entry.import_entries.len()).map_err(|_| Bnd2Error::SizeOverflow {
                what: "import count",
                size: entry.import_entries.len() as u64,
            })?;

        let (stream0, imports_offset) = embed_imports::<B>(entry)?;
        let streams: [&[u8]; 3] = [&stream0, &entry.streams[1], &entry.streams[2]];

        let table = &mut self.entry_table;
        table.write_u64::<B>(id)?;
        table.write_u64::<B>(entry.imports_hash())?;
        for stream in streams {
            let size = to_u32(stream.len(), "stream size")?;
            table.write_u32::<B>(pack(size, UNCOMPRESSED_ALIGNMENT)?)?;
        }

        let mut disk_offsets = [0; 3];
        for (j, stream) in streams.into_iter().enumerate() {
            let data = if compressed && !stream.is_empty() {
                Cow::Owned(deflate(stream, id, j)?)
            } else {
                Cow::Borrowed(stream)
            };

            let size = to_u32(data.len(), "stream size")?;
            table.write_u32::<B>(pack(size, DISK_ALIGNMENT)?)?;

            if !data.is_empty() {
                let pool = &mut self.pools[j];
                disk_offsets[j] = to_u32(pool.len(), "pool offset")?;
                pool.extend_from_slice(&data);
                pad_to(pool, STREAM_ALIGNMENTS[j] as usize);
            }
            tracing::trace!(id, stream = j, size, "wrote stream");
        }

        for offset in disk_offsets {
            table.write_u32::<B>(offset)?;
        }
        table.write_u32::<B>(imports_offset)?;
        table.write_u32::<B>(entry.resource_type)?;
        table.write_u16::<B>(imports_count)?;
        table.extend([0, 0]);

        tracing::debug!(
            id,
            resource_type = entry.resource_type,
            imports = imports_count,
            ?disk_offsets,
            "wrote resource entry"
        );

        Ok(())
    }
}

/// Absolute positions of every section in the output file
#[derive(Debug)]
struct Layout {
    debug_data_offset: usize,
    resource_entry_table_offset: usize,
    resource_data_offsets: [usize; 3],
    size: usize,
}

impl Layout {
    fn new(debug_data_len: usize, sections: &Sections) -> Self {
        let debug_data_offset = align_offset(HEADER_SIZE, SECTION_ALIGNMENT);
        let resource_entry_table_offset =
            align_offset(debug_data_offset + debug_data_len, SECTION_ALIGNMENT);

        let mut cursor = resource_entry_table_offset + sections.entry_table.len();
        let mut resource_data_offsets = [0; 3];
        for (j, pool) in sections.pools.iter().enumerate() {
            resource_data_offsets[j] = align_offset(cursor, STREAM_ALIGNMENTS[j] as usize);
            cursor = resource_data_offsets[j] + pool.len();
        }

        Self {
            debug_data_offset,
            resource_entry_table_offset,
            resource_data_offsets,
            size: cursor,
        }
    }
}

/// Serialise a bundle. Entries are always written in ascending id order.
pub fn save_bundle(bundle: &Bundle) -> Result<Vec<u8>> {
    match bundle.platform {
        Platform::Pc => write_bundle::<LittleEndian>(bundle),
        Platform::Xbox360 | Platform::Ps3 => write_bundle::<BigEndian>(bundle),
    }
}

fn write_bundle<B: ByteOrder>(bundle: &Bundle) -> Result<Vec<u8>> {
    let mut entries = bundle.resource_entries().iter().collect::<Vec<_>>();
    entries.sort_by_key(|e| e.id());

    // Pass 1: build the entry table and stream pools independently of where they will land
    let mut sections = Sections::default();
    for entry in &entries {
        sections.push_entry::<B>(entry, bundle.compressed)?;
    }

    // Pass 2: place everything and write the header with the final offsets
    let debug_data = bundle
        .debug_data
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or_default();
    let layout = Layout::new(debug_data.len(), &sections);
    to_u32(layout.size, "bundle size")?;

    let mut flags = FLAG_RESERVED;
    if bundle.compressed {
        flags |= FLAG_COMPRESSED;
    }
    if !debug_data.is_empty() {
        flags |= FLAG_HAS_DEBUG_DATA;
    }

    tracing::debug!(
        platform = %bundle.platform,
        entries = entries.len(),
        size = layout.size,
        "saving bundle"
    );

    let mut out = Vec::with_capacity(layout.size);
    out.extend_from_slice(&MAGIC);
    out.write_u32::<B>(VERSION)?;
    out.extend_from_slice(&bundle.platform.signature());
    out.write_u32::<B>(layout.debug_data_offset as u32)?;
    out.write_u32::<B>(to_u32(entries.len(), "resource entry count")?)?;
    out.write_u32::<B>(layout.resource_entry_table_offset as u32)?;
    for offset in layout.resource_data_offsets {
        out.write_u32::<B>(offset as u32)?;
    }
    out.write_u32::<B>(flags)?;

    out.resize(layout.debug_data_offset, 0);
    out.extend_from_slice(debug_data);
    out.resize(layout.resource_entry_table_offset, 0);
    out.extend_from_slice(&sections.entry_table);

    for (offset, pool) in layout.resource_data_offsets.into_iter().zip(&sections.pools) {
        out.resize(offset, 0);
        out.extend_from_slice(pool);
    }

    Ok(out)
}
