use std::io::Read;

use flate2::read::ZlibDecoder;
use winnow::{
    Parser,
    binary::{Endianness, u16, u32, u64},
    combinator::{repeat, seq},
    error::ContextError,
    token::take,
};

use super::{
    alignment::{SIZE_MASK, unpack},
    error::{Bnd2Error, Result},
    platform::Platform,
    types::*,
};
use crate::file_parsers::shared::winnow::{TraceHelper, repeat_array};

pub const MAGIC: [u8; 4] = *b"bnd2";
pub const HEADER_SIZE: usize = 0x28;
pub const ENTRY_RECORD_SIZE: usize = 0x40;
pub const IMPORT_RECORD_SIZE: usize = 0x10;

pub const FLAG_COMPRESSED: u32 = 0x1;
pub const FLAG_HAS_DEBUG_DATA: u32 = 0x8;

type Input<'a> = &'a [u8];

#[derive(Debug)]
struct Header {
    debug_data_offset: u32,
    resource_entry_count: u32,
    resource_entry_table_offset: u32,
    resource_data_offsets: [u32; 3],
    flags: u32,
}

/// Fixed-size record of the resource entry table
#[derive(Debug)]
struct EntryRecord {
    id: u64,
    size_and_alignment_on_disk: [u32; 3],
    disk_offsets: [u32; 3],
    imports_offset: u32,
    resource_type: u32,
    imports_count: u16,
}

fn word<'a>(endian: Endianness) -> impl Parser<Input<'a>, u16, ContextError> {
    u16(endian)
}

fn dword<'a>(endian: Endianness) -> impl Parser<Input<'a>, u32, ContextError> {
    u32(endian)
}

fn qword<'a>(endian: Endianness) -> impl Parser<Input<'a>, u64, ContextError> {
    u64(endian)
}

/// One dword per stream
fn triple<'a>(endian: Endianness) -> impl Parser<Input<'a>, [u32; 3], ContextError> {
    repeat_array(dword(endian))
}

/// Everything after the magic. The platform signature is read up front to pick the byte order.
fn header<'a>(endian: Endianness) -> impl Parser<Input<'a>, Header, ContextError> {
    seq!((
        _: dword(endian), // version
        _: take(4_usize), // platform
        dword(endian),
        dword(endian),
        dword(endian),
        triple(endian),
        dword(endian),
    ))
    .map(
        |(
            debug_data_offset,
            resource_entry_count,
            resource_entry_table_offset,
            resource_data_offsets,
            flags,
        )| Header {
            debug_data_offset,
            resource_entry_count,
            resource_entry_table_offset,
            resource_data_offsets,
            flags,
        },
    )
    .trace("header")
}

fn entry_record<'a>(endian: Endianness) -> impl Parser<Input<'a>, EntryRecord, ContextError> {
    seq!((
        qword(endian),
        _: qword(endian), // imports hash
        _: triple(endian), // uncompressed size and alignment
        triple(endian),
        triple(endian),
        dword(endian),
        dword(endian),
        word(endian),
        _: take(2_usize),
    ))
    .map(
        |(
            id,
            size_and_alignment_on_disk,
            disk_offsets,
            imports_offset,
            resource_type,
            imports_count,
        )| EntryRecord {
            id,
            size_and_alignment_on_disk,
            disk_offsets,
            imports_offset,
            resource_type,
            imports_count,
        },
    )
    .trace("entry_record")
}

fn import_entry<'a>(endian: Endianness) -> impl Parser<Input<'a>, ImportEntry, ContextError> {
    seq!((qword(endian), dword(endian), _: take(4_usize)))
        .map(|(target_id, patch_offset)| ImportEntry {
            target_id,
            patch_offset,
        })
        .trace("import_entry")
}

/// Run a fixed-size parser at an absolute offset. Fixed-size fields can only fail by running out of input.
fn parse_at<'a, O>(
    mut parser: impl Parser<Input<'a>, O, ContextError>,
    bytes: &'a [u8],
    offset: usize,
    what: &'static str,
) -> Result<O> {
    let mut input = bytes
        .get(offset..)
        .ok_or(Bnd2Error::TruncatedInput(what))?;

    parser
        .parse_next(&mut input)
        .map_err(|_| Bnd2Error::TruncatedInput(what))
}

fn slice_at<'a>(
    bytes: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8]> {
    offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(Bnd2Error::TruncatedInput(what))
}

fn read_platform(bytes: &[u8]) -> Result<Platform> {
    let magic = slice_at(bytes, 0, 4, "magic")?;
    if magic != MAGIC {
        return Err(Bnd2Error::BadMagic([magic[0], magic[1], magic[2], magic[3]]));
    }

    let signature = slice_at(bytes, 8, 4, "platform signature")?;
    Platform::from_signature([signature[0], signature[1], signature[2], signature[3]])
}

/// Inflate a stream that may hold at most `limit` bytes once decompressed
fn inflate(data: &[u8], limit: u32, id: u64, stream: usize) -> Result<Vec<u8>> {
    let mut out = vec![];
    ZlibDecoder::new(data)
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|source| Bnd2Error::Decompress { id, stream, source })?;

    if out.len() > limit as usize {
        return Err(Bnd2Error::SizeOverflow {
            what: "decompressed stream",
            size: out.len() as u64,
        });
    }

    Ok(out)
}

/// Pull the embedded import table off the end of stream 0
fn split_imports(
    stream0: &mut Vec<u8>,
    imports_offset: u32,
    imports_count: u16,
    endian: Endianness,
) -> Result<Vec<ImportEntry>> {
    if imports_count == 0 {
        return Ok(vec![]);
    }

    let imports_offset = imports_offset as usize;
    let table = slice_at(
        stream0,
        imports_offset,
        imports_count as usize * IMPORT_RECORD_SIZE,
        "import table",
    )?;
    let imports: Vec<_> = parse_at(
        repeat(imports_count as usize, import_entry(endian)),
        table,
        0,
        "import table",
    )?;

    stream0.truncate(imports_offset);

    Ok(imports)
}

fn resource_entry(
    bytes: &[u8],
    record: EntryRecord,
    pool_offsets: &[u32; 3],
    compressed: bool,
    endian: Endianness,
) -> Result<ResourceEntry> {
    let mut streams: [Vec<u8>; 3] = Default::default();
    for (j, stream) in streams.iter_mut().enumerate() {
        let (size, _) = unpack(record.size_and_alignment_on_disk[j]);
        let offset = pool_offsets[j] as usize + record.disk_offsets[j] as usize;
        let data = slice_at(bytes, offset, size as usize, "resource stream")?;

        *stream = if compressed && !data.is_empty() {
            inflate(data, SIZE_MASK, record.id, j)?
        } else {
            data.to_vec()
        };
        tracing::trace!(id = record.id, stream = j, size = stream.len(), "read stream");
    }

    let import_entries = split_imports(
        &mut streams[0],
        record.imports_offset,
        record.imports_count,
        endian,
    )?;

    let mut entry = ResourceEntry::new(record.id, record.resource_type);
    entry.streams = streams;
    entry.import_entries = import_entries;

    Ok(entry)
}

/// Parse a whole bnd2 container
pub fn load_bundle(bytes: &[u8]) -> Result<Bundle> {
    let platform = read_platform(bytes)?;
    let endian = platform.endianness();

    let header = parse_at(header(endian), bytes, MAGIC.len(), "header")?;
    let compressed = header.flags & FLAG_COMPRESSED != 0;

    tracing::debug!(
        %platform,
        compressed,
        entries = header.resource_entry_count,
        "loading bundle"
    );

    let debug_data = if header.flags & FLAG_HAS_DEBUG_DATA != 0 {
        let start = header.debug_data_offset as usize;
        let len = (header.resource_entry_table_offset as usize)
            .checked_sub(start)
            .ok_or(Bnd2Error::TruncatedInput("debug data"))?;
        let data = slice_at(bytes, start, len, "debug data")?;
        let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);

        Some(data[..end].to_vec())
    } else {
        None
    };

    let count = header.resource_entry_count as usize;
    let mut resource_entries = Vec::with_capacity(count.min(bytes.len() / ENTRY_RECORD_SIZE));
    for i in 0..count {
        let offset = header.resource_entry_table_offset as usize + i * ENTRY_RECORD_SIZE;
        let record = parse_at(entry_record(endian), bytes, offset, "resource entry")?;
        tracing::debug!(
            id = record.id,
            resource_type = record.resource_type,
            imports = record.imports_count,
            "read resource entry"
        );

        resource_entries.push(resource_entry(
            bytes,
            record,
            &header.resource_data_offsets,
            compressed,
            endian,
        )?);
    }

    Ok(Bundle::from_parts(
        platform,
        compressed,
        debug_data,
        resource_entries,
    ))
}
