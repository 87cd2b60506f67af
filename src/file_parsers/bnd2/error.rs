use thiserror::Error;

#[derive(Debug, Error)]
pub enum Bnd2Error {
    #[error("not a bnd2 container: magic was {0:02X?}")]
    BadMagic([u8; 4]),

    #[error("unknown platform signature: {0:02X?}")]
    UnknownPlatform([u8; 4]),

    #[error("unexpected end of input while reading {0}")]
    TruncatedInput(&'static str),

    #[error("alignment {0} is not a power of two up to 2^15")]
    InvalidAlignment(u32),

    #[error("{what} of {size} does not fit in its packed field")]
    SizeOverflow { what: &'static str, size: u64 },

    #[error("resource id {0:08X} is already in use")]
    DuplicateId(u64),

    #[error("failed to inflate stream {stream} of resource {id:08X}")]
    Decompress {
        id: u64,
        stream: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to deflate stream {stream} of resource {id:08X}")]
    Compress {
        id: u64,
        stream: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write bundle")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Bnd2Error>;
