pub mod compression;
pub mod dump_debug;
pub mod info;
pub mod rename;
pub mod validate_imports;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::file_parsers::{
    FileParser,
    bnd2::{Bnd2Parser, Bundle, save_bundle},
};

/// Read and parse a bundle from disk
pub fn read_bundle(path: &Path) -> Result<Bundle> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read bundle {path:?}"))?;

    Bnd2Parser
        .parse(&bytes)
        .with_context(|| format!("Failed to parse bundle {path:?}"))
}

/// Serialise a bundle and write it to disk
pub fn write_bundle(bundle: &Bundle, path: &Path) -> Result<()> {
    let bytes = save_bundle(bundle).context("Failed to serialise bundle")?;

    fs::write(path, bytes).with_context(|| format!("Failed to write bundle {path:?}"))
}

/// Where a modified bundle goes, defaults to overwriting the input
pub fn output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    output.unwrap_or(input).to_path_buf()
}

/// Parses a hex resource id, with or without a 0x prefix
pub fn parse_resource_id(s: &str) -> Result<u64, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    u64::from_str_radix(digits, 16).map_err(|e| format!("Invalid resource id {s:?}: {e}"))
}

/// A rename request, written OLD:NEW in hex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPair {
    pub old_id: u64,
    pub new_id: u64,
}

impl std::str::FromStr for IdPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (old, new) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected OLD:NEW, got {s:?}"))?;

        Ok(IdPair {
            old_id: parse_resource_id(old.trim())?,
            new_id: parse_resource_id(new.trim())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource_id() {
        assert_eq!(parse_resource_id("1A2B").unwrap(), 0x1A2B);
        assert_eq!(parse_resource_id("0xff").unwrap(), 0xFF);
        assert_eq!(parse_resource_id("0XFF").unwrap(), 0xFF);
        assert!(parse_resource_id("xyz").is_err());
        assert!(parse_resource_id("").is_err());
    }

    #[test]
    fn test_id_pair() {
        let pair: IdPair = "0x10:FF".parse().unwrap();
        assert_eq!(
            pair,
            IdPair {
                old_id: 0x10,
                new_id: 0xFF
            }
        );
        assert!("10".parse::<IdPair>().is_err());
        assert!("10:zz".parse::<IdPair>().is_err());
    }

    #[test]
    fn test_output_path() {
        let input = Path::new("a/b.bundle");
        assert_eq!(output_path(input, None), PathBuf::from("a/b.bundle"));
        assert_eq!(
            output_path(input, Some(Path::new("c.bundle"))),
            PathBuf::from("c.bundle")
        );
    }
}
