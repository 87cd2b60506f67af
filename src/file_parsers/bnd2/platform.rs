use std::fmt::Display;

use serde::Serialize;
use winnow::binary::Endianness;

use super::error::{Bnd2Error, Result};

/// Target runtime of a bundle, decides the byte order of every integer in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Platform {
    #[default]
    Pc,
    Xbox360,
    Ps3,
}

impl Platform {
    pub fn from_signature(signature: [u8; 4]) -> Result<Self> {
        use Platform::*;
        match signature {
            [0x01, 0x00, 0x00, 0x00] => Ok(Pc),
            [0x00, 0x00, 0x00, 0x02] => Ok(Xbox360),
            [0x00, 0x00, 0x00, 0x03] => Ok(Ps3),
            x => Err(Bnd2Error::UnknownPlatform(x)),
        }
    }

    pub fn signature(&self) -> [u8; 4] {
        use Platform::*;
        match self {
            Pc => [0x01, 0x00, 0x00, 0x00],
            Xbox360 => [0x00, 0x00, 0x00, 0x02],
            Ps3 => [0x00, 0x00, 0x00, 0x03],
        }
    }

    pub fn endianness(&self) -> Endianness {
        match self {
            Platform::Pc => Endianness::Little,
            Platform::Xbox360 | Platform::Ps3 => Endianness::Big,
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Platform::Pc => "PC",
            Platform::Xbox360 => "Xbox 360",
            Platform::Ps3 => "PS3",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signatures() {
        for platform in [Platform::Pc, Platform::Xbox360, Platform::Ps3] {
            assert_eq!(
                Platform::from_signature(platform.signature()).unwrap(),
                platform
            );
        }
    }

    #[test]
    fn test_unknown_signature() {
        let err = Platform::from_signature([0, 0, 0, 4]).unwrap_err();
        assert!(matches!(err, Bnd2Error::UnknownPlatform([0, 0, 0, 4])));
    }

    #[test]
    fn test_byte_order() {
        assert!(matches!(Platform::Pc.endianness(), Endianness::Little));
        assert!(matches!(Platform::Xbox360.endianness(), Endianness::Big));
        assert!(matches!(Platform::Ps3.endianness(), Endianness::Big));
    }
}
