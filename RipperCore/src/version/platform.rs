//! Build target platforms

use std::fmt;

use crate::io::Endian;

/// Build target a serialized file was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    Osx,
    #[default]
    Win,
    Ios,
    Ps3,
    Xbox360,
    Android,
    Linux,
    Win64,
    WebGl,
    Ps4,
    XboxOne,
    Switch,
    /// Any build target code without a named variant.
    Unknown(i32),
}

impl Platform {
    pub fn from_i32(code: i32) -> Self {
        match code {
            2 => Platform::Osx,
            5 => Platform::Win,
            9 => Platform::Ios,
            10 => Platform::Ps3,
            11 => Platform::Xbox360,
            13 => Platform::Android,
            17 => Platform::Linux,
            19 => Platform::Win64,
            20 => Platform::WebGl,
            31 => Platform::Ps4,
            33 => Platform::XboxOne,
            38 => Platform::Switch,
            other => Platform::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Platform::Osx => 2,
            Platform::Win => 5,
            Platform::Ios => 9,
            Platform::Ps3 => 10,
            Platform::Xbox360 => 11,
            Platform::Android => 13,
            Platform::Linux => 17,
            Platform::Win64 => 19,
            Platform::WebGl => 20,
            Platform::Ps4 => 31,
            Platform::XboxOne => 33,
            Platform::Switch => 38,
            Platform::Unknown(code) => code,
        }
    }

    /// Byte order of vertex blobs stored for this platform.
    ///
    /// Only Xbox 360 builds keep vertex data big-endian; everything else is little-endian.
    pub fn vertex_endian(self) -> Endian {
        match self {
            Platform::Xbox360 => Endian::Big,
            _ => Endian::Little,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Unknown(code) => write!(f, "Unknown({code})"),
            other => write!(f, "{other:?}"),
        }
    }
}
