//! Format versions and decode context
//!
//! Every serialized file records the engine revision that wrote it. Field presence,
//! field width and alignment are all decided from that revision plus a small set of
//! [`TransferFlags`] describing how the data was produced.

mod flags;
mod platform;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

pub use flags::TransferFlags;
pub use platform::Platform;

/// Release channel of a format version, ordered alpha < beta < final < patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ReleaseType {
    Alpha,
    Beta,
    #[default]
    Final,
    Patch,
}

impl ReleaseType {
    /// Single-letter tag used in printed versions.
    pub fn letter(self) -> char {
        match self {
            ReleaseType::Alpha => 'a',
            ReleaseType::Beta => 'b',
            ReleaseType::Final => 'f',
            ReleaseType::Patch => 'p',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'a' => Some(ReleaseType::Alpha),
            'b' => Some(ReleaseType::Beta),
            'f' => Some(ReleaseType::Final),
            'p' => Some(ReleaseType::Patch),
            _ => None,
        }
    }
}

/// Ordered engine revision: `major.minor.patch` + release type + build number.
///
/// Field order matters: the derived `Ord` compares lexicographically, so the
/// release type only breaks ties between equal `major.minor.patch` triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
    pub release: ReleaseType,
    pub build: u8,
}

impl FormatVersion {
    /// Largest build number a version can carry.
    pub const MAX_BUILD: u8 = u8::MAX;

    pub const fn new(major: u16, minor: u16, patch: u16, release: ReleaseType, build: u8) -> Self {
        Self { major, minor, patch, release, build }
    }

    /// The first version of the `major.minor` series (`major.minor.0a0`).
    ///
    /// Used as the lower bound of every "present from X.Y" gate.
    pub const fn series(major: u16, minor: u16) -> Self {
        Self::new(major, minor, 0, ReleaseType::Alpha, 0)
    }

    /// A final release, `major.minor.patch f1`.
    pub const fn release(major: u16, minor: u16, patch: u16) -> Self {
        Self::new(major, minor, patch, ReleaseType::Final, 1)
    }

    /// `self >= other`
    pub fn is_at_least(&self, other: FormatVersion) -> bool {
        *self >= other
    }

    /// `self < other`
    pub fn is_below(&self, other: FormatVersion) -> bool {
        *self < other
    }

    /// Whether this version belongs to the `major.minor` series.
    pub fn is_series(&self, major: u16, minor: u16) -> bool {
        self.major == major && self.minor == minor
    }

    /// Half-open range test `[lo, hi)`.
    pub fn is_within(&self, lo: FormatVersion, hi: FormatVersion) -> bool {
        *self >= lo && *self < hi
    }
}

impl Default for FormatVersion {
    fn default() -> Self {
        Self::release(2017, 3, 0)
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}{}{}",
            self.major,
            self.minor,
            self.patch,
            self.release.letter(),
            self.build
        )
    }
}

impl FromStr for FormatVersion {
    type Err = Error;

    /// Parses `"2018.3.14f1"`, `"5.6.0b3"` or `"4.7.2"` (missing tag means final).
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersion(s.to_string());
        let trimmed = s.trim();

        let mut parts = trimmed.splitn(3, '.');
        let major = parts.next().ok_or_else(invalid)?;
        let minor = parts.next().unwrap_or("0");
        let rest = parts.next().unwrap_or("0");

        let major: u16 = major.parse().map_err(|_| invalid())?;
        let minor: u16 = minor.parse().map_err(|_| invalid())?;

        let (patch, release, build) = match rest.find(|c: char| c.is_ascii_alphabetic()) {
            Some(index) => {
                let letter = rest[index..].chars().next().ok_or_else(invalid)?;
                let release = ReleaseType::from_letter(letter).ok_or_else(invalid)?;
                let build_text = &rest[index + 1..];
                let build = if build_text.is_empty() {
                    0
                } else {
                    build_text.parse().map_err(|_| invalid())?
                };
                (&rest[..index], release, build)
            }
            None => (rest, ReleaseType::Final, 0),
        };
        let patch: u16 = patch.parse().map_err(|_| invalid())?;

        Ok(Self::new(major, minor, patch, release, build))
    }
}

impl Serialize for FormatVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
