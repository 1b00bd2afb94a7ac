//! Serialized files and their per-asset decode state
//!
//! A [`SerializedFile`] owns the raw bytes of one file together with the
//! object table the loading driver found in it. Assets decode lazily, one
//! region at a time; a failed asset never affects its siblings.

mod collection;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::classes::{Asset, ClassId};
use crate::error::{Error, Result};
use crate::io::{AssetReader, AssetWriter, Endian};
use crate::version::{FormatVersion, Platform, TransferFlags};

pub use collection::{DependencyLink, FileCollection};

/// Location of one asset inside its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInfo {
    pub path_id: i64,
    pub class_id: ClassId,
    /// Start of the region, in bytes from the start of the file data.
    pub offset: usize,
    pub size: usize,
}

/// Why an asset could not be decoded.
#[derive(Debug)]
pub struct DecodeFailure {
    pub error: Error,
    /// Position inside the asset's region where decoding stopped.
    pub offset: usize,
}

/// Lifecycle of one asset.
///
/// `Empty -> Decoding -> Decoded` or `Empty -> Decoding -> Failed`; both ends
/// are terminal.
#[derive(Debug, Default)]
pub enum DecodeState {
    #[default]
    Empty,
    Decoding,
    Decoded(Box<Asset>),
    Failed(DecodeFailure),
}

impl DecodeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DecodeState::Decoded(_) | DecodeState::Failed(_))
    }
}

#[derive(Debug)]
pub struct AssetEntry {
    pub info: ObjectInfo,
    pub state: DecodeState,
}

impl AssetEntry {
    /// The decoded record, if decoding succeeded.
    pub fn asset(&self) -> Option<&Asset> {
        match &self.state {
            DecodeState::Decoded(asset) => Some(asset.as_ref()),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&DecodeFailure> {
        match &self.state {
            DecodeState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Outcome counts of a bulk decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeSummary {
    pub decoded: usize,
    pub failed: usize,
}

impl DecodeSummary {
    fn record(&mut self, state: &DecodeState) {
        match state {
            DecodeState::Decoded(_) => self.decoded += 1,
            DecodeState::Failed(_) => self.failed += 1,
            DecodeState::Empty | DecodeState::Decoding => {}
        }
    }
}

impl std::ops::AddAssign for DecodeSummary {
    fn add_assign(&mut self, other: Self) {
        self.decoded += other.decoded;
        self.failed += other.failed;
    }
}

/// One loaded serialized file.
///
/// # Example
///
/// ```
/// use rippercore::classes::ClassId;
/// use rippercore::file::SerializedFile;
///
/// let mut file = SerializedFile::new("level0", vec![0; 64], "2018.3.0f2".parse().unwrap());
/// file.add_object(1, ClassId::from_i32(114), 0, 64).unwrap();
/// assert!(file.object(1).is_some());
/// ```
#[derive(Debug)]
pub struct SerializedFile {
    name: String,
    data: Vec<u8>,
    version: FormatVersion,
    flags: TransferFlags,
    platform: Platform,
    endian: Endian,
    dependencies: Vec<String>,
    objects: IndexMap<i64, AssetEntry>,
}

impl SerializedFile {
    /// An editor file for the default platform, stored little-endian.
    pub fn new(name: impl Into<String>, data: Vec<u8>, version: FormatVersion) -> Self {
        Self {
            name: name.into(),
            data,
            version,
            flags: TransferFlags::empty(),
            platform: Platform::default(),
            endian: Endian::Little,
            dependencies: Vec::new(),
            objects: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TransferFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn flags(&self) -> TransferFlags {
        self.flags
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Names of the files this file references, in file id order starting at 1.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Append a dependency and return the file id references use for it.
    pub fn add_dependency(&mut self, name: impl Into<String>) -> i32 {
        self.dependencies.push(name.into());
        self.dependencies.len() as i32
    }

    /// Register an asset region. The region must lie inside the file data.
    pub fn add_object(&mut self, path_id: i64, class_id: ClassId, offset: usize, size: usize) -> Result<()> {
        let end = offset
            .checked_add(size)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                Error::InvalidFormat(format!(
                    "object {path_id} region {offset}+{size} exceeds {} bytes of {}",
                    self.data.len(),
                    self.name
                ))
            })?;
        if self.objects.contains_key(&path_id) {
            return Err(Error::InvalidFormat(format!(
                "duplicate path id {path_id} in {}",
                self.name
            )));
        }

        debug!("Registered {class_id} {path_id} at {offset}..{end} in {}", self.name);
        let info = ObjectInfo {
            path_id,
            class_id,
            offset,
            size,
        };
        self.objects.insert(
            path_id,
            AssetEntry {
                info,
                state: DecodeState::Empty,
            },
        );
        Ok(())
    }

    pub fn object(&self, path_id: i64) -> Option<&AssetEntry> {
        self.objects.get(&path_id)
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &AssetEntry> {
        self.objects.values()
    }

    /// Decode one asset if it has not been decoded yet.
    ///
    /// Returns `None` for an unknown path id. A terminal state is returned as is.
    pub fn decode_object(&mut self, path_id: i64) -> Option<&DecodeState> {
        let context = DecodeContext {
            file: &self.name,
            endian: self.endian,
            version: self.version,
            flags: self.flags,
        };
        let entry = self.objects.get_mut(&path_id)?;
        if !entry.state.is_terminal() {
            entry.state = DecodeState::Decoding;
            entry.state = context.decode(&self.data, entry.info);
        }
        Some(&entry.state)
    }

    /// Decode every pending asset in parallel.
    ///
    /// Each task reads its own region through its own cursor; the file bytes are
    /// shared read-only.
    pub fn decode_all(&mut self) -> DecodeSummary {
        let context = DecodeContext {
            file: &self.name,
            endian: self.endian,
            version: self.version,
            flags: self.flags,
        };
        let pending: Vec<ObjectInfo> = self
            .objects
            .values_mut()
            .filter(|entry| !entry.state.is_terminal())
            .map(|entry| {
                entry.state = DecodeState::Decoding;
                entry.info
            })
            .collect();

        let data = &self.data;
        let results: Vec<(i64, DecodeState)> = pending
            .par_iter()
            .map(|info| (info.path_id, context.decode(data, *info)))
            .collect();

        let mut summary = DecodeSummary::default();
        for (path_id, state) in results {
            summary.record(&state);
            if let Some(entry) = self.objects.get_mut(&path_id) {
                entry.state = state;
            }
        }
        debug!(
            "Decoded {} assets of {} ({} failed)",
            summary.decoded, self.name, summary.failed
        );
        summary
    }

    /// Re-encode a decoded asset with this file's version, flags and byte order.
    pub fn encode_object(&self, path_id: i64) -> Result<Vec<u8>> {
        let asset = self
            .object(path_id)
            .and_then(AssetEntry::asset)
            .ok_or_else(|| Error::InvalidFormat(format!("object {path_id} of {} is not decoded", self.name)))?;
        let mut writer = AssetWriter::new(self.endian, self.version, self.flags);
        asset.write(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

/// What a decode task needs besides the bytes.
#[derive(Clone, Copy)]
struct DecodeContext<'a> {
    file: &'a str,
    endian: Endian,
    version: FormatVersion,
    flags: TransferFlags,
}

impl DecodeContext<'_> {
    fn decode(&self, data: &[u8], info: ObjectInfo) -> DecodeState {
        // add_object validated the region
        let region = &data[info.offset..info.offset + info.size];
        let mut reader = AssetReader::new(region, self.endian, self.version, self.flags);

        match Asset::decode(info.class_id, &mut reader) {
            Ok(asset) => {
                if reader.remaining() > 0 {
                    warn!(
                        "{} {} in {}: {} trailing bytes left unread",
                        info.class_id,
                        info.path_id,
                        self.file,
                        reader.remaining()
                    );
                }
                debug!("Decoded {} {} in {}", info.class_id, info.path_id, self.file);
                DecodeState::Decoded(Box::new(asset))
            }
            Err(error) => {
                let offset = error.offset().unwrap_or_else(|| reader.position());
                warn!("Failed to decode {} {} in {}: {error}", info.class_id, info.path_id, self.file);
                DecodeState::Failed(DecodeFailure { error, offset })
            }
        }
    }
}
