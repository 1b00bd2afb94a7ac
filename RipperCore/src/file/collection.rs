//! Registry of loaded files

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use crate::classes::pptr::{AssetClass, Object, PPtr};
use crate::error::{Error, Result};

use super::{AssetEntry, DecodeSummary, SerializedFile};

/// Append-only set of loaded files, keyed by name.
///
/// Load every file of a working set before decoding or resolving anything;
/// files added later are only visible to lookups made after they were added.
#[derive(Debug, Default)]
pub struct FileCollection {
    files: IndexMap<String, SerializedFile>,
}

/// One reference found in a decoded asset.
#[derive(Debug, Clone, Copy)]
pub struct DependencyLink<'c> {
    /// Path id of the asset holding the reference.
    pub owner: i64,
    pub field: &'static str,
    pub reference: PPtr<Object>,
    /// Target entry, or `None` when the reference does not resolve.
    pub target: Option<&'c AssetEntry>,
}

impl DependencyLink<'_> {
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: SerializedFile) -> Result<()> {
        match self.files.entry(file.name().to_string()) {
            Entry::Occupied(entry) => Err(Error::DuplicateFile(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!("Loaded {} ({} dependencies)", entry.key(), file.dependencies().len());
                entry.insert(file);
                Ok(())
            }
        }
    }

    pub fn file(&self, name: &str) -> Option<&SerializedFile> {
        self.files.get(name)
    }

    pub fn file_mut(&mut self, name: &str) -> Option<&mut SerializedFile> {
        self.files.get_mut(name)
    }

    /// Files in load order.
    pub fn files(&self) -> impl Iterator<Item = &SerializedFile> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Decode every pending asset of every file.
    pub fn decode_all(&mut self) -> DecodeSummary {
        let mut summary = DecodeSummary::default();
        for file in self.files.values_mut() {
            summary += file.decode_all();
        }
        summary
    }

    /// Resolve a reference held by an asset of the file named `owner`.
    pub fn resolve<T: AssetClass>(&self, owner: &str, reference: &PPtr<T>) -> Option<&AssetEntry> {
        reference.resolve(self.file(owner)?, self)
    }

    /// Every reference held by the decoded assets of `file`, produced lazily.
    ///
    /// Unresolved references are listed with `target: None`; assets that are not
    /// decoded contribute nothing.
    pub fn dependencies<'c>(&'c self, file: &'c SerializedFile) -> impl Iterator<Item = DependencyLink<'c>> + 'c {
        file.entries()
            .filter_map(|entry| entry.asset().map(|asset| (entry.info.path_id, asset)))
            .flat_map(move |(owner, asset)| {
                asset.dependencies().map(move |dependency| {
                    let target = dependency.reference.resolve(file, self);
                    if target.is_none() {
                        debug!(
                            "Unresolved {} {:?} held by {owner} in {}",
                            dependency.field,
                            dependency.reference,
                            file.name()
                        );
                    }
                    DependencyLink {
                        owner,
                        field: dependency.field,
                        reference: dependency.reference,
                        target,
                    }
                })
            })
    }
}
