//! Cross-file asset references

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::error::Result;
use crate::export::{ExportContainer, ExportMapping, ExportNode, Exportable};
use crate::file::{AssetEntry, FileCollection, SerializedFile};
use crate::io::{AssetReader, AssetWriter};
use crate::version::FormatVersion;

use super::ClassId;

/// Asset kind a reference may point at.
pub trait AssetClass {
    const NAME: &'static str;

    fn matches(class_id: ClassId) -> bool;
}

macro_rules! asset_class {
    ($($(#[$meta:meta])* $name:ident => $class:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum $name {}

            impl AssetClass for $name {
                const NAME: &'static str = stringify!($name);

                fn matches(class_id: ClassId) -> bool {
                    class_id == ClassId::$class
                }
            }
        )+
    };
}

asset_class! {
    GameObject => GameObject,
    Transform => Transform,
    Material => Material,
    Mesh => Mesh,
    Prefab => Prefab,
    LightmapParameters => LightmapParameters,
}

/// Any asset kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Object {}

impl AssetClass for Object {
    const NAME: &'static str = "Object";

    fn matches(_class_id: ClassId) -> bool {
        true
    }
}

/// Weak reference to an asset, possibly in another loaded file.
///
/// `file_id` 0 means the owning file; `n > 0` is entry `n - 1` of the owning
/// file's dependency table. `path_id` 0 is the null reference. Equality and
/// hashing only look at the two identifiers.
pub struct PPtr<T> {
    pub file_id: i32,
    pub path_id: i64,
    marker: PhantomData<fn() -> T>,
}

impl<T> PPtr<T> {
    pub const fn new(file_id: i32, path_id: i64) -> Self {
        Self {
            file_id,
            path_id,
            marker: PhantomData,
        }
    }

    pub const fn null() -> Self {
        Self::new(0, 0)
    }

    pub fn is_null(&self) -> bool {
        self.path_id == 0
    }

    /// The same identifiers typed as any asset.
    pub fn erase(self) -> PPtr<Object> {
        PPtr::new(self.file_id, self.path_id)
    }

    /// Path identifiers are 64-bit from 5.0, 32-bit before.
    pub fn has_wide_path_id(version: FormatVersion) -> bool {
        version.is_at_least(FormatVersion::series(5, 0))
    }

    pub fn read(reader: &mut AssetReader<'_>) -> Result<Self> {
        let file_id = reader.read_i32()?;
        let path_id = if Self::has_wide_path_id(reader.version()) {
            reader.read_i64()?
        } else {
            i64::from(reader.read_i32()?)
        };
        Ok(Self::new(file_id, path_id))
    }

    pub fn write(&self, writer: &mut AssetWriter) {
        writer.write_i32(self.file_id);
        if Self::has_wide_path_id(writer.version()) {
            writer.write_i64(self.path_id);
        } else {
            writer.write_i32(self.path_id as i32);
        }
    }
}

impl<T: AssetClass> PPtr<T> {
    /// Look the referenced asset up in the loaded file set.
    ///
    /// Null references, unknown dependency slots, files that are not loaded and
    /// missing path ids all resolve to `None`. A target of the wrong class also
    /// resolves to `None` and is logged. The target is never followed further.
    pub fn resolve<'c>(&self, file: &'c SerializedFile, collection: &'c FileCollection) -> Option<&'c AssetEntry> {
        if self.is_null() {
            return None;
        }

        let target = match self.file_id {
            0 => file,
            id if id > 0 => {
                let name = file.dependencies().get(usize::try_from(id - 1).ok()?)?;
                let Some(target) = collection.file(name) else {
                    debug!("Reference {self:?} targets {name}, which is not loaded");
                    return None;
                };
                target
            }
            _ => return None,
        };

        let entry = target.object(self.path_id)?;
        if !T::matches(entry.info.class_id) {
            warn!(
                "Reference {self:?} in {} points at {} {}, expected {}",
                file.name(),
                entry.info.class_id.name(),
                self.path_id,
                T::NAME
            );
            return None;
        }
        Some(entry)
    }
}

impl<T> Clone for PPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PPtr<T> {}

impl<T> PartialEq for PPtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.file_id == other.file_id && self.path_id == other.path_id
    }
}

impl<T> Eq for PPtr<T> {}

impl<T> Hash for PPtr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file_id.hash(state);
        self.path_id.hash(state);
    }
}

impl<T> Default for PPtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> fmt::Debug for PPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PPtr({}, {})", self.file_id, self.path_id)
    }
}

impl<T> Exportable for PPtr<T> {
    fn export(&self, _container: &ExportContainer) -> ExportNode {
        let mut node = ExportMapping::new();
        node.add("m_FileID", self.file_id);
        node.add("m_PathID", self.path_id);
        node.into()
    }
}
