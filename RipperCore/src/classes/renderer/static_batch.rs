//! Static batching sub-mesh range

use crate::error::Result;
use crate::export::{ExportContainer, ExportMapping, ExportNode, Exportable};
use crate::io::{AssetReader, AssetWriter};

/// Sub-mesh range a statically batched renderer draws from the combined mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaticBatchInfo {
    pub first_submesh: u16,
    pub submesh_count: u16,
}

impl StaticBatchInfo {
    /// Convert the subset index list used before 5.5.
    ///
    /// Subset indices are consecutive, so the range is the first index and the
    /// number of entries.
    pub fn from_subset_indices(indices: &[u32]) -> Self {
        Self {
            first_submesh: indices.first().map_or(0, |first| *first as u16),
            submesh_count: indices.len() as u16,
        }
    }

    pub fn read(reader: &mut AssetReader<'_>) -> Result<Self> {
        Ok(Self {
            first_submesh: reader.read_u16()?,
            submesh_count: reader.read_u16()?,
        })
    }

    pub fn write(&self, writer: &mut AssetWriter) {
        writer.write_u16(self.first_submesh);
        writer.write_u16(self.submesh_count);
    }
}

impl Exportable for StaticBatchInfo {
    fn export(&self, _container: &ExportContainer) -> ExportNode {
        let mut node = ExportMapping::new();
        node.add("firstSubMesh", self.first_submesh);
        node.add("subMeshCount", self.submesh_count);
        node.into()
    }
}
