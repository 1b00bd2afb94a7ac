//! Asset records
//!
//! Component records embed [`object::CommonFields`] and decode it before their
//! own fields. [`Asset`] is the closed set of kinds this crate understands; every
//! other class keeps its raw bytes.

pub mod mesh;
pub mod mesh_renderer;
pub mod object;
pub mod pptr;
pub mod renderer;

use std::fmt;

use crate::error::Result;
use crate::io::{AssetReader, AssetWriter};

use mesh::Mesh;
use mesh_renderer::MeshRenderer;
use pptr::{Object, PPtr};

/// Persistent class identifier of an asset kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassId {
    GameObject,
    Transform,
    Material,
    MeshRenderer,
    Mesh,
    Prefab,
    LightmapParameters,
    Unknown(i32),
}

impl ClassId {
    pub fn from_i32(code: i32) -> Self {
        match code {
            1 => ClassId::GameObject,
            4 => ClassId::Transform,
            21 => ClassId::Material,
            23 => ClassId::MeshRenderer,
            43 => ClassId::Mesh,
            1001 => ClassId::Prefab,
            1113 => ClassId::LightmapParameters,
            other => ClassId::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ClassId::GameObject => 1,
            ClassId::Transform => 4,
            ClassId::Material => 21,
            ClassId::MeshRenderer => 23,
            ClassId::Mesh => 43,
            ClassId::Prefab => 1001,
            ClassId::LightmapParameters => 1113,
            ClassId::Unknown(code) => code,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ClassId::GameObject => "GameObject",
            ClassId::Transform => "Transform",
            ClassId::Material => "Material",
            ClassId::MeshRenderer => "MeshRenderer",
            ClassId::Mesh => "Mesh",
            ClassId::Prefab => "Prefab",
            ClassId::LightmapParameters => "LightmapParameters",
            ClassId::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassId::Unknown(code) => write!(f, "Unknown({code})"),
            known => f.write_str(known.name()),
        }
    }
}

/// Reference found while walking a decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    /// Serialized name of the field holding the reference.
    pub field: &'static str,
    pub reference: PPtr<Object>,
}

impl Dependency {
    pub fn new(field: &'static str, reference: PPtr<Object>) -> Self {
        Self { field, reference }
    }
}

/// Decoded asset.
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Mesh(Mesh),
    MeshRenderer(MeshRenderer),
    /// Class without a record; the region is kept verbatim.
    Unknown { class_id: ClassId, data: Vec<u8> },
}

impl Asset {
    /// Decode the region under `reader` as a record of `class_id`.
    pub fn decode(class_id: ClassId, reader: &mut AssetReader<'_>) -> Result<Self> {
        match class_id {
            ClassId::Mesh => Ok(Asset::Mesh(Mesh::read(reader)?)),
            ClassId::MeshRenderer => Ok(Asset::MeshRenderer(MeshRenderer::read(reader)?)),
            _ => {
                let data = reader.take(reader.remaining())?.to_vec();
                Ok(Asset::Unknown { class_id, data })
            }
        }
    }

    pub fn write(&self, writer: &mut AssetWriter) -> Result<()> {
        match self {
            Asset::Mesh(mesh) => mesh.write(writer)?,
            Asset::MeshRenderer(renderer) => renderer.write(writer),
            Asset::Unknown { data, .. } => writer.write_bytes(data),
        }
        Ok(())
    }

    pub fn class_id(&self) -> ClassId {
        match self {
            Asset::Mesh(_) => ClassId::Mesh,
            Asset::MeshRenderer(_) => ClassId::MeshRenderer,
            Asset::Unknown { class_id, .. } => *class_id,
        }
    }

    /// References held by the record, produced on demand.
    pub fn dependencies(&self) -> impl Iterator<Item = Dependency> + '_ {
        let renderer = match self {
            Asset::MeshRenderer(renderer) => Some(renderer.dependencies()),
            Asset::Mesh(_) | Asset::Unknown { .. } => None,
        };
        renderer.into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Endian;
    use crate::version::TransferFlags;

    #[test]
    fn test_class_codes() {
        for code in [1, 4, 21, 23, 43, 1001, 1113, 114] {
            assert_eq!(ClassId::from_i32(code).code(), code);
        }
        assert_eq!(ClassId::from_i32(114), ClassId::Unknown(114));
        assert_eq!(ClassId::MeshRenderer.to_string(), "MeshRenderer");
    }

    #[test]
    fn test_mesh_class_decodes_vertex_data() {
        let version = "2019.4.1f1".parse().unwrap();
        let mesh = Mesh {
            name: "Quad".to_string(),
            vertex_data: crate::mesh::encode(version, &[glam::Vec3::ZERO, glam::Vec3::X], &[], &[], &[], &[], &[])
                .unwrap(),
        };
        let mut w = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
        mesh.write(&mut w).unwrap();
        let bytes = w.into_bytes();

        let mut r = AssetReader::new(&bytes, Endian::Little, version, TransferFlags::empty());
        let asset = Asset::decode(ClassId::Mesh, &mut r).unwrap();
        assert_eq!(asset.class_id(), ClassId::Mesh);
        assert_eq!(asset.dependencies().count(), 0);
        assert_eq!(asset, Asset::Mesh(mesh));
    }

    #[test]
    fn test_unknown_class_keeps_bytes() {
        let bytes = [1u8, 2, 3, 4, 5];
        let version = "2018.3.0f2".parse().unwrap();
        let mut r = AssetReader::new(&bytes, Endian::Little, version, TransferFlags::empty());
        let asset = Asset::decode(ClassId::from_i32(114), &mut r).unwrap();
        assert_eq!(asset.class_id(), ClassId::Unknown(114));
        assert_eq!(asset.dependencies().count(), 0);

        let mut w = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
        asset.write(&mut w).unwrap();
        assert_eq!(w.into_bytes(), bytes);
    }
}
