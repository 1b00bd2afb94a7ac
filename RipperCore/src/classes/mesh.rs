//! Mesh record
//!
//! Only the name and the vertex data are carried; the record is the name
//! followed directly by the vertex data.

use crate::error::Result;
use crate::export::{ExportContainer, ExportMapping, ExportNode};
use crate::io::{AssetReader, AssetWriter};
use crate::mesh::{VertexAttributes, VertexData, decode_attributes};
use crate::version::FormatVersion;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mesh {
    pub name: String,
    pub vertex_data: VertexData,
}

impl Mesh {
    pub fn read(reader: &mut AssetReader<'_>) -> Result<Self> {
        let name = reader.read_string()?;
        let vertex_data = VertexData::read(reader)?;
        Ok(Self { name, vertex_data })
    }

    pub fn write(&self, writer: &mut AssetWriter) -> Result<()> {
        writer.write_string(&self.name);
        self.vertex_data.write(writer)
    }

    /// Decode the standard attributes of the vertex data written by `version`.
    pub fn attributes(&self, version: FormatVersion) -> Result<VertexAttributes> {
        decode_attributes(&self.vertex_data, version)
    }

    pub fn export(&self, container: &ExportContainer) -> Result<ExportNode> {
        let mut node = ExportMapping::new();
        node.add("m_Name", self.name.as_str());
        node.add("m_VertexData", self.vertex_data.export(container)?);
        Ok(node.into())
    }
}
