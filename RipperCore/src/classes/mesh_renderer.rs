//! Mesh renderer component

use crate::error::Result;
use crate::export::{ExportContainer, ExportNode, Exportable};
use crate::io::{AssetReader, AssetWriter};
use crate::version::FormatVersion;

use super::Dependency;
use super::pptr::{Mesh, PPtr};
use super::renderer::Renderer;

/// 5.0 and later.
pub fn has_additional_vertex_streams(version: FormatVersion) -> bool {
    version.is_at_least(FormatVersion::series(5, 0))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshRenderer {
    pub renderer: Renderer,
    /// Per-instance vertex data overriding streams of the drawn mesh.
    pub additional_vertex_streams: PPtr<Mesh>,
}

impl MeshRenderer {
    pub fn read(reader: &mut AssetReader<'_>) -> Result<Self> {
        let renderer = Renderer::read(reader)?;
        let additional_vertex_streams = if has_additional_vertex_streams(reader.version()) {
            PPtr::read(reader)?
        } else {
            PPtr::null()
        };
        Ok(Self {
            renderer,
            additional_vertex_streams,
        })
    }

    pub fn write(&self, writer: &mut AssetWriter) {
        self.renderer.write(writer);
        if has_additional_vertex_streams(writer.version()) {
            self.additional_vertex_streams.write(writer);
        }
    }

    pub fn dependencies(&self) -> impl Iterator<Item = Dependency> + '_ {
        let streams = Some(Dependency::new(
            "m_AdditionalVertexStreams",
            self.additional_vertex_streams.erase(),
        ))
        .filter(|dependency| !dependency.reference.is_null());
        self.renderer.dependencies().chain(streams)
    }
}

impl Exportable for MeshRenderer {
    fn export(&self, container: &ExportContainer) -> ExportNode {
        let mut node = self.renderer.export_mapping(container);
        node.add(
            "m_AdditionalVertexStreams",
            container
                .field(
                    |v, _| has_additional_vertex_streams(v),
                    self.additional_vertex_streams,
                    PPtr::null(),
                )
                .export(container),
        );
        node.into()
    }
}
