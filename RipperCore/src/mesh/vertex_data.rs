//! Vertex data record

use tracing::debug;

use crate::error::Result;
use crate::export::{ExportContainer, ExportMapping, ExportNode, Exportable};
use crate::io::{ALIGN, AssetReader, AssetWriter, Endian};
use crate::version::FormatVersion;

use super::channel::{ChannelInfo, StreamInfo};
use super::codec::transpose_byte_order;
use super::layout::{
    self, ChannelKind, ExtendedChannel, LEGACY_STREAM_COUNT, LayoutEra, canonical_mask, resolve_channels,
    unsupported,
};

/// Flat vertex blob plus the tables that describe its layout.
///
/// Which tables are populated depends on the version the record was decoded
/// with: `streams` below 5.0, `channels` from 4.0, `current_channels` below 2018.1.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexData {
    pub current_channels: u32,
    pub vertex_count: u32,
    pub channels: Vec<ChannelInfo>,
    pub streams: Vec<StreamInfo>,
    pub data: Vec<u8>,
}

impl VertexData {
    pub fn read(reader: &mut AssetReader<'_>) -> Result<Self> {
        let version = reader.version();
        if !layout::has_vertex_data(version) {
            return Err(unsupported(version, "vertex data record"));
        }

        let mut vertex_data = Self::default();
        if layout::has_current_channels(version) {
            vertex_data.current_channels = reader.read_u32()?;
        }
        vertex_data.vertex_count = reader.read_u32()?;

        if layout::has_channel_table(version) {
            vertex_data.channels = reader.read_array(ChannelInfo::read)?;
            reader.align(ALIGN)?;
            if let Some(expected) = LayoutEra::of(version).table_len(version) {
                if vertex_data.channels.len() != expected {
                    return Err(unsupported(
                        version,
                        format!("{} channel slots, expected {expected}", vertex_data.channels.len()),
                    ));
                }
            }
        }

        if layout::has_stream_table(version) {
            vertex_data.streams = if layout::has_fixed_streams(version) {
                (0..LEGACY_STREAM_COUNT)
                    .map(|_| StreamInfo::read(reader))
                    .collect::<Result<Vec<_>>>()?
            } else {
                reader.read_array(StreamInfo::read)?
            };
        }

        vertex_data.data = reader.read_byte_array()?;
        reader.align(ALIGN)?;

        debug!(
            vertex_count = vertex_data.vertex_count,
            channels = vertex_data.channels.len(),
            streams = vertex_data.streams.len(),
            bytes = vertex_data.data.len(),
            "Read vertex data"
        );
        Ok(vertex_data)
    }

    pub fn write(&self, writer: &mut AssetWriter) -> Result<()> {
        let version = writer.version();
        if !layout::has_vertex_data(version) {
            return Err(unsupported(version, "vertex data record"));
        }

        if layout::has_current_channels(version) {
            writer.write_u32(self.current_channels);
        }
        writer.write_u32(self.vertex_count);

        if layout::has_channel_table(version) {
            writer.write_array(&self.channels, |w, channel| channel.write(w));
            writer.align(ALIGN);
        }

        if layout::has_stream_table(version) {
            if layout::has_fixed_streams(version) {
                for index in 0..LEGACY_STREAM_COUNT {
                    self.streams.get(index).copied().unwrap_or_default().write(writer);
                }
            } else {
                writer.write_array(&self.streams, |w, stream| stream.write(w));
            }
        }

        writer.write_byte_array(&self.data);
        writer.align(ALIGN);
        Ok(())
    }

    /// The canonical eight-slot channel table for this record.
    pub fn resolve_channels(&self, version: FormatVersion) -> Result<[ChannelInfo; 8]> {
        resolve_channels(version, &self.channels, &self.streams)
    }

    pub fn channel(&self, version: FormatVersion, kind: ChannelKind) -> Result<ChannelInfo> {
        Ok(self.resolve_channels(version)?[kind.index()])
    }

    /// Canonical current-channels mask.
    pub fn canonical_mask(&self, version: FormatVersion) -> Result<u32> {
        let resolved = self.resolve_channels(version)?;
        Ok(canonical_mask(version, self.current_channels, &resolved))
    }

    /// Start offset of `stream` in the blob, computed over `channels`.
    pub fn stream_offset(&self, channels: &[ChannelInfo], stream: u8) -> Result<usize> {
        layout::stream_offset(channels, stream, self.data.len(), self.vertex_count as usize)
    }

    /// Channel table in the shape of the export version.
    fn export_channels(&self, container: &ExportContainer) -> Result<Vec<ChannelInfo>> {
        let source = container.version();
        let extended_source = LayoutEra::of(source) == LayoutEra::ExtendedChannels;
        let extended_target = LayoutEra::of(container.export_version()) == LayoutEra::ExtendedChannels;

        if extended_source && extended_target {
            return Ok(self.channels.clone());
        }

        let resolved = self.resolve_channels(source)?;
        if extended_target {
            let mut table = vec![ChannelInfo::ABSENT; ExtendedChannel::COUNT];
            for kind in ChannelKind::ALL {
                table[ExtendedChannel::from_canonical(kind).index()] = resolved[kind.index()];
            }
            Ok(table)
        } else {
            Ok(resolved.to_vec())
        }
    }

    /// Export tree for the container's target version.
    ///
    /// Fails when the layout cannot be resolved or the blob cannot be transposed
    /// to little-endian.
    pub fn export(&self, container: &ExportContainer) -> Result<ExportNode> {
        let source = container.version();
        let channels = self
            .export_channels(container)?
            .iter()
            .map(|channel| channel.export(container))
            .collect::<Vec<_>>();

        let blob_endian = container.platform().vertex_endian();
        let data = transpose_byte_order(self, source, blob_endian, Endian::Little)?;

        let mut node = ExportMapping::new();
        node.add("serializedVersion", layout::serialized_version(container.export_version()));
        node.add("m_CurrentChannels", self.canonical_mask(source)?);
        node.add("m_VertexCount", self.vertex_count);
        node.add("m_Channels", channels);
        node.add("m_DataSize", self.data.len());
        node.add("_typelessdata", ExportNode::hex(&data));
        Ok(node.into())
    }
}
