//! Vertex blob codec
//!
//! Decoders read little-endian blobs; data stored for a big-endian platform goes
//! through [`transpose_byte_order`] first.

use glam::{Vec2, Vec3, Vec4};
use half::f16;
use tracing::trace;

use crate::error::{Error, Result};
use crate::io::{AssetWriter, Endian};
use crate::version::{FormatVersion, TransferFlags};

use super::attributes::{ColorRGBA32, SkinWeights4, SubMesh, VertexAttributes};
use super::channel::{ChannelFormat, ChannelInfo, StreamInfo};
use super::layout::{
    self, ChannelKind, ExtendedChannel, LEGACY_STREAM_COUNT, LayoutEra, LegacyChannel, stream_stride,
};
use super::vertex_data::VertexData;

/// Where a channel's first element sits and how far apart vertices are.
#[derive(Debug, Clone, Copy)]
struct ChannelWalk {
    start: usize,
    stride: usize,
}

impl ChannelWalk {
    fn new(vertex_data: &VertexData, table: &[ChannelInfo], channel: ChannelInfo) -> Result<Self> {
        Ok(Self {
            start: vertex_data.stream_offset(table, channel.stream)? + usize::from(channel.offset),
            stride: stream_stride(table, channel.stream)?,
        })
    }

    fn at(&self, vertex: usize) -> usize {
        self.start + vertex * self.stride
    }
}

/// Table that stream strides and offsets are computed over.
///
/// The extended layout keeps skin channels outside the canonical eight slots, so
/// its full table is used; older layouts use the resolved table.
fn geometry_table(vertex_data: &VertexData, version: FormatVersion, resolved: &[ChannelInfo; 8]) -> Vec<ChannelInfo> {
    if LayoutEra::of(version) == LayoutEra::ExtendedChannels {
        vertex_data.channels.clone()
    } else {
        resolved.to_vec()
    }
}

fn slice_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    data.get(offset..offset + len).ok_or(Error::TruncatedInput {
        offset,
        needed: len,
        available: data.len().saturating_sub(offset),
    })
}

fn unsupported_format(channel: ChannelInfo) -> Error {
    Error::UnsupportedChannelFormat {
        format: channel.format.code(),
        dimension: channel.dimension,
    }
}

/// Read up to four components of one vertex as floats.
///
/// Byte components are normalized to `[0, 1]`. Components beyond the channel's
/// dimension stay 0.
fn read_components(data: &[u8], offset: usize, channel: ChannelInfo) -> Result<[f32; 4]> {
    let count = usize::from(channel.dimension).min(4);
    let mut out = [0.0; 4];
    match channel.format {
        ChannelFormat::Float => {
            let bytes = slice_at(data, offset, 4 * count)?;
            for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
                *value = Endian::Little.read_f32(chunk);
            }
        }
        ChannelFormat::Float16 => {
            let bytes = slice_at(data, offset, 2 * count)?;
            for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(2)) {
                *value = f16::from_bits(Endian::Little.read_u16(chunk)).to_f32();
            }
        }
        ChannelFormat::Byte => {
            let bytes = slice_at(data, offset, count)?;
            for (value, byte) in out.iter_mut().zip(bytes) {
                *value = f32::from(*byte) / 255.0;
            }
        }
        ChannelFormat::Color | ChannelFormat::Int | ChannelFormat::Unknown(_) => {
            return Err(unsupported_format(channel));
        }
    }
    Ok(out)
}

/// Decode positions for a sub-mesh range.
///
/// Fails with [`Error::RequiredChannelAbsent`] when the record has no position
/// channel, and with [`Error::UnsupportedChannelFormat`] unless positions are
/// three or more 32-bit floats.
pub fn decode_positions(vertex_data: &VertexData, version: FormatVersion, submesh: SubMesh) -> Result<Vec<Vec3>> {
    let channels = vertex_data.resolve_channels(version)?;
    let channel = channels[ChannelKind::Position.index()];
    if !channel.is_set() {
        return Err(Error::RequiredChannelAbsent {
            channel: ChannelKind::Position.name(),
        });
    }
    if channel.format != ChannelFormat::Float || channel.dimension < 3 {
        return Err(unsupported_format(channel));
    }

    let table = geometry_table(vertex_data, version, &channels);
    let walk = ChannelWalk::new(vertex_data, &table, channel)?;
    let first = submesh.first_vertex as usize;
    (first..first + submesh.vertex_count as usize)
        .map(|vertex| {
            let bytes = slice_at(&vertex_data.data, walk.at(vertex), 12)?;
            Ok(Vec3::new(
                Endian::Little.read_f32(&bytes[0..4]),
                Endian::Little.read_f32(&bytes[4..8]),
                Endian::Little.read_f32(&bytes[8..12]),
            ))
        })
        .collect()
}

/// Decode per-vertex skin influences.
///
/// Skin channels only exist in the extended layout. A record without a skin
/// weight channel is an unskinned mesh and yields an empty result.
pub fn decode_skin_weights(vertex_data: &VertexData, version: FormatVersion) -> Result<Vec<SkinWeights4>> {
    if LayoutEra::of(version) != LayoutEra::ExtendedChannels {
        return Ok(Vec::new());
    }
    let table = &vertex_data.channels;
    let Some(weight) = table.get(ExtendedChannel::SkinWeight.index()).copied().filter(ChannelInfo::is_set) else {
        return Ok(Vec::new());
    };
    let bone = table
        .get(ExtendedChannel::SkinBoneIndex.index())
        .copied()
        .filter(ChannelInfo::is_set)
        .ok_or(Error::RequiredChannelAbsent {
            channel: ExtendedChannel::SkinBoneIndex.name(),
        })?;
    if weight.format != ChannelFormat::Float {
        return Err(unsupported_format(weight));
    }
    if bone.format != ChannelFormat::Int {
        return Err(unsupported_format(bone));
    }

    let weight_walk = ChannelWalk::new(vertex_data, table, weight)?;
    let bone_walk = ChannelWalk::new(vertex_data, table, bone)?;
    let weight_count = usize::from(weight.dimension).min(4);
    let bone_count = usize::from(bone.dimension).min(4);

    (0..vertex_data.vertex_count as usize)
        .map(|vertex| {
            let mut skin = SkinWeights4::default();
            let weights = slice_at(&vertex_data.data, weight_walk.at(vertex), 4 * weight_count)?;
            for (value, chunk) in skin.weights.iter_mut().zip(weights.chunks_exact(4)) {
                *value = Endian::Little.read_f32(chunk);
            }
            let bones = slice_at(&vertex_data.data, bone_walk.at(vertex), 4 * bone_count)?;
            for (value, chunk) in skin.bone_indices.iter_mut().zip(bones.chunks_exact(4)) {
                *value = Endian::Little.read_i32(chunk);
            }
            Ok(skin)
        })
        .collect()
}

fn decode_floats(
    vertex_data: &VertexData,
    channels: &[ChannelInfo; 8],
    table: &[ChannelInfo],
    kind: ChannelKind,
) -> Result<Vec<[f32; 4]>> {
    let channel = channels[kind.index()];
    if !channel.is_set() {
        return Ok(Vec::new());
    }
    let walk = ChannelWalk::new(vertex_data, table, channel)?;
    (0..vertex_data.vertex_count as usize)
        .map(|vertex| read_components(&vertex_data.data, walk.at(vertex), channel))
        .collect()
}

fn decode_colors(
    vertex_data: &VertexData,
    channels: &[ChannelInfo; 8],
    table: &[ChannelInfo],
) -> Result<Vec<ColorRGBA32>> {
    let channel = channels[ChannelKind::Color.index()];
    if !channel.is_set() {
        return Ok(Vec::new());
    }
    let walk = ChannelWalk::new(vertex_data, table, channel)?;
    let packed = matches!(
        (channel.format, channel.dimension),
        (ChannelFormat::Color, 1) | (ChannelFormat::Byte, 4)
    );
    let float = matches!((channel.format, channel.dimension), (ChannelFormat::Float, 4));
    if !packed && !float {
        return Err(unsupported_format(channel));
    }

    (0..vertex_data.vertex_count as usize)
        .map(|vertex| {
            let offset = walk.at(vertex);
            if packed {
                let bytes = slice_at(&vertex_data.data, offset, 4)?;
                Ok(ColorRGBA32::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            } else {
                let [r, g, b, a] = read_components(&vertex_data.data, offset, channel)?;
                Ok(ColorRGBA32::from_normalized(Vec4::new(r, g, b, a)))
            }
        })
        .collect()
}

/// Decode every standard attribute of the record.
pub fn decode_attributes(vertex_data: &VertexData, version: FormatVersion) -> Result<VertexAttributes> {
    let channels = vertex_data.resolve_channels(version)?;
    let table = geometry_table(vertex_data, version, &channels);
    let to_vec3 = |c: [f32; 4]| Vec3::new(c[0], c[1], c[2]);
    let to_vec2 = |c: [f32; 4]| Vec2::new(c[0], c[1]);

    let positions = decode_floats(vertex_data, &channels, &table, ChannelKind::Position)?;
    let normals = decode_floats(vertex_data, &channels, &table, ChannelKind::Normal)?;
    let uv0 = decode_floats(vertex_data, &channels, &table, ChannelKind::Uv0)?;
    let uv1 = decode_floats(vertex_data, &channels, &table, ChannelKind::Uv1)?;
    let tangents = decode_floats(vertex_data, &channels, &table, ChannelKind::Tangent)?;

    Ok(VertexAttributes {
        positions: positions.into_iter().map(to_vec3).collect(),
        normals: normals.into_iter().map(to_vec3).collect(),
        colors: decode_colors(vertex_data, &channels, &table)?,
        uv0: uv0.into_iter().map(to_vec2).collect(),
        uv1: uv1.into_iter().map(to_vec2).collect(),
        tangents: tangents.into_iter().map(Vec4::from_array).collect(),
    })
}

/// Pack attribute arrays into a single interleaved stream.
///
/// Empty arrays mean the attribute is absent; every other array must have one
/// entry per position. Attributes are interleaved in legacy channel order
/// (position, normal, color, uv0, uv1, tangent) in stream 0, and the channel
/// and stream tables are shaped for `version`.
pub fn encode(
    version: FormatVersion,
    positions: &[Vec3],
    normals: &[Vec3],
    colors: &[ColorRGBA32],
    uv0: &[Vec2],
    uv1: &[Vec2],
    tangents: &[Vec4],
) -> Result<VertexData> {
    if !layout::has_vertex_data(version) {
        return Err(layout::unsupported(version, "vertex data record"));
    }

    let vertex_count = positions.len();
    let present = [
        (LegacyChannel::Position, vertex_count),
        (LegacyChannel::Normal, normals.len()),
        (LegacyChannel::Color, colors.len()),
        (LegacyChannel::Uv0, uv0.len()),
        (LegacyChannel::Uv1, uv1.len()),
        (LegacyChannel::Tangent, tangents.len()),
    ];
    for (kind, len) in present {
        if len != 0 && len != vertex_count {
            return Err(Error::InvalidFormat(format!(
                "{} has {len} entries for {vertex_count} vertices",
                kind.canonical().name()
            )));
        }
    }
    let kinds: Vec<LegacyChannel> = present
        .iter()
        .filter(|(_, len)| *len != 0)
        .map(|(kind, _)| *kind)
        .collect();

    let mut writer = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
    for (vertex, position) in positions.iter().enumerate() {
        writer.write_vec3(*position);
        if let Some(normal) = normals.get(vertex) {
            writer.write_vec3(*normal);
        }
        if let Some(color) = colors.get(vertex) {
            writer.write_bytes(&color.to_bytes());
        }
        if let Some(uv) = uv0.get(vertex) {
            writer.write_vec2(*uv);
        }
        if let Some(uv) = uv1.get(vertex) {
            writer.write_vec2(*uv);
        }
        if let Some(tangent) = tangents.get(vertex) {
            writer.write_vec4(*tangent);
        }
    }

    let legacy_mask = kinds.iter().fold(0u32, |mask, kind| mask | (1 << kind.bit()));
    let stride: u32 = kinds.iter().map(|kind| u32::from(kind.stride())).sum();

    // (kind, offset) within stream 0
    let mut placed = Vec::with_capacity(kinds.len());
    let mut offset = 0u8;
    for kind in &kinds {
        placed.push((*kind, offset));
        offset += kind.stride();
    }

    let mut vertex_data = VertexData {
        vertex_count: vertex_count as u32,
        data: writer.into_bytes(),
        ..VertexData::default()
    };

    match LayoutEra::of(version) {
        LayoutEra::LegacyStreams => {
            vertex_data.current_channels = legacy_mask;
            vertex_data.streams = vec![StreamInfo::default(); LEGACY_STREAM_COUNT];
            vertex_data.streams[0] = StreamInfo::new(legacy_mask, 0, stride);
        }
        LayoutEra::ExplicitChannels if layout::has_stream_table(version) => {
            let mut channels = vec![ChannelInfo::ABSENT; LegacyChannel::ALL.len()];
            for (kind, offset) in &placed {
                channels[kind.bit() as usize] = ChannelInfo::new(0, *offset, kind.format(), kind.dimension());
            }
            vertex_data.current_channels = legacy_mask;
            vertex_data.channels = channels;
            vertex_data.streams = vec![StreamInfo::new(legacy_mask, 0, stride)];
        }
        LayoutEra::ExplicitChannels => {
            let channels = canonical_table(&placed);
            vertex_data.current_channels = channels
                .iter()
                .enumerate()
                .filter(|(_, channel)| channel.is_set())
                .fold(0, |mask, (index, _)| mask | (1 << index));
            vertex_data.channels = channels.to_vec();
        }
        LayoutEra::ExtendedChannels => {
            let canonical = canonical_table(&placed);
            let mut channels = vec![ChannelInfo::ABSENT; ExtendedChannel::COUNT];
            for kind in ChannelKind::ALL {
                channels[ExtendedChannel::from_canonical(kind).index()] = canonical[kind.index()];
            }
            vertex_data.channels = channels;
        }
    }
    Ok(vertex_data)
}

/// Canonical table for channels placed in stream 0; colors are four bytes.
fn canonical_table(placed: &[(LegacyChannel, u8)]) -> [ChannelInfo; 8] {
    let mut channels = [ChannelInfo::ABSENT; 8];
    for (kind, offset) in placed {
        channels[kind.canonical().index()] = match kind {
            LegacyChannel::Color => ChannelInfo::new(0, *offset, ChannelFormat::Byte, 4),
            _ => ChannelInfo::new(0, *offset, kind.format(), kind.dimension()),
        };
    }
    channels
}

/// Copy of the blob with every channel element converted from `source` to
/// `dest` byte order.
///
/// Elements are swapped component by component at their own width; bytes not
/// covered by any channel are copied unchanged.
pub fn transpose_byte_order(
    vertex_data: &VertexData,
    version: FormatVersion,
    source: Endian,
    dest: Endian,
) -> Result<Vec<u8>> {
    let mut out = vertex_data.data.clone();
    if source == dest {
        return Ok(out);
    }

    let table = geometry_table(vertex_data, version, &vertex_data.resolve_channels(version)?);

    for channel in table.iter().copied().filter(ChannelInfo::is_set) {
        let dimension = usize::from(channel.dimension);
        let (unit, units) = match channel.format {
            ChannelFormat::Float | ChannelFormat::Int => (4, dimension),
            ChannelFormat::Float16 => (2, dimension),
            ChannelFormat::Color => (4, 1),
            ChannelFormat::Byte if layout::has_stream_table(version) => (4, 1),
            ChannelFormat::Byte => (1, dimension),
            ChannelFormat::Unknown(_) => return Err(unsupported_format(channel)),
        };

        let walk = ChannelWalk::new(vertex_data, &table, channel)?;
        trace!(
            stream = channel.stream,
            offset = channel.offset,
            unit,
            units,
            "Transposing channel"
        );

        for vertex in 0..vertex_data.vertex_count as usize {
            let base = walk.at(vertex);
            slice_at(&out, base, unit * units)?;
            for component in 0..units {
                let at = base + component * unit;
                match unit {
                    4 => {
                        let value = source.read_u32(&vertex_data.data[at..]);
                        dest.write_u32(&mut out[at..], value);
                    }
                    2 => {
                        let value = source.read_u16(&vertex_data.data[at..]);
                        dest.write_u16(&mut out[at..], value);
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(s: &str) -> FormatVersion {
        s.parse().unwrap()
    }

    fn positions() -> Vec<Vec3> {
        vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 5.5, 0.25)]
    }

    fn uvs() -> Vec<Vec2> {
        vec![Vec2::new(0.0, 1.0), Vec2::new(0.5, 0.75)]
    }

    #[test]
    fn test_encode_decode_positions_and_uv0() {
        for version in ["3.5.7f1", "4.7.2f1", "5.6.0f3", "2017.4.40f1", "2018.1.0f2", "2020.3.1f1"] {
            let version = v(version);
            let encoded = encode(version, &positions(), &[], &[], &uvs(), &[], &[]).unwrap();
            assert_eq!(encoded.data.len(), 2 * 20);

            let decoded = decode_attributes(&encoded, version).unwrap();
            let expected = VertexAttributes {
                positions: positions(),
                uv0: uvs(),
                ..VertexAttributes::default()
            };
            assert_eq!(decoded, expected, "version {version}");
        }
    }

    #[test]
    fn test_encode_all_attributes() {
        let version = v("4.7.2f1");
        let normals = vec![Vec3::Y, Vec3::Z];
        let colors = vec![ColorRGBA32::new(255, 0, 0, 255), ColorRGBA32::new(1, 2, 3, 4)];
        let tangents = vec![Vec4::new(1.0, 0.0, 0.0, -1.0), Vec4::X];

        let encoded = encode(version, &positions(), &normals, &colors, &uvs(), &uvs(), &tangents).unwrap();
        assert_eq!(encoded.streams[0].stride, 60);
        assert_eq!(encoded.current_channels, 0b11_1111);
        assert_eq!(encoded.canonical_mask(version).unwrap(), 0b1001_1111);

        let decoded = decode_attributes(&encoded, version).unwrap();
        assert_eq!(decoded.normals, normals);
        assert_eq!(decoded.colors, colors);
        assert_eq!(decoded.uv1, uvs());
        assert_eq!(decoded.tangents, tangents);
    }

    #[test]
    fn test_encode_rejects_mismatched_lengths() {
        let result = encode(v("5.6.0f3"), &positions(), &[Vec3::ZERO], &[], &[], &[], &[]);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_decode_positions_for_submesh() {
        let version = v("2017.4.40f1");
        let encoded = encode(version, &positions(), &[], &[], &uvs(), &[], &[]).unwrap();
        let second = decode_positions(&encoded, version, SubMesh::new(1, 1)).unwrap();
        assert_eq!(second, vec![positions()[1]]);
    }

    #[test]
    fn test_decode_positions_without_position_channel() {
        let version = v("5.6.0f3");
        let mut vertex_data = encode(version, &positions(), &[], &[], &[], &[], &[]).unwrap();
        vertex_data.channels[ChannelKind::Position.index()] = ChannelInfo::ABSENT;

        let result = decode_positions(&vertex_data, version, SubMesh::all(2));
        assert!(matches!(result, Err(Error::RequiredChannelAbsent { channel: "position" })));
    }

    #[test]
    fn test_decode_positions_out_of_range() {
        let version = v("5.6.0f3");
        let vertex_data = encode(version, &positions(), &[], &[], &[], &[], &[]).unwrap();
        let result = decode_positions(&vertex_data, version, SubMesh::new(1, 2));
        assert!(matches!(result, Err(Error::TruncatedInput { .. })));
    }

    #[test]
    fn test_absent_skin_is_empty() {
        let version = v("2019.4.1f1");
        let vertex_data = encode(version, &positions(), &[], &[], &[], &[], &[]).unwrap();
        assert!(decode_skin_weights(&vertex_data, version).unwrap().is_empty());

        let old = v("5.6.0f3");
        let vertex_data = encode(old, &positions(), &[], &[], &[], &[], &[]).unwrap();
        assert!(decode_skin_weights(&vertex_data, old).unwrap().is_empty());
    }

    fn skinned(version: FormatVersion) -> VertexData {
        let mut w = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
        // stream 0: positions, stream 1: weights(4 f32) + indices(4 i32)
        for vertex in 0..2 {
            w.write_vec3(Vec3::splat(vertex as f32));
        }
        for vertex in 0..2 {
            for weight in [0.5f32, 0.25, 0.25, 0.0] {
                w.write_f32(weight);
            }
            for index in 0..4 {
                w.write_i32(vertex * 10 + index);
            }
        }

        let mut channels = vec![ChannelInfo::ABSENT; ExtendedChannel::COUNT];
        channels[ExtendedChannel::Position.index()] = ChannelInfo::new(0, 0, ChannelFormat::Float, 3);
        channels[ExtendedChannel::SkinWeight.index()] = ChannelInfo::new(1, 0, ChannelFormat::Float, 4);
        channels[ExtendedChannel::SkinBoneIndex.index()] = ChannelInfo::new(1, 16, ChannelFormat::Int, 4);
        VertexData {
            current_channels: 0,
            vertex_count: 2,
            channels,
            streams: Vec::new(),
            data: w.into_bytes(),
        }
    }

    #[test]
    fn test_skin_weights_from_second_stream() {
        let version = v("2019.4.1f1");
        let skin = decode_skin_weights(&skinned(version), version).unwrap();
        assert_eq!(skin.len(), 2);
        assert_eq!(skin[1].weights, [0.5, 0.25, 0.25, 0.0]);
        assert_eq!(skin[1].bone_indices, [10, 11, 12, 13]);
    }

    fn write_skin(w: &mut AssetWriter, vertex: i32) {
        for weight in [1.0f32, 0.0, 0.0, 0.0] {
            w.write_f32(weight);
        }
        for index in 0..4 {
            w.write_i32(vertex * 4 + index);
        }
    }

    #[test]
    fn test_uv_stream_before_skin_stream() {
        let version = v("2019.4.1f1");
        let mut w = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
        // stream 0: positions, stream 1: uv0, stream 2: weights + indices
        for vertex in 0..2 {
            w.write_vec3(Vec3::splat(vertex as f32 + 1.0));
        }
        for vertex in 0..2 {
            w.write_vec2(Vec2::new(10.0 + vertex as f32, 20.0));
        }
        for vertex in 0..2 {
            write_skin(&mut w, vertex);
        }

        let mut channels = vec![ChannelInfo::ABSENT; ExtendedChannel::COUNT];
        channels[ExtendedChannel::Position.index()] = ChannelInfo::new(0, 0, ChannelFormat::Float, 3);
        channels[ExtendedChannel::Uv0.index()] = ChannelInfo::new(1, 0, ChannelFormat::Float, 2);
        channels[ExtendedChannel::SkinWeight.index()] = ChannelInfo::new(2, 0, ChannelFormat::Float, 4);
        channels[ExtendedChannel::SkinBoneIndex.index()] = ChannelInfo::new(2, 16, ChannelFormat::Int, 4);
        let vertex_data = VertexData {
            vertex_count: 2,
            channels,
            data: w.into_bytes(),
            ..VertexData::default()
        };
        assert_eq!(vertex_data.data.len(), 2 * (12 + 8 + 32));

        let attributes = decode_attributes(&vertex_data, version).unwrap();
        assert_eq!(attributes.positions, vec![Vec3::ONE, Vec3::splat(2.0)]);
        assert_eq!(attributes.uv0, vec![Vec2::new(10.0, 20.0), Vec2::new(11.0, 20.0)]);

        let skin = decode_skin_weights(&vertex_data, version).unwrap();
        assert_eq!(skin[1].bone_indices, [4, 5, 6, 7]);
    }

    #[test]
    fn test_skin_interleaved_with_positions() {
        let version = v("2019.4.1f1");
        let mut w = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
        for vertex in 0..2 {
            w.write_vec3(Vec3::splat(vertex as f32 + 1.0));
            write_skin(&mut w, vertex);
        }

        let mut channels = vec![ChannelInfo::ABSENT; ExtendedChannel::COUNT];
        channels[ExtendedChannel::Position.index()] = ChannelInfo::new(0, 0, ChannelFormat::Float, 3);
        channels[ExtendedChannel::SkinWeight.index()] = ChannelInfo::new(0, 12, ChannelFormat::Float, 4);
        channels[ExtendedChannel::SkinBoneIndex.index()] = ChannelInfo::new(0, 28, ChannelFormat::Int, 4);
        let vertex_data = VertexData {
            vertex_count: 2,
            channels,
            data: w.into_bytes(),
            ..VertexData::default()
        };

        let positions = decode_positions(&vertex_data, version, SubMesh::all(2)).unwrap();
        assert_eq!(positions, vec![Vec3::ONE, Vec3::splat(2.0)]);
        let second = decode_positions(&vertex_data, version, SubMesh::new(1, 1)).unwrap();
        assert_eq!(second, vec![Vec3::splat(2.0)]);
        assert_eq!(decode_skin_weights(&vertex_data, version).unwrap()[1].bone_indices, [4, 5, 6, 7]);
    }

    #[test]
    fn test_skin_weights_without_bone_indices() {
        let version = v("2019.4.1f1");
        let mut vertex_data = skinned(version);
        vertex_data.channels[ExtendedChannel::SkinBoneIndex.index()] = ChannelInfo::ABSENT;
        assert!(matches!(
            decode_skin_weights(&vertex_data, version),
            Err(Error::RequiredChannelAbsent { .. })
        ));
    }

    #[test]
    fn test_transpose_swaps_per_component() {
        let version = v("2019.4.1f1");
        let vertex_data = skinned(version);
        let swapped = transpose_byte_order(&vertex_data, version, Endian::Little, Endian::Big).unwrap();

        // first position component of vertex 1 (1.0f32)
        assert_eq!(&swapped[12..16], &1.0f32.to_be_bytes());
        // bone index 13 of vertex 1
        assert_eq!(&swapped[24 + 32 + 28..24 + 32 + 32], &13i32.to_be_bytes());

        let back = transpose_byte_order(
            &VertexData { data: swapped, ..vertex_data.clone() },
            version,
            Endian::Big,
            Endian::Little,
        )
        .unwrap();
        assert_eq!(back, vertex_data.data);
    }

    #[test]
    fn test_transpose_color_and_half() {
        let version = v("5.6.0f3");
        let mut channels = vec![ChannelInfo::ABSENT; 8];
        channels[ChannelKind::Color.index()] = ChannelInfo::new(0, 0, ChannelFormat::Byte, 4);
        channels[ChannelKind::Uv0.index()] = ChannelInfo::new(0, 4, ChannelFormat::Float16, 2);
        let vertex_data = VertexData {
            current_channels: 0,
            vertex_count: 1,
            channels,
            streams: Vec::new(),
            data: vec![1, 2, 3, 4, 0xAA, 0xBB, 0xCC, 0xDD],
        };
        let swapped = transpose_byte_order(&vertex_data, version, Endian::Big, Endian::Little).unwrap();
        assert_eq!(swapped, vec![1, 2, 3, 4, 0xBB, 0xAA, 0xDD, 0xCC]);

        // below 5.0 four-byte colors move as one packed word
        let old = v("4.7.2f1");
        let mut old_channels = vec![ChannelInfo::ABSENT; 6];
        old_channels[LegacyChannel::Color.bit() as usize] = ChannelInfo::new(0, 0, ChannelFormat::Color, 1);
        let old_data = VertexData {
            current_channels: 1 << LegacyChannel::Color.bit(),
            vertex_count: 1,
            channels: old_channels,
            streams: vec![StreamInfo::new(1 << LegacyChannel::Color.bit(), 0, 4)],
            data: vec![1, 2, 3, 4],
        };
        let swapped = transpose_byte_order(&old_data, old, Endian::Big, Endian::Little).unwrap();
        assert_eq!(swapped, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_transpose_unknown_format_fails() {
        let version = v("5.6.0f3");
        let mut vertex_data = encode(version, &positions(), &[], &[], &[], &[], &[]).unwrap();
        vertex_data.channels[ChannelKind::Normal.index()] = ChannelInfo::new(0, 0, ChannelFormat::Unknown(12), 3);
        let result = transpose_byte_order(&vertex_data, version, Endian::Big, Endian::Little);
        assert!(matches!(result, Err(Error::UnsupportedChannelFormat { format: 12, .. })));
    }
}
