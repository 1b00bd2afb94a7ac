//! Channel layout resolution across format eras
//!
//! The vertex channel table changed shape three times:
//!
//! - **Legacy streams** (below 4.0): four fixed streams, each with a mask of the
//!   channel kinds it stores. Channel placement is derived from the masks.
//! - **Explicit channels** (4.0 up to 2018.1): a channel table is serialized. Until
//!   5.0 it has six slots and keeps the packed color format; from 5.0 it has the
//!   eight canonical slots.
//! - **Extended channels** (2018.1+): fourteen slots including eight UV sets and
//!   separate skin weight / bone index channels.
//!
//! [`resolve_channels`] folds all three into the canonical eight-slot table.

use crate::error::{Error, Result};
use crate::version::FormatVersion;

use super::channel::{ChannelFormat, ChannelInfo, StreamInfo};

// ==================== Version gates ====================

/// The current-channels mask is serialized: below 2018.1.
pub fn has_current_channels(version: FormatVersion) -> bool {
    version.is_below(FormatVersion::series(2018, 1))
}

/// The channel table is serialized: 4.0 and later.
pub fn has_channel_table(version: FormatVersion) -> bool {
    version.is_at_least(FormatVersion::series(4, 0))
}

/// The stream table is serialized: below 5.0.
pub fn has_stream_table(version: FormatVersion) -> bool {
    version.is_below(FormatVersion::series(5, 0))
}

/// The stream table has exactly four entries without a count: below 4.0.
pub fn has_fixed_streams(version: FormatVersion) -> bool {
    version.is_below(FormatVersion::series(4, 0))
}

/// Vertex data exists as a separate record: 3.5 and later.
pub fn has_vertex_data(version: FormatVersion) -> bool {
    version.is_at_least(FormatVersion::series(3, 5))
}

/// Serialized version of the vertex data record: 2 from 2018.1, 1 before.
pub fn serialized_version(version: FormatVersion) -> i32 {
    if version.is_at_least(FormatVersion::series(2018, 1)) { 2 } else { 1 }
}

/// Number of streams in the fixed legacy table.
pub const LEGACY_STREAM_COUNT: usize = 4;

// ==================== Channel kinds ====================

/// Canonical channel slot, the index into a resolved eight-slot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Position,
    Normal,
    Color,
    Uv0,
    Uv1,
    Uv2,
    Uv3,
    Tangent,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 8] = [
        ChannelKind::Position,
        ChannelKind::Normal,
        ChannelKind::Color,
        ChannelKind::Uv0,
        ChannelKind::Uv1,
        ChannelKind::Uv2,
        ChannelKind::Uv3,
        ChannelKind::Tangent,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::Position => "position",
            ChannelKind::Normal => "normal",
            ChannelKind::Color => "color",
            ChannelKind::Uv0 => "uv0",
            ChannelKind::Uv1 => "uv1",
            ChannelKind::Uv2 => "uv2",
            ChannelKind::Uv3 => "uv3",
            ChannelKind::Tangent => "tangent",
        }
    }
}

/// Channel kinds of the six-slot layout used before 5.0.
///
/// The discriminant is the bit index in stream masks and in the current-channels
/// mask of those versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyChannel {
    Position,
    Normal,
    Color,
    Uv0,
    Uv1,
    Tangent,
}

impl LegacyChannel {
    pub const ALL: [LegacyChannel; 6] = [
        LegacyChannel::Position,
        LegacyChannel::Normal,
        LegacyChannel::Color,
        LegacyChannel::Uv0,
        LegacyChannel::Uv1,
        LegacyChannel::Tangent,
    ];

    pub fn bit(self) -> u32 {
        self as u32
    }

    pub fn format(self) -> ChannelFormat {
        match self {
            LegacyChannel::Color => ChannelFormat::Color,
            _ => ChannelFormat::Float,
        }
    }

    pub fn dimension(self) -> u8 {
        match self {
            LegacyChannel::Position | LegacyChannel::Normal => 3,
            LegacyChannel::Color => 1,
            LegacyChannel::Uv0 | LegacyChannel::Uv1 => 2,
            LegacyChannel::Tangent => 4,
        }
    }

    /// Bytes per vertex.
    pub fn stride(self) -> u8 {
        match self {
            LegacyChannel::Position | LegacyChannel::Normal => 12,
            LegacyChannel::Color => 4,
            LegacyChannel::Uv0 | LegacyChannel::Uv1 => 8,
            LegacyChannel::Tangent => 16,
        }
    }

    pub fn canonical(self) -> ChannelKind {
        match self {
            LegacyChannel::Position => ChannelKind::Position,
            LegacyChannel::Normal => ChannelKind::Normal,
            LegacyChannel::Color => ChannelKind::Color,
            LegacyChannel::Uv0 => ChannelKind::Uv0,
            LegacyChannel::Uv1 => ChannelKind::Uv1,
            LegacyChannel::Tangent => ChannelKind::Tangent,
        }
    }
}

/// Channel slots of the fourteen-slot table serialized from 2018.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendedChannel {
    Position,
    Normal,
    Tangent,
    Color,
    Uv0,
    Uv1,
    Uv2,
    Uv3,
    Uv4,
    Uv5,
    Uv6,
    Uv7,
    SkinWeight,
    SkinBoneIndex,
}

impl ExtendedChannel {
    pub const COUNT: usize = 14;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ExtendedChannel::SkinWeight => "skin weight",
            ExtendedChannel::SkinBoneIndex => "skin bone index",
            other => other.canonical().map_or("extra uv", ChannelKind::name),
        }
    }

    /// Canonical slot this channel maps to, if any.
    pub fn canonical(self) -> Option<ChannelKind> {
        match self {
            ExtendedChannel::Position => Some(ChannelKind::Position),
            ExtendedChannel::Normal => Some(ChannelKind::Normal),
            ExtendedChannel::Tangent => Some(ChannelKind::Tangent),
            ExtendedChannel::Color => Some(ChannelKind::Color),
            ExtendedChannel::Uv0 => Some(ChannelKind::Uv0),
            ExtendedChannel::Uv1 => Some(ChannelKind::Uv1),
            ExtendedChannel::Uv2 => Some(ChannelKind::Uv2),
            ExtendedChannel::Uv3 => Some(ChannelKind::Uv3),
            _ => None,
        }
    }

    /// The extended slot holding a canonical kind.
    pub fn from_canonical(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::Position => ExtendedChannel::Position,
            ChannelKind::Normal => ExtendedChannel::Normal,
            ChannelKind::Color => ExtendedChannel::Color,
            ChannelKind::Uv0 => ExtendedChannel::Uv0,
            ChannelKind::Uv1 => ExtendedChannel::Uv1,
            ChannelKind::Uv2 => ExtendedChannel::Uv2,
            ChannelKind::Uv3 => ExtendedChannel::Uv3,
            ChannelKind::Tangent => ExtendedChannel::Tangent,
        }
    }
}

// ==================== Eras ====================

/// Shape of the channel table for a format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutEra {
    LegacyStreams,
    ExplicitChannels,
    ExtendedChannels,
}

impl LayoutEra {
    pub fn of(version: FormatVersion) -> Self {
        if !has_channel_table(version) {
            LayoutEra::LegacyStreams
        } else if has_current_channels(version) {
            LayoutEra::ExplicitChannels
        } else {
            LayoutEra::ExtendedChannels
        }
    }

    /// Serialized channel table length, `None` when no table is serialized.
    pub fn table_len(self, version: FormatVersion) -> Option<usize> {
        match self {
            LayoutEra::LegacyStreams => None,
            LayoutEra::ExplicitChannels if has_stream_table(version) => Some(LegacyChannel::ALL.len()),
            LayoutEra::ExplicitChannels => Some(ChannelKind::ALL.len()),
            LayoutEra::ExtendedChannels => Some(ExtendedChannel::COUNT),
        }
    }
}

pub(crate) fn unsupported(version: FormatVersion, context: impl Into<String>) -> Error {
    Error::UnsupportedRevision {
        version: version.to_string(),
        context: context.into(),
    }
}

// ==================== Resolution ====================

/// Fold a serialized layout into the canonical eight-slot table.
///
/// `channels` is the serialized channel table (empty below 4.0), `streams` the
/// serialized stream table (empty from 5.0). Absent slots carry `dimension == 0`.
pub fn resolve_channels(
    version: FormatVersion,
    channels: &[ChannelInfo],
    streams: &[StreamInfo],
) -> Result<[ChannelInfo; 8]> {
    let era = LayoutEra::of(version);
    if let Some(expected) = era.table_len(version) {
        if channels.len() != expected {
            return Err(unsupported(
                version,
                format!("channel table has {} slots, expected {expected}", channels.len()),
            ));
        }
    }

    let mut resolved = [ChannelInfo::ABSENT; 8];
    match era {
        LayoutEra::LegacyStreams => {
            for kind in LegacyChannel::ALL {
                resolved[kind.canonical().index()] = channel_from_streams(streams, kind);
            }
        }
        LayoutEra::ExplicitChannels if has_stream_table(version) => {
            for (kind, channel) in LegacyChannel::ALL.into_iter().zip(channels) {
                resolved[kind.canonical().index()] = *channel;
            }
            // packed color is re-expressed as four byte components
            let color = &mut resolved[ChannelKind::Color.index()];
            if color.is_set() {
                color.format = ChannelFormat::Byte;
                color.dimension = 4;
            }
        }
        LayoutEra::ExplicitChannels => {
            resolved.copy_from_slice(channels);
        }
        LayoutEra::ExtendedChannels => {
            for kind in ChannelKind::ALL {
                resolved[kind.index()] = channels[ExtendedChannel::from_canonical(kind).index()];
            }
        }
    }
    Ok(resolved)
}

/// Derive a legacy channel from the first stream whose mask contains it.
///
/// The offset is the summed stride of every kind that sorts before it in the
/// same stream.
fn channel_from_streams(streams: &[StreamInfo], kind: LegacyChannel) -> ChannelInfo {
    let Some((index, stream)) = streams
        .iter()
        .enumerate()
        .find(|(_, stream)| stream.contains_bit(kind.bit()))
    else {
        return ChannelInfo::ABSENT;
    };

    let offset: u8 = LegacyChannel::ALL
        .iter()
        .take_while(|other| **other != kind)
        .filter(|other| stream.contains_bit(other.bit()))
        .map(|other| other.stride())
        .sum();

    ChannelInfo::new(index as u8, offset, kind.format(), kind.dimension())
}

/// Canonical current-channels mask as written by exporters.
///
/// Below 5.0 the serialized mask uses the six-slot bit order, so the tangent bit
/// moves from 5 to 7. From 5.0 to 2018.1 the serialized mask is already
/// canonical. Later versions carry no mask and it is rebuilt from the table.
pub fn canonical_mask(version: FormatVersion, serialized_mask: u32, resolved: &[ChannelInfo; 8]) -> u32 {
    if has_current_channels(version) {
        if has_stream_table(version) {
            let legacy_tangent = 1 << LegacyChannel::Tangent.bit();
            let tangent = if serialized_mask & legacy_tangent != 0 {
                1 << ChannelKind::Tangent.index()
            } else {
                0
            };
            (serialized_mask & !legacy_tangent) | tangent
        } else {
            serialized_mask
        }
    } else {
        resolved
            .iter()
            .enumerate()
            .filter(|(_, channel)| channel.is_set())
            .fold(0, |mask, (index, _)| mask | (1 << index))
    }
}

// ==================== Stream geometry ====================

/// Sum of the strides of every channel stored in `stream`.
pub fn stream_stride(channels: &[ChannelInfo], stream: u8) -> Result<usize> {
    channels
        .iter()
        .filter(|channel| channel.stream == stream)
        .map(ChannelInfo::stride)
        .sum()
}

/// Byte offset where `stream` starts inside the blob.
///
/// Stream 0 starts at 0. The other streams are packed at the tail of the blob,
/// after a gap that is not an alignment: their start is the blob length minus
/// the per-vertex size of every non-zero stream times the vertex count, plus
/// the size of the preceding non-zero streams.
pub fn stream_offset(
    channels: &[ChannelInfo],
    stream: u8,
    data_len: usize,
    vertex_count: usize,
) -> Result<usize> {
    if stream == 0 {
        return Ok(0);
    }

    let tail_stride: usize = channels
        .iter()
        .filter(|channel| channel.stream != 0)
        .map(ChannelInfo::stride)
        .sum::<Result<usize>>()?;
    let tail_len = tail_stride * vertex_count;
    let mut offset = data_len.checked_sub(tail_len).ok_or(Error::TruncatedInput {
        offset: 0,
        needed: tail_len,
        available: data_len,
    })?;

    for preceding in 1..stream {
        offset += stream_stride(channels, preceding)? * vertex_count;
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(s: &str) -> FormatVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_gate_boundaries() {
        assert!(!has_current_channels(v("2018.1.0f1")));
        assert!(has_current_channels(v("2017.4.40f1")));
        assert!(has_channel_table(v("4.0.0a1")));
        assert!(!has_channel_table(v("3.5.7f1")));
        assert!(has_stream_table(v("4.7.2f1")));
        assert!(!has_stream_table(v("5.0.0f4")));
        assert_eq!(serialized_version(v("2018.1.0f2")), 2);
        assert_eq!(serialized_version(v("2017.4.40f1")), 1);
    }

    #[test]
    fn test_era_selection() {
        assert_eq!(LayoutEra::of(v("3.5.7f1")), LayoutEra::LegacyStreams);
        assert_eq!(LayoutEra::of(v("4.7.2f1")), LayoutEra::ExplicitChannels);
        assert_eq!(LayoutEra::of(v("2017.4.40f1")), LayoutEra::ExplicitChannels);
        assert_eq!(LayoutEra::of(v("2018.1.0f2")), LayoutEra::ExtendedChannels);
    }

    #[test]
    fn test_two_stream_offsets() {
        let channels = [
            ChannelInfo::new(0, 0, ChannelFormat::Float, 3),
            ChannelInfo::new(1, 0, ChannelFormat::Float, 2),
        ];
        assert_eq!(stream_stride(&channels, 0).unwrap(), 12);
        assert_eq!(stream_stride(&channels, 1).unwrap(), 8);
        assert_eq!(stream_offset(&channels, 0, 200, 10).unwrap(), 0);
        assert_eq!(stream_offset(&channels, 1, 200, 10).unwrap(), 120);
    }

    #[test]
    fn test_stream_offset_keeps_gap() {
        let channels = [
            ChannelInfo::new(0, 0, ChannelFormat::Float, 3),
            ChannelInfo::new(1, 0, ChannelFormat::Float, 2),
            ChannelInfo::new(2, 0, ChannelFormat::Float, 4),
        ];
        // 12*10 + 8 gap + 8*10 + 16*10
        let len = 120 + 8 + 80 + 160;
        assert_eq!(stream_offset(&channels, 1, len, 10).unwrap(), 128);
        assert_eq!(stream_offset(&channels, 2, len, 10).unwrap(), 208);
    }

    #[test]
    fn test_stream_offset_blob_too_small() {
        let channels = [ChannelInfo::new(1, 0, ChannelFormat::Float, 4)];
        assert!(matches!(
            stream_offset(&channels, 1, 10, 10),
            Err(Error::TruncatedInput { needed: 160, available: 10, .. })
        ));
    }

    #[test]
    fn test_legacy_channels_from_streams() {
        let mask0 = (1 << LegacyChannel::Position.bit()) | (1 << LegacyChannel::Uv0.bit());
        let mask1 = 1 << LegacyChannel::Tangent.bit();
        let streams = [
            StreamInfo::new(mask0, 0, 20),
            StreamInfo::new(mask1, 0, 16),
            StreamInfo::default(),
            StreamInfo::default(),
        ];

        let resolved = resolve_channels(v("3.5.7f1"), &[], &streams).unwrap();
        assert_eq!(resolved[ChannelKind::Position.index()], ChannelInfo::new(0, 0, ChannelFormat::Float, 3));
        assert_eq!(resolved[ChannelKind::Uv0.index()], ChannelInfo::new(0, 12, ChannelFormat::Float, 2));
        assert_eq!(resolved[ChannelKind::Tangent.index()], ChannelInfo::new(1, 0, ChannelFormat::Float, 4));
        assert!(!resolved[ChannelKind::Normal.index()].is_set());
        assert!(!resolved[ChannelKind::Uv2.index()].is_set());
    }

    #[test]
    fn test_4x_color_becomes_four_bytes() {
        let mut channels = [ChannelInfo::ABSENT; 6];
        channels[0] = ChannelInfo::new(0, 0, ChannelFormat::Float, 3);
        channels[2] = ChannelInfo::new(0, 12, ChannelFormat::Color, 1);
        channels[5] = ChannelInfo::new(0, 16, ChannelFormat::Float, 4);

        let resolved = resolve_channels(v("4.7.2f1"), &channels, &[]).unwrap();
        assert_eq!(resolved[ChannelKind::Color.index()], ChannelInfo::new(0, 12, ChannelFormat::Byte, 4));
        assert_eq!(resolved[ChannelKind::Tangent.index()].offset, 16);
    }

    #[test]
    fn test_extended_table_drops_skin_slots() {
        let mut channels = [ChannelInfo::ABSENT; ExtendedChannel::COUNT];
        channels[ExtendedChannel::Position.index()] = ChannelInfo::new(0, 0, ChannelFormat::Float, 3);
        channels[ExtendedChannel::Tangent.index()] = ChannelInfo::new(0, 12, ChannelFormat::Float, 4);
        channels[ExtendedChannel::SkinWeight.index()] = ChannelInfo::new(1, 0, ChannelFormat::Float, 4);

        let resolved = resolve_channels(v("2019.4.1f1"), &channels, &[]).unwrap();
        assert_eq!(resolved[ChannelKind::Tangent.index()].offset, 12);
        assert_eq!(resolved.iter().filter(|c| c.is_set()).count(), 2);
    }

    #[test]
    fn test_table_length_mismatch_is_unsupported() {
        let channels = [ChannelInfo::ABSENT; 8];
        assert!(matches!(
            resolve_channels(v("2018.2.0f1"), &channels, &[]),
            Err(Error::UnsupportedRevision { .. })
        ));
    }

    #[test]
    fn test_canonical_mask_moves_legacy_tangent() {
        let resolved = [ChannelInfo::ABSENT; 8];
        let mask = 0b10_0001;
        assert_eq!(canonical_mask(v("4.7.2f1"), mask, &resolved), 0b1000_0001);
        assert_eq!(canonical_mask(v("5.6.0f3"), mask, &resolved), mask);
    }
}
