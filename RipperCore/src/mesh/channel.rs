//! Vertex channel and stream descriptors

use crate::error::{Error, Result};
use crate::export::{ExportContainer, ExportMapping, ExportNode, Exportable};
use crate::io::{AssetReader, AssetWriter};
use crate::version::FormatVersion;

/// Numeric format of one channel component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelFormat {
    /// 32-bit float per component.
    Float,
    /// 16-bit half float per component.
    Float16,
    /// Packed RGBA32 color; one 4-byte element.
    Color,
    /// Unsigned byte per component.
    Byte,
    /// 32-bit integer per component.
    Int,
    Unknown(u8),
}

impl ChannelFormat {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Float,
            1 => Self::Float16,
            2 => Self::Color,
            3 => Self::Byte,
            4 => Self::Int,
            _ => Self::Unknown(v),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Float => 0,
            Self::Float16 => 1,
            Self::Color => 2,
            Self::Byte => 3,
            Self::Int => 4,
            Self::Unknown(v) => v,
        }
    }

    /// Byte width of one component, `None` for unknown formats.
    pub fn element_size(self) -> Option<usize> {
        match self {
            Self::Float | Self::Color | Self::Int => Some(4),
            Self::Float16 => Some(2),
            Self::Byte => Some(1),
            Self::Unknown(_) => None,
        }
    }
}

/// Placement of one vertex attribute inside the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelInfo {
    pub stream: u8,
    pub offset: u8,
    pub format: ChannelFormat,
    /// Component count; 0 means the channel is absent.
    pub dimension: u8,
}

impl Default for ChannelInfo {
    fn default() -> Self {
        Self::ABSENT
    }
}

impl ChannelInfo {
    pub const ABSENT: Self = Self {
        stream: 0,
        offset: 0,
        format: ChannelFormat::Float,
        dimension: 0,
    };

    pub const fn new(stream: u8, offset: u8, format: ChannelFormat, dimension: u8) -> Self {
        Self { stream, offset, format, dimension }
    }

    pub fn is_set(&self) -> bool {
        self.dimension != 0
    }

    /// Bytes this channel occupies per vertex. Absent channels occupy none.
    pub fn stride(&self) -> Result<usize> {
        if !self.is_set() {
            return Ok(0);
        }
        self.format
            .element_size()
            .map(|size| size * usize::from(self.dimension))
            .ok_or(Error::UnsupportedChannelFormat {
                format: self.format.code(),
                dimension: self.dimension,
            })
    }

    pub fn read(reader: &mut AssetReader<'_>) -> Result<Self> {
        Ok(Self {
            stream: reader.read_u8()?,
            offset: reader.read_u8()?,
            format: ChannelFormat::from_u8(reader.read_u8()?),
            dimension: reader.read_u8()?,
        })
    }

    pub fn write(&self, writer: &mut AssetWriter) {
        writer.write_u8(self.stream);
        writer.write_u8(self.offset);
        writer.write_u8(self.format.code());
        writer.write_u8(self.dimension);
    }
}

impl Exportable for ChannelInfo {
    fn export(&self, _container: &ExportContainer) -> ExportNode {
        let mut node = ExportMapping::new();
        node.add("stream", self.stream);
        node.add("offset", self.offset);
        node.add("format", self.format.code());
        node.add("dimension", self.dimension);
        node.into()
    }
}

/// One interleaved run of vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StreamInfo {
    /// Bit per legacy channel kind stored in this stream.
    pub channel_mask: u32,
    pub offset: u32,
    pub stride: u32,
    /// Only serialized below 4.0.
    pub align: u32,
    /// Only serialized from 4.0.
    pub divider_op: u8,
    /// Only serialized from 4.0.
    pub frequency: u16,
}

impl StreamInfo {
    pub fn new(channel_mask: u32, offset: u32, stride: u32) -> Self {
        Self {
            channel_mask,
            offset,
            stride,
            ..Self::default()
        }
    }

    /// Below 4.0 stride and alignment are 32-bit words.
    pub fn has_wide_stride(version: FormatVersion) -> bool {
        version.is_below(FormatVersion::series(4, 0))
    }

    pub fn contains_bit(&self, bit: u32) -> bool {
        self.channel_mask & (1 << bit) != 0
    }

    pub fn read(reader: &mut AssetReader<'_>) -> Result<Self> {
        let channel_mask = reader.read_u32()?;
        let offset = reader.read_u32()?;
        if Self::has_wide_stride(reader.version()) {
            let stride = reader.read_u32()?;
            let align = reader.read_u32()?;
            Ok(Self {
                channel_mask,
                offset,
                stride,
                align,
                ..Self::default()
            })
        } else {
            let stride = u32::from(reader.read_u8()?);
            let divider_op = reader.read_u8()?;
            let frequency = reader.read_u16()?;
            Ok(Self {
                channel_mask,
                offset,
                stride,
                align: 0,
                divider_op,
                frequency,
            })
        }
    }

    pub fn write(&self, writer: &mut AssetWriter) {
        writer.write_u32(self.channel_mask);
        writer.write_u32(self.offset);
        if Self::has_wide_stride(writer.version()) {
            writer.write_u32(self.stride);
            writer.write_u32(self.align);
        } else {
            writer.write_u8(self.stride as u8);
            writer.write_u8(self.divider_op);
            writer.write_u16(self.frequency);
        }
    }
}
