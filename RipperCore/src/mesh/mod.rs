//! Mesh vertex data
//!
//! - [`channel`]: channel and stream descriptors
//! - [`layout`]: per-era channel layout resolution and stream geometry
//! - [`vertex_data`]: the serialized vertex data record
//! - [`codec`]: attribute decode/encode and byte-order transposition

pub mod attributes;
pub mod channel;
pub mod codec;
pub mod layout;
pub mod vertex_data;

pub use attributes::{ColorRGBA32, SkinWeights4, SubMesh, VertexAttributes};
pub use channel::{ChannelFormat, ChannelInfo, StreamInfo};
pub use codec::{decode_attributes, decode_positions, decode_skin_weights, encode, transpose_byte_order};
pub use layout::{ChannelKind, ExtendedChannel, LayoutEra, LegacyChannel, resolve_channels, stream_offset, stream_stride};
pub use vertex_data::VertexData;
