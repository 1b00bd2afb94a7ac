//! Endian-aware byte cursors
//!
//! [`AssetReader`] walks one asset's serialized region; [`AssetWriter`] produces the
//! same grammar. Both carry the format version and transfer flags of the file the
//! region belongs to, so record codecs can evaluate their gates without extra
//! parameters.

mod endian;
mod reader;
mod writer;

pub use endian::Endian;
pub use reader::AssetReader;
pub use writer::AssetWriter;

/// Padding boundary used by every aligned field in the format.
pub const ALIGN: usize = 4;
