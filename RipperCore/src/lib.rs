//! # RipperCore
//!
//! Version-conditional binary codec for Unity serialized assets.
//!
//! Every serialized file records the engine revision that wrote it, and almost
//! every field of every asset is present, absent, wider or padded depending on
//! that revision. This crate decodes such assets into typed records, re-encodes
//! them byte for byte, and maps them onto an ordered export tree for a chosen
//! target revision.
//!
//! ## Modules
//!
//! - **version** - Format versions, transfer flags and build platforms
//! - **io** - Endian-aware cursors over one asset's region
//! - **mesh** - Vertex channel layouts, stream geometry and the vertex codec
//! - **classes** - Asset records and cross-file references
//! - **file** - Loaded files, per-asset decode state and the file registry
//! - **export** - Export tree, export options and the generic export driver
//!
//! ## Quick Start
//!
//! ### Decoding Vertex Data
//!
//! ```
//! use glam::{Vec2, Vec3};
//! use rippercore::mesh::{SubMesh, decode_attributes, decode_positions, encode};
//! use rippercore::version::FormatVersion;
//!
//! let version: FormatVersion = "2019.4.1f1".parse()?;
//! let positions = [Vec3::ZERO, Vec3::X];
//! let uv0 = [Vec2::ZERO, Vec2::ONE];
//!
//! let vertex_data = encode(version, &positions, &[], &[], &uv0, &[], &[])?;
//! assert_eq!(decode_positions(&vertex_data, version, SubMesh::all(2))?, positions);
//! assert_eq!(decode_attributes(&vertex_data, version)?.uv0, uv0);
//! # Ok::<(), rippercore::Error>(())
//! ```
//!
//! ### Decoding and Exporting a File
//!
//! ```
//! use rippercore::prelude::*;
//!
//! let version: FormatVersion = "2018.3.0f2".parse()?;
//! let flags = TransferFlags::SERIALIZE_GAME_RELEASE;
//! let mut writer = AssetWriter::new(Endian::Little, version, flags);
//! MeshRenderer::default().write(&mut writer);
//! let size = writer.position();
//!
//! let mut file = SerializedFile::new("level0", writer.into_bytes(), version).with_flags(flags);
//! file.add_object(1, ClassId::MeshRenderer, 0, size)?;
//! assert_eq!(file.decode_all().decoded, 1);
//!
//! let documents = export_file(&file, ExportOptions::new())?;
//! println!("{}", documents[0].to_json()?);
//! # Ok::<(), rippercore::Error>(())
//! ```

pub mod classes;
pub mod error;
pub mod export;
pub mod file;
pub mod io;
pub mod mesh;
pub mod version;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::version::{FormatVersion, Platform, ReleaseType, TransferFlags};
    pub use crate::io::{AssetReader, AssetWriter, Endian};

    pub use crate::mesh::{
        ChannelFormat, ChannelInfo, StreamInfo, SubMesh, VertexAttributes, VertexData,
        decode_attributes, decode_positions, decode_skin_weights, encode, transpose_byte_order,
    };

    pub use crate::classes::{Asset, ClassId, Dependency};
    pub use crate::classes::mesh::Mesh;
    pub use crate::classes::mesh_renderer::MeshRenderer;
    pub use crate::classes::pptr::PPtr;
    pub use crate::classes::renderer::Renderer;

    pub use crate::file::{AssetEntry, DecodeState, DecodeSummary, FileCollection, SerializedFile};

    pub use crate::export::{
        ExportContainer, ExportDocument, ExportNode, ExportOptions, Exportable, export_asset, export_file,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
