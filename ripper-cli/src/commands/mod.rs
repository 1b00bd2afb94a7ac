use clap::{Args, Subcommand};
use std::path::PathBuf;

use rippercore::export::ExportOptions;
use rippercore::version::{FormatVersion, Platform, TransferFlags};

pub mod renderer;
pub mod vertex_data;

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a vertex data record
    VertexData {
        #[command(flatten)]
        region: RegionArgs,
    },

    /// Decode a mesh renderer component
    Renderer {
        #[command(flatten)]
        region: RegionArgs,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::VertexData { region } => vertex_data::execute(region),
            Commands::Renderer { region } => renderer::execute(region),
        }
    }
}

/// Where the asset lives and how it was written.
#[derive(Args)]
pub struct RegionArgs {
    /// File holding the serialized asset
    #[arg(short, long)]
    pub source: PathBuf,

    /// Format version that wrote the file, e.g. 2018.3.14f1
    #[arg(short, long)]
    pub version: FormatVersion,

    /// Start of the asset region in bytes
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Length of the asset region; defaults to the rest of the file
    #[arg(long)]
    pub size: Option<usize>,

    /// The file is release (player) data rather than editor data
    #[arg(long)]
    pub release: bool,

    /// Build target code of the file
    #[arg(short, long, default_value_t = 5)]
    pub platform: i32,

    /// Version the export tree is shaped for
    #[arg(long)]
    pub export_version: Option<FormatVersion>,

    /// Print the export tree as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

impl RegionArgs {
    pub fn flags(&self) -> TransferFlags {
        if self.release {
            TransferFlags::SERIALIZE_GAME_RELEASE
        } else {
            TransferFlags::empty()
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::from_i32(self.platform)
    }

    pub fn export_options(&self) -> ExportOptions {
        match self.export_version {
            Some(version) => ExportOptions::new().with_export_version(version),
            None => ExportOptions::new(),
        }
    }

    /// Read the asset region from the source file.
    pub fn load(&self) -> anyhow::Result<Vec<u8>> {
        let data = std::fs::read(&self.source)?;
        let end = match self.size {
            Some(size) => self.offset.checked_add(size),
            None => Some(data.len()),
        };
        let region = end
            .and_then(|end| data.get(self.offset..end))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Region {}+{:?} is outside {:?} ({} bytes)",
                    self.offset,
                    self.size,
                    self.source,
                    data.len()
                )
            })?;
        Ok(region.to_vec())
    }
}
