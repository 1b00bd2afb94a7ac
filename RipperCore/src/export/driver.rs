//! Generic export driver over the closed asset set

use serde::Serialize;
use tracing::{debug, warn};

use crate::classes::{Asset, ClassId};
use crate::error::Result;
use crate::file::SerializedFile;

use super::{ExportContainer, ExportMapping, ExportNode, ExportOptions, Exportable};

/// One exported asset: a single-key mapping from class name to its fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    #[serde(skip)]
    pub path_id: i64,
    #[serde(skip)]
    pub class_id: ClassId,
    #[serde(flatten)]
    pub root: ExportMapping,
}

impl ExportDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The exported fields under the class name.
    pub fn body(&self) -> Option<&ExportNode> {
        self.root.get(self.class_id.name())
    }
}

/// Export one decoded asset. Classes without a record are skipped.
pub fn export_asset(asset: &Asset, container: &ExportContainer) -> Result<Option<ExportNode>> {
    match asset {
        Asset::Mesh(mesh) => mesh.export(container).map(Some),
        Asset::MeshRenderer(renderer) => Ok(Some(renderer.export(container))),
        Asset::Unknown { class_id, data } => {
            warn!("Skipping export of {class_id} ({} bytes): no record for this class", data.len());
            Ok(None)
        }
    }
}

/// Export every decoded asset of `file`, in registration order.
///
/// Assets that failed to decode are skipped; an asset that decoded but cannot be
/// exported fails the whole file.
pub fn export_file(file: &SerializedFile, options: ExportOptions) -> Result<Vec<ExportDocument>> {
    let container = ExportContainer::new(file.version(), file.flags(), file.platform(), options);
    debug!(
        "Exporting {} from {} as {}",
        file.name(),
        container.version(),
        container.export_version()
    );

    let mut documents = Vec::new();
    for entry in file.entries() {
        let Some(asset) = entry.asset() else {
            continue;
        };
        let node = export_asset(asset, &container).inspect_err(|err| {
            warn!("Failed to export {} {} in {}: {err}", asset.class_id(), entry.info.path_id, file.name());
        })?;
        let Some(node) = node else {
            continue;
        };

        let mut root = ExportMapping::new();
        root.add(asset.class_id().name(), node);
        documents.push(ExportDocument {
            path_id: entry.info.path_id,
            class_id: asset.class_id(),
            root,
        });
    }
    Ok(documents)
}
