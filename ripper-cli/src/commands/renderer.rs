//! CLI interface for mesh renderer components
use rippercore::classes::{Asset, ClassId};
use rippercore::export::export_file;
use rippercore::file::{DecodeState, SerializedFile};

use super::RegionArgs;

const PATH_ID: i64 = 1;

pub fn execute(region: &RegionArgs) -> anyhow::Result<()> {
    let data = region.load()?;
    let size = data.len();
    let mut file = SerializedFile::new(region.source.to_string_lossy(), data, region.version)
        .with_flags(region.flags())
        .with_platform(region.platform());
    file.add_object(PATH_ID, ClassId::MeshRenderer, 0, size)?;

    match file.decode_object(PATH_ID) {
        Some(DecodeState::Failed(failure)) => {
            anyhow::bail!("Mesh renderer failed at offset {}: {}", failure.offset, failure.error);
        }
        Some(DecodeState::Decoded(_)) => {}
        _ => anyhow::bail!("Mesh renderer was not decoded"),
    }

    if region.json {
        for document in export_file(&file, region.export_options())? {
            println!("{}", document.to_json()?);
        }
        return Ok(());
    }

    let Some(Asset::MeshRenderer(mesh_renderer)) = file.object(PATH_ID).and_then(|entry| entry.asset()) else {
        anyhow::bail!("Mesh renderer was not decoded");
    };
    let renderer = &mesh_renderer.renderer;
    println!("Mesh renderer ({}, {})", region.version, file.platform());
    println!("  Enabled:       {}", renderer.enabled);
    println!("  Cast shadows:  {:?}", renderer.cast_shadows);
    println!("  Lightmap:      {:#06x}", renderer.lightmap_index);
    println!("  Materials:     {}", renderer.materials.len());
    println!("  Sorting order: {}", renderer.sorting_order);

    for dependency in mesh_renderer.dependencies() {
        println!(
            "  -> {:<28} file {} path {}",
            dependency.field, dependency.reference.file_id, dependency.reference.path_id
        );
    }
    Ok(())
}
