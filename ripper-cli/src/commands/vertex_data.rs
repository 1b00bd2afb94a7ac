//! CLI interface for vertex data records
use rippercore::export::ExportContainer;
use rippercore::io::{AssetReader, Endian};
use rippercore::mesh::{ChannelKind, VertexData, decode_attributes, decode_skin_weights};

use super::RegionArgs;

pub fn execute(region: &RegionArgs) -> anyhow::Result<()> {
    let data = region.load()?;
    let version = region.version;
    let mut reader = AssetReader::new(&data, Endian::Little, version, region.flags());
    let vertex_data = VertexData::read(&mut reader)?;

    if region.json {
        let container = ExportContainer::new(version, region.flags(), region.platform(), region.export_options());
        let node = vertex_data.export(&container)?;
        println!("{}", serde_json::to_string_pretty(&node)?);
        return Ok(());
    }

    println!("Vertex data ({version}, {} bytes read)", reader.position());
    println!("  Vertices: {}", vertex_data.vertex_count);
    println!("  Blob:     {} bytes", vertex_data.data.len());
    println!("  Mask:     {:#010b}", vertex_data.canonical_mask(version)?);

    let channels = vertex_data.resolve_channels(version)?;
    for kind in ChannelKind::ALL {
        let channel = channels[kind.index()];
        if channel.is_set() {
            println!(
                "  {:<9} stream {} offset {:>2} {:?} x{}",
                kind.name(),
                channel.stream,
                channel.offset,
                channel.format,
                channel.dimension
            );
        }
    }

    let attributes = decode_attributes(&vertex_data, version)?;
    if let Some(first) = attributes.positions.first() {
        println!("  First position: {first}");
    }
    let skin = decode_skin_weights(&vertex_data, version)?;
    if !skin.is_empty() {
        println!("  Skinned: {} influences", skin.len());
    }

    println!("✓ Decoded {} vertices", attributes.vertex_count());
    Ok(())
}
