use glam::{Vec2, Vec3};
use pretty_assertions::{assert_eq, assert_ne};
use rippercore::classes::pptr::{Material, Object, Transform};
use rippercore::classes::renderer::gates;
use rippercore::mesh::layout;
use rippercore::mesh::{ChannelKind, ExtendedChannel};
use rippercore::prelude::*;

fn v(s: &str) -> FormatVersion {
    s.parse().unwrap()
}

#[test]
fn test_gate_ranges() {
    type Gate = fn(FormatVersion) -> bool;
    // (gate, first version inside, last version before, first version after)
    let ranges: [(Gate, &str, &str, Option<&str>); 9] = [
        (gates::has_rendering_layer_mask, "2018.1.0a1", "2017.4.40f1", None),
        (gates::has_renderer_priority, "2018.3.0a1", "2018.2.21f1", None),
        (gates::has_dynamic_occludee, "2017.2.0a1", "2017.1.5f1", None),
        (gates::has_subset_indices, "3.0.0a1", "2.6.1f3", Some("5.5.0a1")),
        (gates::has_use_light_probes, "3.5.0a1", "3.4.2f1", Some("5.4.0a1")),
        (gates::is_enabled_aligned, "5.0.0a1", "4.7.2f1", Some("5.4.0a1")),
        (gates::has_static_batch_info, "5.5.0a1", "5.4.6f3", None),
        (layout::has_channel_table, "4.0.0a1", "3.5.7f1", None),
        (layout::has_vertex_data, "3.5.0a1", "3.4.2f1", None),
    ];

    for (gate, lo, below, hi) in ranges {
        assert!(gate(v(lo)), "{lo} should be inside");
        assert!(!gate(v(below)), "{below} should be outside");
        if let Some(hi) = hi {
            assert!(!gate(v(hi)), "{hi} should be outside");
        }
    }
}

#[test]
fn test_two_stream_offsets() {
    let version = v("2019.4.1f1");
    let mut channels = vec![ChannelInfo::ABSENT; ExtendedChannel::COUNT];
    channels[ExtendedChannel::Position.index()] = ChannelInfo::new(0, 0, ChannelFormat::Float, 3);
    channels[ExtendedChannel::Uv0.index()] = ChannelInfo::new(1, 0, ChannelFormat::Float, 2);

    let mut writer = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
    for i in 0..10 {
        writer.write_vec3(Vec3::splat(i as f32));
    }
    for i in 0..10 {
        writer.write_vec2(Vec2::new(i as f32, -(i as f32)));
    }
    let vertex_data = VertexData {
        vertex_count: 10,
        channels,
        data: writer.into_bytes(),
        ..VertexData::default()
    };
    assert_eq!(vertex_data.data.len(), 200);

    let table = vertex_data.resolve_channels(version).unwrap();
    assert_eq!(vertex_data.stream_offset(&table, 0).unwrap(), 0);
    assert_eq!(vertex_data.stream_offset(&table, 1).unwrap(), 120);

    let attributes = decode_attributes(&vertex_data, version).unwrap();
    assert_eq!(attributes.positions[3], Vec3::splat(3.0));
    assert_eq!(attributes.uv0[9], Vec2::new(9.0, -9.0));
    assert!(attributes.normals.is_empty());
}

#[test]
fn test_encode_then_decode() {
    let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 5.5, 0.25)];
    let uv0 = [Vec2::new(0.0, 1.0), Vec2::new(0.5, 0.75)];

    for version in ["4.7.2f1", "5.6.0f3", "2017.4.40f1", "2019.4.1f1"] {
        let version = v(version);
        let vertex_data = encode(version, &positions, &[], &[], &uv0, &[], &[]).unwrap();
        let attributes = decode_attributes(&vertex_data, version).unwrap();
        assert_eq!(
            attributes,
            VertexAttributes {
                positions: positions.to_vec(),
                uv0: uv0.to_vec(),
                ..VertexAttributes::default()
            },
            "{version}"
        );
        assert_eq!(
            decode_positions(&vertex_data, version, SubMesh::new(1, 1)).unwrap(),
            vec![positions[1]]
        );
    }
}

#[test]
fn test_encoded_record_survives_binary_round_trip() {
    let version = v("2018.2.0f2");
    let vertex_data = encode(version, &[Vec3::ONE], &[Vec3::Z], &[], &[Vec2::ZERO], &[], &[]).unwrap();

    let mut writer = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
    vertex_data.write(&mut writer).unwrap();
    let bytes = writer.into_bytes();
    let mut reader = AssetReader::new(&bytes, Endian::Little, version, TransferFlags::empty());
    assert_eq!(VertexData::read(&mut reader).unwrap(), vertex_data);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_unskinned_mesh_has_no_weights() {
    let version = v("2019.4.1f1");
    let vertex_data = encode(version, &[Vec3::ZERO, Vec3::Y], &[], &[], &[], &[], &[]).unwrap();
    assert_eq!(decode_skin_weights(&vertex_data, version).unwrap(), Vec::new());
}

#[test]
fn test_missing_positions_is_an_error() {
    let version = v("2019.4.1f1");
    let vertex_data = VertexData {
        channels: vec![ChannelInfo::ABSENT; ExtendedChannel::COUNT],
        ..VertexData::default()
    };
    let error = decode_positions(&vertex_data, version, SubMesh::all(0)).unwrap_err();
    assert!(matches!(error, Error::RequiredChannelAbsent { channel } if channel == ChannelKind::Position.name()));
}

fn write_skin(writer: &mut AssetWriter, vertex: i32) {
    for weight in [1.0f32, 0.0, 0.0, 0.0] {
        writer.write_f32(weight);
    }
    for index in 0..4 {
        writer.write_i32(vertex * 4 + index);
    }
}

/// Two skinned vertices, either with position, uv0 and skin in three streams or
/// with position and skin interleaved in stream 0.
fn skinned_vertex_data(version: FormatVersion, interleaved: bool) -> VertexData {
    let mut writer = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
    let mut channels = vec![ChannelInfo::ABSENT; ExtendedChannel::COUNT];
    channels[ExtendedChannel::Position.index()] = ChannelInfo::new(0, 0, ChannelFormat::Float, 3);

    if interleaved {
        for vertex in 0..2 {
            writer.write_vec3(Vec3::splat(vertex as f32 + 1.0));
            write_skin(&mut writer, vertex);
        }
        channels[ExtendedChannel::SkinWeight.index()] = ChannelInfo::new(0, 12, ChannelFormat::Float, 4);
        channels[ExtendedChannel::SkinBoneIndex.index()] = ChannelInfo::new(0, 28, ChannelFormat::Int, 4);
    } else {
        for vertex in 0..2 {
            writer.write_vec3(Vec3::splat(vertex as f32 + 1.0));
        }
        for vertex in 0..2 {
            writer.write_vec2(Vec2::new(10.0 + vertex as f32, 20.0));
        }
        for vertex in 0..2 {
            write_skin(&mut writer, vertex);
        }
        channels[ExtendedChannel::Uv0.index()] = ChannelInfo::new(1, 0, ChannelFormat::Float, 2);
        channels[ExtendedChannel::SkinWeight.index()] = ChannelInfo::new(2, 0, ChannelFormat::Float, 4);
        channels[ExtendedChannel::SkinBoneIndex.index()] = ChannelInfo::new(2, 16, ChannelFormat::Int, 4);
    }

    VertexData {
        vertex_count: 2,
        channels,
        data: writer.into_bytes(),
        ..VertexData::default()
    }
}

fn decoded_mesh(file: &SerializedFile, path_id: i64) -> &Mesh {
    match file.object(path_id).and_then(|entry| entry.asset()) {
        Some(Asset::Mesh(mesh)) => mesh,
        other => panic!("expected a decoded mesh at {path_id}, got {other:?}"),
    }
}

#[test]
fn test_skinned_meshes_decode_through_file() {
    let version = v("2019.4.1f1");
    let mut writer = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
    let mut regions = Vec::new();
    for (name, interleaved) in [("Split", false), ("Interleaved", true)] {
        let start = writer.position();
        let mesh = Mesh {
            name: name.to_string(),
            vertex_data: skinned_vertex_data(version, interleaved),
        };
        mesh.write(&mut writer).unwrap();
        regions.push((start, writer.position() - start));
    }

    let mut file = SerializedFile::new("sharedassets0.assets", writer.into_bytes(), version);
    for (path_id, (offset, size)) in (1..).zip(regions) {
        file.add_object(path_id, ClassId::Mesh, offset, size).unwrap();
    }
    assert_eq!(file.decode_all(), DecodeSummary { decoded: 2, failed: 0 });

    let split = decoded_mesh(&file, 1);
    assert_eq!(split.name, "Split");
    let attributes = split.attributes(version).unwrap();
    assert_eq!(attributes.positions, vec![Vec3::ONE, Vec3::splat(2.0)]);
    assert_eq!(attributes.uv0, vec![Vec2::new(10.0, 20.0), Vec2::new(11.0, 20.0)]);
    let skin = decode_skin_weights(&split.vertex_data, version).unwrap();
    assert_eq!(skin[1].bone_indices, [4, 5, 6, 7]);

    let interleaved = decoded_mesh(&file, 2);
    assert_eq!(
        decode_positions(&interleaved.vertex_data, version, SubMesh::all(2)).unwrap(),
        vec![Vec3::ONE, Vec3::splat(2.0)]
    );
    let skin = decode_skin_weights(&interleaved.vertex_data, version).unwrap();
    assert_eq!(skin[0].weights, [1.0, 0.0, 0.0, 0.0]);
    assert_eq!(skin[1].bone_indices, [4, 5, 6, 7]);
}

#[test]
fn test_big_endian_vertex_blob_exports_little_endian() {
    let version = v("2019.4.1f1");
    // one vertex: position (3 x f32) then uv0 (2 x f16: 0.5, 1.0)
    let blob = |endian: Endian| {
        let mut writer = AssetWriter::new(endian, version, TransferFlags::empty());
        writer.write_vec3(Vec3::new(1.0, 2.0, 3.0));
        writer.write_u16(0x3800);
        writer.write_u16(0x3C00);
        writer.into_bytes()
    };
    let mut channels = vec![ChannelInfo::ABSENT; ExtendedChannel::COUNT];
    channels[ExtendedChannel::Position.index()] = ChannelInfo::new(0, 0, ChannelFormat::Float, 3);
    channels[ExtendedChannel::Uv0.index()] = ChannelInfo::new(0, 12, ChannelFormat::Float16, 2);
    let mesh = Mesh {
        name: "Console".to_string(),
        vertex_data: VertexData {
            vertex_count: 1,
            channels,
            data: blob(Endian::Big),
            ..VertexData::default()
        },
    };

    let mut writer = AssetWriter::new(Endian::Big, version, TransferFlags::SERIALIZE_GAME_RELEASE);
    mesh.write(&mut writer).unwrap();
    let bytes = writer.into_bytes();
    let len = bytes.len();
    let mut file = SerializedFile::new("level0", bytes, version)
        .with_flags(TransferFlags::SERIALIZE_GAME_RELEASE)
        .with_platform(Platform::Xbox360)
        .with_endian(Endian::Big);
    file.add_object(1, ClassId::Mesh, 0, len).unwrap();
    assert_eq!(file.decode_all(), DecodeSummary { decoded: 1, failed: 0 });

    let documents = export_file(&file, ExportOptions::new().with_export_version(version)).unwrap();
    let typeless = documents[0]
        .body()
        .and_then(|body| body.get("m_VertexData"))
        .and_then(|vertex_data| vertex_data.get("_typelessdata"))
        .cloned();
    assert_eq!(typeless, Some(ExportNode::hex(&blob(Endian::Little))));

    let mut reversed = blob(Endian::Big);
    reversed.reverse();
    assert_ne!(typeless, Some(ExportNode::hex(&reversed)));
}

fn renderer_bytes(version: FormatVersion, flags: TransferFlags, renderer: &MeshRenderer) -> Vec<u8> {
    let mut writer = AssetWriter::new(Endian::Little, version, flags);
    renderer.write(&mut writer);
    writer.into_bytes()
}

#[test]
fn test_null_reference_resolves_to_none() {
    let mut file = SerializedFile::new("level0", vec![0; 4], v("2018.3.0f2"));
    file.add_object(0, ClassId::Material, 0, 4).unwrap();
    let mut collection = FileCollection::new();
    collection.add_file(file).unwrap();

    assert!(collection.resolve("level0", &PPtr::<Object>::null()).is_none());
    assert!(collection.resolve("level0", &PPtr::<Material>::new(1, 0)).is_none());
}

#[test]
fn test_missing_dependency_listed_as_unresolved() {
    let version = v("2018.3.0f2");
    let flags = TransferFlags::SERIALIZE_GAME_RELEASE;

    let mut renderer = MeshRenderer::default();
    renderer.renderer.common.game_object = PPtr::new(0, 2);
    renderer.renderer.materials = vec![PPtr::<Material>::new(0, 12345), PPtr::new(1, 5)];
    renderer.renderer.probe_anchor = PPtr::<Transform>::new(0, 3);
    renderer.additional_vertex_streams = PPtr::null();

    let mut data = renderer_bytes(version, flags, &renderer);
    let renderer_len = data.len();
    data.extend_from_slice(&[0; 8]);

    let mut level = SerializedFile::new("level0", data, version).with_flags(flags);
    level.add_dependency("sharedassets0.assets");
    level.add_object(1, ClassId::MeshRenderer, 0, renderer_len).unwrap();
    level.add_object(2, ClassId::GameObject, renderer_len, 4).unwrap();
    level.add_object(3, ClassId::Transform, renderer_len + 4, 4).unwrap();

    let mut collection = FileCollection::new();
    collection.add_file(level).unwrap();
    assert_eq!(collection.decode_all(), DecodeSummary { decoded: 3, failed: 0 });

    let level = collection.file("level0").unwrap();
    let links: Vec<(&str, i64, bool)> = collection
        .dependencies(level)
        .map(|link| (link.field, link.reference.path_id, link.is_resolved()))
        .collect();
    assert_eq!(
        links,
        vec![
            ("m_GameObject", 2, true),
            ("m_Materials", 12345, false),
            ("m_Materials", 5, false),
            ("m_ProbeAnchor", 3, true),
        ]
    );
}

#[test]
fn test_truncated_asset_leaves_siblings_decoded() {
    let version = v("2018.3.0f2");
    let flags = TransferFlags::SERIALIZE_GAME_RELEASE;
    let bytes = renderer_bytes(version, flags, &MeshRenderer::default());
    let len = bytes.len();

    let mut data = bytes.clone();
    data.extend_from_slice(&bytes[..len - 2]);
    data.extend_from_slice(&bytes);

    let mut file = SerializedFile::new("level0", data, version).with_flags(flags);
    file.add_object(1, ClassId::MeshRenderer, 0, len).unwrap();
    file.add_object(2, ClassId::MeshRenderer, len, len - 2).unwrap();
    file.add_object(3, ClassId::MeshRenderer, 2 * len - 2, len).unwrap();

    assert_eq!(file.decode_all(), DecodeSummary { decoded: 2, failed: 1 });
    assert_eq!(file.object(1).unwrap().asset(), Some(&Asset::MeshRenderer(MeshRenderer::default())));
    assert!(file.object(3).unwrap().asset().is_some());

    let failure = file.object(2).unwrap().failure().unwrap();
    assert!(matches!(failure.error, Error::TruncatedInput { needed: 8, available: 6, .. }));
    assert_eq!(failure.offset, len - 8);

    assert_eq!(file.encode_object(3).unwrap(), bytes);
}

#[test]
fn test_export_documents_as_json() {
    let version = v("2019.4.1f1");
    let flags = TransferFlags::SERIALIZE_GAME_RELEASE;
    let bytes = renderer_bytes(version, flags, &MeshRenderer::default());
    let len = bytes.len();

    let mut file = SerializedFile::new("level0", bytes, version)
        .with_flags(flags)
        .with_platform(Platform::Android);
    file.add_object(1, ClassId::MeshRenderer, 0, len).unwrap();
    file.decode_all();

    let documents = export_file(&file, ExportOptions::new().with_export_version(version)).unwrap();
    assert_eq!(documents.len(), 1);
    let body = documents[0].body().unwrap();
    assert_eq!(body.get("m_RenderingLayerMask"), Some(&ExportNode::UInt(1)));
    assert_eq!(body.get("m_SortingLayerID"), Some(&ExportNode::Int(0)));

    let json: serde_json::Value = serde_json::from_str(&documents[0].to_json().unwrap()).unwrap();
    assert_eq!(json["MeshRenderer"]["m_Materials"], serde_json::json!([]));
    assert_eq!(json["MeshRenderer"]["m_StaticBatchInfo"]["subMeshCount"], 0);
}
