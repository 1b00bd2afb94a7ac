//! Renderer component record
//!
//! The renderer is the reference case of a version-gated record: about thirty
//! fields whose presence, width and padding depend on the format version and
//! transfer flags. Fields are read strictly in serialized order; every
//! alignment point depends on which optional fields came before it.

pub mod gates;
mod modes;
mod static_batch;

use glam::Vec4;

use crate::error::Result;
use crate::export::{ExportContainer, ExportMapping, ExportNode, Exportable};
use crate::io::{ALIGN, AssetReader, AssetWriter};

use super::Dependency;
use super::object::CommonFields;
use super::pptr::{GameObject, LightmapParameters, Material, PPtr, Transform};

pub use modes::{
    EditorSelectedRenderState, LightProbeUsage, MotionVectorGenerationMode, ReflectionProbeUsage,
    ShadowCastingMode,
};
pub use static_batch::StaticBatchInfo;

/// Lightmap index meaning "not lightmapped".
pub const NO_LIGHTMAP: u16 = 0xFFFF;

/// Lightmapping settings stored only in editor data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorLightmapSettings {
    pub scale_in_lightmap: f32,
    pub preserve_uvs: bool,
    pub ignore_normals_for_chart_detection: bool,
    pub important_gi: bool,
    pub stitch_lightmap_seams: bool,
    pub selected_editor_render_state: EditorSelectedRenderState,
    pub minimum_chart_size: i32,
    pub auto_uv_max_distance: f32,
    pub auto_uv_max_angle: f32,
    pub lightmap_parameters: PPtr<LightmapParameters>,
}

impl Default for EditorLightmapSettings {
    fn default() -> Self {
        Self {
            scale_in_lightmap: 1.0,
            preserve_uvs: false,
            ignore_normals_for_chart_detection: false,
            important_gi: false,
            stitch_lightmap_seams: false,
            selected_editor_render_state: EditorSelectedRenderState::WireframeAndHighlight,
            minimum_chart_size: 4,
            auto_uv_max_distance: 0.5,
            auto_uv_max_angle: 89.0,
            lightmap_parameters: PPtr::null(),
        }
    }
}

impl EditorLightmapSettings {
    fn read(reader: &mut AssetReader<'_>) -> Result<Self> {
        let scale_in_lightmap = reader.read_f32()?;
        let preserve_uvs = reader.read_bool()?;
        let ignore_normals_for_chart_detection = reader.read_bool()?;
        let important_gi = reader.read_bool()?;
        let stitch_lightmap_seams = reader.read_bool()?;
        reader.align(ALIGN)?;

        Ok(Self {
            scale_in_lightmap,
            preserve_uvs,
            ignore_normals_for_chart_detection,
            important_gi,
            stitch_lightmap_seams,
            selected_editor_render_state: EditorSelectedRenderState::from_i32(reader.read_i32()?),
            minimum_chart_size: reader.read_i32()?,
            auto_uv_max_distance: reader.read_f32()?,
            auto_uv_max_angle: reader.read_f32()?,
            lightmap_parameters: PPtr::read(reader)?,
        })
    }

    fn write(&self, writer: &mut AssetWriter) {
        writer.write_f32(self.scale_in_lightmap);
        writer.write_bool(self.preserve_uvs);
        writer.write_bool(self.ignore_normals_for_chart_detection);
        writer.write_bool(self.important_gi);
        writer.write_bool(self.stitch_lightmap_seams);
        writer.align(ALIGN);
        writer.write_i32(self.selected_editor_render_state.to_i32());
        writer.write_i32(self.minimum_chart_size);
        writer.write_f32(self.auto_uv_max_distance);
        writer.write_f32(self.auto_uv_max_angle);
        self.lightmap_parameters.write(writer);
    }
}

/// Fields shared by every renderer kind.
///
/// `Default` holds the documented default of each field, which is also what the
/// exporter writes when the source or target version lacks the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    pub common: CommonFields,
    pub enabled: bool,
    pub cast_shadows: ShadowCastingMode,
    pub receive_shadows: u8,
    pub dynamic_occludee: u8,
    pub motion_vectors: MotionVectorGenerationMode,
    pub light_probe_usage: LightProbeUsage,
    pub reflection_probe_usage: ReflectionProbeUsage,
    pub rendering_layer_mask: u32,
    pub renderer_priority: i32,
    pub lightmap_index: u16,
    pub lightmap_index_dynamic: u16,
    pub lightmap_tiling_offset: Vec4,
    pub lightmap_tiling_offset_dynamic: Vec4,
    pub materials: Vec<PPtr<Material>>,
    pub subset_indices: Vec<u32>,
    pub static_batch_info: StaticBatchInfo,
    pub static_batch_root: PPtr<Transform>,
    pub use_light_probes: bool,
    pub probe_anchor: PPtr<Transform>,
    pub light_probe_volume_override: PPtr<GameObject>,
    pub lightmap_settings: EditorLightmapSettings,
    pub sorting_layer_id: i32,
    pub sorting_layer: i16,
    pub sorting_order: i16,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            common: CommonFields::default(),
            enabled: true,
            cast_shadows: ShadowCastingMode::On,
            receive_shadows: 1,
            dynamic_occludee: 1,
            motion_vectors: MotionVectorGenerationMode::Object,
            light_probe_usage: LightProbeUsage::BlendProbes,
            reflection_probe_usage: ReflectionProbeUsage::BlendProbes,
            rendering_layer_mask: 1,
            renderer_priority: 0,
            lightmap_index: NO_LIGHTMAP,
            lightmap_index_dynamic: NO_LIGHTMAP,
            lightmap_tiling_offset: Vec4::new(1.0, 1.0, 0.0, 0.0),
            lightmap_tiling_offset_dynamic: Vec4::new(1.0, 1.0, 0.0, 0.0),
            materials: Vec::new(),
            subset_indices: Vec::new(),
            static_batch_info: StaticBatchInfo::default(),
            static_batch_root: PPtr::null(),
            use_light_probes: true,
            probe_anchor: PPtr::null(),
            light_probe_volume_override: PPtr::null(),
            lightmap_settings: EditorLightmapSettings::default(),
            sorting_layer_id: 0,
            sorting_layer: 0,
            sorting_order: 0,
        }
    }
}

impl Renderer {
    pub fn read(reader: &mut AssetReader<'_>) -> Result<Self> {
        let (version, flags) = (reader.version(), reader.flags());
        let mut renderer = Self {
            common: CommonFields::read(reader)?,
            ..Self::default()
        };

        renderer.enabled = reader.read_bool()?;
        if gates::is_enabled_aligned(version) {
            reader.align(ALIGN)?;
        }

        renderer.cast_shadows = ShadowCastingMode::from_u8(reader.read_u8()?);
        renderer.receive_shadows = reader.read_u8()?;
        if gates::has_dynamic_occludee(version) {
            renderer.dynamic_occludee = reader.read_u8()?;
        }
        if gates::is_enabled_aligned(version) {
            reader.align(ALIGN)?;
        }

        if gates::has_motion_vectors(version) {
            renderer.motion_vectors = MotionVectorGenerationMode::from_u8(reader.read_u8()?);
            renderer.light_probe_usage = LightProbeUsage::from_u8(reader.read_u8()?);
        }
        if gates::has_reflection_probe_usage(version) && gates::is_reflection_probe_usage_first(version) {
            renderer.reflection_probe_usage = ReflectionProbeUsage::from_u8(reader.read_u8()?);
            reader.align(ALIGN)?;
        }

        if gates::has_rendering_layer_mask(version) {
            renderer.rendering_layer_mask = reader.read_u32()?;
        }
        if gates::has_renderer_priority(version) {
            renderer.renderer_priority = reader.read_i32()?;
        }

        if gates::has_lightmap_index(version, flags) {
            renderer.lightmap_index = if gates::is_lightmap_index_byte(version) {
                u16::from(reader.read_u8()?)
            } else {
                reader.read_u16()?
            };
        }
        if gates::has_lightmap_index_dynamic(version, flags) {
            renderer.lightmap_index_dynamic = reader.read_u16()?;
        }

        if gates::are_materials_first(version) {
            renderer.materials = reader.read_array(PPtr::read)?;
        }
        if gates::has_lightmap_tiling_offset(version, flags) {
            renderer.lightmap_tiling_offset = reader.read_vec4()?;
        }
        if gates::has_lightmap_tiling_offset_dynamic(version, flags) {
            renderer.lightmap_tiling_offset_dynamic = reader.read_vec4()?;
        }
        if !gates::are_materials_first(version) {
            renderer.materials = reader.read_array(PPtr::read)?;
        }

        if gates::has_subset_indices(version) {
            renderer.subset_indices = reader.read_u32_array()?;
        }
        if gates::has_static_batch_info(version) {
            renderer.static_batch_info = StaticBatchInfo::read(reader)?;
        }
        if gates::has_static_batch_root(version) {
            renderer.static_batch_root = PPtr::read(reader)?;
        }

        if gates::has_use_light_probes(version) {
            renderer.use_light_probes = reader.read_bool()?;
            reader.align(ALIGN)?;
        }
        if gates::has_reflection_probe_usage(version) && !gates::is_reflection_probe_usage_first(version) {
            renderer.reflection_probe_usage = ReflectionProbeUsage::from_i32(reader.read_i32()?);
        }

        if gates::has_probe_anchor(version) {
            renderer.probe_anchor = PPtr::read(reader)?;
        }
        if gates::has_light_probe_volume_override(version) {
            renderer.light_probe_volume_override = PPtr::read(reader)?;
        }
        if gates::has_editor_lightmap_settings(flags) {
            renderer.lightmap_settings = EditorLightmapSettings::read(reader)?;
        }
        if gates::is_light_probe_aligned(version) {
            reader.align(ALIGN)?;
        }

        if gates::has_sorting_layer_id(version) {
            renderer.sorting_layer_id = reader.read_i32()?;
        }
        if gates::has_sorting_layer(version) {
            renderer.sorting_layer = reader.read_i16()?;
        }
        if gates::has_sorting_order(version) {
            renderer.sorting_order = reader.read_i16()?;
        }
        if gates::is_sorting_order_aligned(version) {
            reader.align(ALIGN)?;
        }

        Ok(renderer)
    }

    pub fn write(&self, writer: &mut AssetWriter) {
        let (version, flags) = (writer.version(), writer.flags());
        self.common.write(writer);

        writer.write_bool(self.enabled);
        if gates::is_enabled_aligned(version) {
            writer.align(ALIGN);
        }

        writer.write_u8(self.cast_shadows.to_u8());
        writer.write_u8(self.receive_shadows);
        if gates::has_dynamic_occludee(version) {
            writer.write_u8(self.dynamic_occludee);
        }
        if gates::is_enabled_aligned(version) {
            writer.align(ALIGN);
        }

        if gates::has_motion_vectors(version) {
            writer.write_u8(self.motion_vectors.to_u8());
            writer.write_u8(self.light_probe_usage.to_u8());
        }
        if gates::has_reflection_probe_usage(version) && gates::is_reflection_probe_usage_first(version) {
            writer.write_u8(self.reflection_probe_usage.to_u8());
            writer.align(ALIGN);
        }

        if gates::has_rendering_layer_mask(version) {
            writer.write_u32(self.rendering_layer_mask);
        }
        if gates::has_renderer_priority(version) {
            writer.write_i32(self.renderer_priority);
        }

        if gates::has_lightmap_index(version, flags) {
            if gates::is_lightmap_index_byte(version) {
                writer.write_u8(self.lightmap_index as u8);
            } else {
                writer.write_u16(self.lightmap_index);
            }
        }
        if gates::has_lightmap_index_dynamic(version, flags) {
            writer.write_u16(self.lightmap_index_dynamic);
        }

        if gates::are_materials_first(version) {
            writer.write_array(&self.materials, |w, material| material.write(w));
        }
        if gates::has_lightmap_tiling_offset(version, flags) {
            writer.write_vec4(self.lightmap_tiling_offset);
        }
        if gates::has_lightmap_tiling_offset_dynamic(version, flags) {
            writer.write_vec4(self.lightmap_tiling_offset_dynamic);
        }
        if !gates::are_materials_first(version) {
            writer.write_array(&self.materials, |w, material| material.write(w));
        }

        if gates::has_subset_indices(version) {
            writer.write_u32_array(&self.subset_indices);
        }
        if gates::has_static_batch_info(version) {
            self.static_batch_info.write(writer);
        }
        if gates::has_static_batch_root(version) {
            self.static_batch_root.write(writer);
        }

        if gates::has_use_light_probes(version) {
            writer.write_bool(self.use_light_probes);
            writer.align(ALIGN);
        }
        if gates::has_reflection_probe_usage(version) && !gates::is_reflection_probe_usage_first(version) {
            writer.write_i32(self.reflection_probe_usage.to_i32());
        }

        if gates::has_probe_anchor(version) {
            self.probe_anchor.write(writer);
        }
        if gates::has_light_probe_volume_override(version) {
            self.light_probe_volume_override.write(writer);
        }
        if gates::has_editor_lightmap_settings(flags) {
            self.lightmap_settings.write(writer);
        }
        if gates::is_light_probe_aligned(version) {
            writer.align(ALIGN);
        }

        if gates::has_sorting_layer_id(version) {
            writer.write_i32(self.sorting_layer_id);
        }
        if gates::has_sorting_layer(version) {
            writer.write_i16(self.sorting_layer);
        }
        if gates::has_sorting_order(version) {
            writer.write_i16(self.sorting_order);
        }
        if gates::is_sorting_order_aligned(version) {
            writer.align(ALIGN);
        }
    }

    /// Non-null references, in field order.
    pub fn dependencies(&self) -> impl Iterator<Item = Dependency> + '_ {
        let materials = self
            .materials
            .iter()
            .map(|material| Dependency::new("m_Materials", material.erase()));
        let singles = [
            Dependency::new("m_StaticBatchRoot", self.static_batch_root.erase()),
            Dependency::new("m_ProbeAnchor", self.probe_anchor.erase()),
            Dependency::new("m_LightProbeVolumeOverride", self.light_probe_volume_override.erase()),
            Dependency::new("m_LightmapParameters", self.lightmap_settings.lightmap_parameters.erase()),
        ];

        self.common
            .dependencies()
            .chain(materials)
            .chain(singles)
            .filter(|dependency| !dependency.reference.is_null())
    }

    /// Export mapping with the renderer keys after the common prefix.
    pub fn export_mapping(&self, container: &ExportContainer) -> ExportMapping {
        let defaults = Self::default();
        let settings = container.field(
            |_, flags| gates::has_editor_lightmap_settings(flags),
            self.lightmap_settings,
            defaults.lightmap_settings,
        );

        let mut node = self.common.export(container);
        node.add("m_Enabled", self.enabled);
        node.add("m_CastShadows", self.cast_shadows.to_u8());
        node.add("m_ReceiveShadows", self.receive_shadows);
        node.add(
            "m_DynamicOccludee",
            container.field(|v, _| gates::has_dynamic_occludee(v), self.dynamic_occludee, defaults.dynamic_occludee),
        );
        node.add(
            "m_MotionVectors",
            container
                .field(|v, _| gates::has_motion_vectors(v), self.motion_vectors, defaults.motion_vectors)
                .to_u8(),
        );
        node.add(
            "m_LightProbeUsage",
            container
                .field(|v, _| gates::has_motion_vectors(v), self.light_probe_usage, defaults.light_probe_usage)
                .to_u8(),
        );
        node.add(
            "m_ReflectionProbeUsage",
            container
                .field(
                    |v, _| gates::has_reflection_probe_usage(v),
                    self.reflection_probe_usage,
                    defaults.reflection_probe_usage,
                )
                .to_u8(),
        );
        if container.exports(|v, _| gates::has_rendering_layer_mask(v)) {
            node.add(
                "m_RenderingLayerMask",
                container.field(
                    |v, _| gates::has_rendering_layer_mask(v),
                    self.rendering_layer_mask,
                    defaults.rendering_layer_mask,
                ),
            );
        }
        if container.exports(|v, _| gates::has_renderer_priority(v)) {
            node.add(
                "m_RendererPriority",
                container.field(
                    |v, _| gates::has_renderer_priority(v),
                    self.renderer_priority,
                    defaults.renderer_priority,
                ),
            );
        }

        let materials: Vec<ExportNode> = self.materials.iter().map(|m| m.export(container)).collect();
        node.add("m_Materials", materials);

        let static_batch_info = if gates::has_subset_indices(container.version()) {
            StaticBatchInfo::from_subset_indices(&self.subset_indices)
        } else {
            self.static_batch_info
        };
        node.add("m_StaticBatchInfo", static_batch_info.export(container));
        node.add("m_StaticBatchRoot", self.static_batch_root.export(container));
        node.add("m_ProbeAnchor", self.probe_anchor.export(container));
        node.add("m_LightProbeVolumeOverride", self.light_probe_volume_override.export(container));

        node.add("m_ScaleInLightmap", settings.scale_in_lightmap);
        node.add("m_PreserveUVs", settings.preserve_uvs);
        node.add("m_IgnoreNormalsForChartDetection", settings.ignore_normals_for_chart_detection);
        node.add("m_ImportantGI", settings.important_gi);
        node.add("m_StitchLightmapSeams", settings.stitch_lightmap_seams);
        node.add("m_SelectedEditorRenderState", settings.selected_editor_render_state.to_i32());
        node.add("m_MinimumChartSize", settings.minimum_chart_size);
        node.add("m_AutoUVMaxDistance", settings.auto_uv_max_distance);
        node.add("m_AutoUVMaxAngle", settings.auto_uv_max_angle);
        node.add("m_LightmapParameters", settings.lightmap_parameters.export(container));

        node.add(
            "m_SortingLayerID",
            container.field(|v, _| gates::has_sorting_layer_id(v), self.sorting_layer_id, 0),
        );
        node.add(
            "m_SortingLayer",
            container.field(|v, _| gates::has_sorting_layer(v), self.sorting_layer, 0),
        );
        node.add(
            "m_SortingOrder",
            container.field(|v, _| gates::has_sorting_order(v), self.sorting_order, 0),
        );
        node
    }
}

impl Exportable for Renderer {
    fn export(&self, container: &ExportContainer) -> ExportNode {
        self.export_mapping(container).into()
    }
}
