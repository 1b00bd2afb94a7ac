//! Renderer field gates
//!
//! Each predicate documents the version range it covers. Ranges are inclusive at
//! the lower bound and exclusive at the upper bound; `X.Y` means the first
//! release of that series.

use crate::version::{FormatVersion, ReleaseType, TransferFlags};

const fn v(major: u16, minor: u16) -> FormatVersion {
    FormatVersion::series(major, minor)
}

fn lightmap_flags(flags: TransferFlags) -> bool {
    flags.is_release() || flags.is_for_inspector()
}

/// 2017.2 and later.
pub fn has_dynamic_occludee(version: FormatVersion) -> bool {
    version.is_at_least(v(2017, 2))
}

/// Motion vectors and light probe usage bytes: 5.4 and later.
pub fn has_motion_vectors(version: FormatVersion) -> bool {
    version.is_at_least(v(5, 4))
}

/// 2018.1 and later.
pub fn has_rendering_layer_mask(version: FormatVersion) -> bool {
    version.is_at_least(v(2018, 1))
}

/// 2018.3 and later.
pub fn has_renderer_priority(version: FormatVersion) -> bool {
    version.is_at_least(v(2018, 3))
}

/// 2.1 and later, release or inspector data only.
pub fn has_lightmap_index(version: FormatVersion, flags: TransferFlags) -> bool {
    version.is_at_least(v(2, 1)) && lightmap_flags(flags)
}

/// 5.0 and later, release or inspector data only.
pub fn has_lightmap_index_dynamic(version: FormatVersion, flags: TransferFlags) -> bool {
    version.is_at_least(v(5, 0)) && lightmap_flags(flags)
}

/// 2.1 and later, release or inspector data only.
pub fn has_lightmap_tiling_offset(version: FormatVersion, flags: TransferFlags) -> bool {
    version.is_at_least(v(2, 1)) && lightmap_flags(flags)
}

/// 5.0 and later, release or inspector data only.
pub fn has_lightmap_tiling_offset_dynamic(version: FormatVersion, flags: TransferFlags) -> bool {
    version.is_at_least(v(5, 0)) && lightmap_flags(flags)
}

/// [3.0, 5.5)
pub fn has_subset_indices(version: FormatVersion) -> bool {
    version.is_within(v(3, 0), v(5, 5))
}

/// 5.5 and later; replaces the subset indices.
pub fn has_static_batch_info(version: FormatVersion) -> bool {
    version.is_at_least(v(5, 5))
}

/// 3.0 and later.
pub fn has_static_batch_root(version: FormatVersion) -> bool {
    version.is_at_least(v(3, 0))
}

/// [3.5, 5.4)
pub fn has_use_light_probes(version: FormatVersion) -> bool {
    version.is_within(v(3, 5), v(5, 4))
}

/// 5.0 and later.
pub fn has_reflection_probe_usage(version: FormatVersion) -> bool {
    version.is_at_least(v(5, 0))
}

/// From 5.4 the reflection probe usage is a byte next to the motion vectors;
/// before that an int after the light probe flag.
pub fn is_reflection_probe_usage_first(version: FormatVersion) -> bool {
    version.is_at_least(v(5, 4))
}

/// 3.5 and later.
pub fn has_probe_anchor(version: FormatVersion) -> bool {
    version.is_at_least(v(3, 5))
}

/// 5.4 and later.
pub fn has_light_probe_volume_override(version: FormatVersion) -> bool {
    version.is_at_least(v(5, 4))
}

/// Scale in lightmap and the rest of the editor lightmap block: editor data only.
pub fn has_editor_lightmap_settings(flags: TransferFlags) -> bool {
    !flags.is_release()
}

/// 4.5 and later, except the 5.6.0 alpha and beta releases.
pub fn has_sorting_layer_id(version: FormatVersion) -> bool {
    let last_beta = FormatVersion::new(5, 6, 0, ReleaseType::Beta, FormatVersion::MAX_BUILD);
    version.is_at_least(v(4, 5)) && (version.is_below(v(5, 6)) || version > last_beta)
}

/// 4.3.x, then 5.6 and later.
pub fn has_sorting_layer(version: FormatVersion) -> bool {
    version.is_series(4, 3) || version.is_at_least(v(5, 6))
}

/// 4.3 and later.
pub fn has_sorting_order(version: FormatVersion) -> bool {
    version.is_at_least(v(4, 3))
}

/// [5.0, 5.4): padding after `m_Enabled` and after the shadow bytes.
pub fn is_enabled_aligned(version: FormatVersion) -> bool {
    version.is_within(v(5, 0), v(5, 4))
}

/// Below 5.0 the lightmap index is a single byte.
pub fn is_lightmap_index_byte(version: FormatVersion) -> bool {
    version.is_below(v(5, 0))
}

/// Below 3.0 materials precede the lightmap tiling offset.
pub fn are_materials_first(version: FormatVersion) -> bool {
    version.is_below(v(3, 0))
}

/// 4.3 and later: padding before the sorting fields.
pub fn is_light_probe_aligned(version: FormatVersion) -> bool {
    version.is_at_least(v(4, 3))
}

/// 4.5 and later: padding after the sorting order.
pub fn is_sorting_order_aligned(version: FormatVersion) -> bool {
    version.is_at_least(v(4, 5))
}
