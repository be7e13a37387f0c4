//! Extension metadata: which scope an extension belongs to, and what became
//! of it (promoted to core or to another extension, deprecated, obsoleted).
//!
//! Promotion is what ties an extension entry point to its core alias, so a
//! scope running a core version an extension was promoted to counts as
//! providing that extension's entry points.

use std::fmt;

use crate::command::{ApiVersion, Scope};

/// Where the functionality of an extension went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Successor {
    Core(ApiVersion),
    Extension(&'static str),
}

impl fmt::Display for Successor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Successor::Core(version) => write!(f, "Vulkan {}", version),
            Successor::Extension(name) => f.write_str(name),
        }
    }
}

/// An extension that should no longer be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deprecation {
    /// Still works; `None` when nothing replaces it.
    Deprecated(Option<Successor>),
    /// Must not be enabled together with its replacement.
    Obsoleted(Successor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionInfo {
    pub name: &'static str,
    /// `Scope::Instance` or `Scope::Device`.
    pub scope: Scope,
    pub promoted_to: Option<Successor>,
    pub deprecation: Option<Deprecation>,
}

impl ExtensionInfo {
    const fn new(name: &'static str, scope: Scope) -> Self {
        Self {
            name,
            scope,
            promoted_to: None,
            deprecation: None,
        }
    }

    const fn promoted(self, successor: Successor) -> Self {
        Self {
            promoted_to: Some(successor),
            ..self
        }
    }

    const fn deprecated(self, successor: Option<Successor>) -> Self {
        Self {
            deprecation: Some(Deprecation::Deprecated(successor)),
            ..self
        }
    }

    const fn obsoleted(self, successor: Successor) -> Self {
        Self {
            deprecation: Some(Deprecation::Obsoleted(successor)),
            ..self
        }
    }
}

const fn instance(name: &'static str) -> ExtensionInfo {
    ExtensionInfo::new(name, Scope::Instance)
}

const fn device(name: &'static str) -> ExtensionInfo {
    ExtensionInfo::new(name, Scope::Device)
}

const V1_1: Successor = Successor::Core(ApiVersion::V1_1);
const V1_2: Successor = Successor::Core(ApiVersion::V1_2);
const V1_3: Successor = Successor::Core(ApiVersion::V1_3);

const fn ext(name: &'static str) -> Successor {
    Successor::Extension(name)
}

/// Every known extension. Platform surface extensions are listed on every
/// target, like their entry points.
pub static EXTENSIONS: &[ExtensionInfo] = &[
    // ── Instance ────────────────────────────────────────────
    instance("VK_KHR_surface"),
    instance("VK_KHR_display"),
    instance("VK_KHR_xlib_surface"),
    instance("VK_KHR_xcb_surface"),
    instance("VK_KHR_wayland_surface"),
    instance("VK_KHR_android_surface"),
    instance("VK_KHR_win32_surface"),
    instance("VK_EXT_metal_surface"),
    instance("VK_EXT_headless_surface"),
    instance("VK_MVK_ios_surface").deprecated(Some(ext("VK_EXT_metal_surface"))),
    instance("VK_MVK_macos_surface").deprecated(Some(ext("VK_EXT_metal_surface"))),
    instance("VK_EXT_debug_report").deprecated(Some(ext("VK_EXT_debug_utils"))),
    instance("VK_EXT_debug_utils"),
    instance("VK_NV_external_memory_capabilities")
        .deprecated(Some(ext("VK_KHR_external_memory_capabilities"))),
    instance("VK_KHR_get_physical_device_properties2").promoted(V1_1),
    instance("VK_KHR_device_group_creation").promoted(V1_1),
    instance("VK_KHR_external_memory_capabilities").promoted(V1_1),
    instance("VK_KHR_external_semaphore_capabilities").promoted(V1_1),
    instance("VK_KHR_external_fence_capabilities").promoted(V1_1),
    instance("VK_EXT_validation_flags").deprecated(Some(ext("VK_EXT_validation_features"))),
    instance("VK_EXT_validation_features"),
    instance("VK_EXT_direct_mode_display"),
    instance("VK_EXT_acquire_xlib_display"),
    instance("VK_EXT_acquire_drm_display"),
    instance("VK_EXT_display_surface_counter"),
    instance("VK_EXT_swapchain_colorspace"),
    instance("VK_KHR_get_surface_capabilities2"),
    instance("VK_KHR_get_display_properties2"),
    instance("VK_KHR_surface_protected_capabilities"),
    instance("VK_EXT_surface_maintenance1"),
    instance("VK_KHR_portability_enumeration"),
    instance("VK_GOOGLE_surfaceless_query"),
    instance("VK_LUNARG_direct_driver_loading"),
    // ── Device ──────────────────────────────────────────────
    device("VK_KHR_swapchain"),
    device("VK_KHR_display_swapchain"),
    device("VK_KHR_acceleration_structure"),
    device("VK_KHR_deferred_host_operations"),
    device("VK_KHR_ray_tracing_pipeline"),
    device("VK_NV_glsl_shader").deprecated(None),
    device("VK_IMG_format_pvrtc").deprecated(None),
    device("VK_NV_dedicated_allocation").deprecated(Some(ext("VK_KHR_dedicated_allocation"))),
    device("VK_AMD_gpu_shader_half_float").deprecated(Some(ext("VK_KHR_shader_float16_int8"))),
    device("VK_AMD_gpu_shader_int16").deprecated(Some(ext("VK_KHR_shader_float16_int8"))),
    device("VK_NV_external_memory").deprecated(Some(ext("VK_KHR_external_memory"))),
    device("VK_NV_external_memory_win32").deprecated(Some(ext("VK_KHR_external_memory_win32"))),
    device("VK_KHR_external_memory_win32"),
    device("VK_EXT_shader_subgroup_ballot").deprecated(Some(V1_2)),
    device("VK_EXT_shader_subgroup_vote").deprecated(Some(V1_1)),
    device("VK_EXT_buffer_device_address").deprecated(Some(ext("VK_KHR_buffer_device_address"))),
    device("VK_AMD_negative_viewport_height").obsoleted(ext("VK_KHR_maintenance1")),
    device("VK_EXT_debug_marker").promoted(ext("VK_EXT_debug_utils")),
    device("VK_AMD_draw_indirect_count").promoted(ext("VK_KHR_draw_indirect_count")),
    device("VK_NV_win32_keyed_mutex").promoted(ext("VK_KHR_win32_keyed_mutex")),
    device("VK_KHR_win32_keyed_mutex"),
    device("VK_EXT_global_priority").promoted(ext("VK_KHR_global_priority")),
    device("VK_EXT_global_priority_query").promoted(ext("VK_KHR_global_priority")),
    device("VK_KHR_global_priority"),
    device("VK_NV_fragment_shader_barycentric").promoted(ext("VK_KHR_fragment_shader_barycentric")),
    device("VK_KHR_fragment_shader_barycentric"),
    device("VK_ARM_rasterization_order_attachment_access")
        .promoted(ext("VK_EXT_rasterization_order_attachment_access")),
    device("VK_EXT_rasterization_order_attachment_access"),
    device("VK_VALVE_mutable_descriptor_type").promoted(ext("VK_EXT_mutable_descriptor_type")),
    device("VK_EXT_mutable_descriptor_type"),
    // Promoted to 1.1
    device("VK_KHR_multiview").promoted(V1_1),
    device("VK_KHR_device_group").promoted(V1_1),
    device("VK_KHR_shader_draw_parameters").promoted(V1_1),
    device("VK_KHR_maintenance1").promoted(V1_1),
    device("VK_KHR_maintenance2").promoted(V1_1),
    device("VK_KHR_maintenance3").promoted(V1_1),
    device("VK_KHR_external_memory").promoted(V1_1),
    device("VK_KHR_external_semaphore").promoted(V1_1),
    device("VK_KHR_external_fence").promoted(V1_1),
    device("VK_KHR_16bit_storage").promoted(V1_1),
    device("VK_KHR_descriptor_update_template").promoted(V1_1),
    device("VK_KHR_variable_pointers").promoted(V1_1),
    device("VK_KHR_dedicated_allocation").promoted(V1_1),
    device("VK_KHR_storage_buffer_storage_class").promoted(V1_1),
    device("VK_KHR_relaxed_block_layout").promoted(V1_1),
    device("VK_KHR_get_memory_requirements2").promoted(V1_1),
    device("VK_KHR_sampler_ycbcr_conversion").promoted(V1_1),
    device("VK_KHR_bind_memory2").promoted(V1_1),
    // Promoted to 1.2
    device("VK_KHR_sampler_mirror_clamp_to_edge").promoted(V1_2),
    device("VK_KHR_shader_float16_int8").promoted(V1_2),
    device("VK_KHR_imageless_framebuffer").promoted(V1_2),
    device("VK_KHR_create_renderpass2").promoted(V1_2),
    device("VK_EXT_sampler_filter_minmax").promoted(V1_2),
    device("VK_KHR_image_format_list").promoted(V1_2),
    device("VK_EXT_descriptor_indexing").promoted(V1_2),
    device("VK_EXT_shader_viewport_index_layer").promoted(V1_2),
    device("VK_KHR_draw_indirect_count").promoted(V1_2),
    device("VK_KHR_shader_subgroup_extended_types").promoted(V1_2),
    device("VK_KHR_8bit_storage").promoted(V1_2),
    device("VK_KHR_shader_atomic_int64").promoted(V1_2),
    device("VK_KHR_driver_properties").promoted(V1_2),
    device("VK_KHR_shader_float_controls").promoted(V1_2),
    device("VK_KHR_depth_stencil_resolve").promoted(V1_2),
    device("VK_KHR_timeline_semaphore").promoted(V1_2),
    device("VK_KHR_vulkan_memory_model").promoted(V1_2),
    device("VK_EXT_scalar_block_layout").promoted(V1_2),
    device("VK_KHR_spirv_1_4").promoted(V1_2),
    device("VK_KHR_separate_depth_stencil_layouts").promoted(V1_2),
    device("VK_EXT_separate_stencil_usage").promoted(V1_2),
    device("VK_KHR_uniform_buffer_standard_layout").promoted(V1_2),
    device("VK_KHR_buffer_device_address").promoted(V1_2),
    device("VK_EXT_host_query_reset").promoted(V1_2),
    // Promoted to 1.3
    device("VK_KHR_dynamic_rendering").promoted(V1_3),
    device("VK_EXT_texture_compression_astc_hdr").promoted(V1_3),
    device("VK_EXT_inline_uniform_block").promoted(V1_3),
    device("VK_EXT_pipeline_creation_feedback").promoted(V1_3),
    device("VK_KHR_shader_terminate_invocation").promoted(V1_3),
    device("VK_EXT_subgroup_size_control").promoted(V1_3),
    device("VK_EXT_tooling_info").promoted(V1_3),
    device("VK_EXT_extended_dynamic_state").promoted(V1_3),
    device("VK_EXT_extended_dynamic_state2").promoted(V1_3),
    device("VK_EXT_shader_demote_to_helper_invocation").promoted(V1_3),
    device("VK_KHR_shader_integer_dot_product").promoted(V1_3),
    device("VK_EXT_texel_buffer_alignment").promoted(V1_3),
    device("VK_KHR_shader_non_semantic_info").promoted(V1_3),
    device("VK_EXT_private_data").promoted(V1_3),
    device("VK_EXT_pipeline_creation_cache_control").promoted(V1_3),
    device("VK_KHR_synchronization2").promoted(V1_3),
    device("VK_KHR_zero_initialize_workgroup_memory").promoted(V1_3),
    device("VK_EXT_ycbcr_2plane_444_formats").promoted(V1_3),
    device("VK_EXT_image_robustness").promoted(V1_3),
    device("VK_KHR_copy_commands2").promoted(V1_3),
    device("VK_EXT_4444_formats").promoted(V1_3),
    device("VK_KHR_format_feature_flags2").promoted(V1_3),
    device("VK_KHR_maintenance4").promoted(V1_3),
];

pub fn extension(name: &str) -> Option<&'static ExtensionInfo> {
    EXTENSIONS.iter().find(|info| info.name == name)
}

pub fn is_instance_extension(name: &str) -> bool {
    extension(name).is_some_and(|info| info.scope == Scope::Instance)
}

pub fn is_device_extension(name: &str) -> bool {
    extension(name).is_some_and(|info| info.scope == Scope::Device)
}

pub fn promoted_to(name: &str) -> Option<Successor> {
    extension(name).and_then(|info| info.promoted_to)
}

pub fn is_promoted_extension(name: &str) -> bool {
    promoted_to(name).is_some()
}

/// The replacement of a deprecated extension. `Some(None)` means deprecated
/// with no replacement.
pub fn deprecated_by(name: &str) -> Option<Option<Successor>> {
    match extension(name)?.deprecation? {
        Deprecation::Deprecated(successor) => Some(successor),
        Deprecation::Obsoleted(_) => None,
    }
}

pub fn obsoleted_by(name: &str) -> Option<Successor> {
    match extension(name)?.deprecation? {
        Deprecation::Obsoleted(successor) => Some(successor),
        Deprecation::Deprecated(_) => None,
    }
}

pub fn is_deprecated_extension(name: &str) -> bool {
    deprecated_by(name).is_some()
}

pub fn is_obsoleted_extension(name: &str) -> bool {
    obsoleted_by(name).is_some()
}

/// The core version that absorbed `name`, following promotions through other
/// extensions (`VK_AMD_draw_indirect_count` → `VK_KHR_draw_indirect_count` →
/// 1.2).
pub fn core_version(name: &str) -> Option<ApiVersion> {
    let mut current = name;
    // Bounded by the catalog size; promotion chains never loop.
    for _ in 0..EXTENSIONS.len() {
        match promoted_to(current)? {
            Successor::Core(version) => return Some(version),
            Successor::Extension(next) => current = next,
        }
    }
    None
}
