//! The three command catalogs.
//!
//! Each entry names a native entry point, the requirement that makes a scope
//! advertise it, and the typed function pointer the dispatcher hands out.
//! Members of an alias group share one signature, so the typed accessor of a
//! canonical name stays correct when the slot was filled from an alias.

use std::ffi::CStr;

use ash::vk;

use crate::command::{ApiVersion, Command, Requirement, Scope};
use crate::dispatch::{ContextDispatcher, DeviceDispatcher, InstanceDispatcher};
use crate::error::Result;

const V1_0: Requirement = Requirement::Core(ApiVersion::V1_0);
const V1_1: Requirement = Requirement::Core(ApiVersion::V1_1);
const V1_2: Requirement = Requirement::Core(ApiVersion::V1_2);
const V1_3: Requirement = Requirement::Core(ApiVersion::V1_3);

const fn ext(name: &'static str) -> Requirement {
    Requirement::Extension(name)
}

macro_rules! command_catalog {
    (
        $(#[$meta:meta])*
        pub enum $catalog:ident: $scope:ident, $dispatcher:ident {
            $( $variant:ident = $name:literal, $req:expr, $pfn:ident => $method:ident; )*
        }
        aliases {
            $( [ $($alias:ident),+ ] )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $catalog {
            $( $variant, )*
        }

        impl Command for $catalog {
            const SCOPE: Scope = Scope::$scope;
            const ALL: &'static [Self] = &[$( Self::$variant, )*];
            const ALIASES: &'static [&'static [Self]] = &[$( &[$( Self::$alias ),+] as &[Self], )*];

            fn index(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            fn c_name(self) -> &'static CStr {
                match self {
                    $(
                        // SAFETY: catalog names are ASCII literals with a single trailing NUL.
                        Self::$variant => unsafe {
                            CStr::from_bytes_with_nul_unchecked(concat!($name, "\0").as_bytes())
                        },
                    )*
                }
            }

            fn requirement(self) -> Requirement {
                match self {
                    $( Self::$variant => $req, )*
                }
            }
        }

        impl $dispatcher {
            $(
                #[doc = concat!("`", $name, "`, or the highest-precedence alias that resolved.")]
                pub fn $method(&self) -> Result<vk::$pfn> {
                    // SAFETY: the slot holds a pointer the loader returned for this
                    // name or for an alias with the same signature.
                    unsafe { self.table().typed::<vk::$pfn>($catalog::$variant) }
                }
            )*
        }
    };
}

command_catalog! {
    /// Entry points resolved with `vkGetInstanceProcAddr(NULL, name)`.
    pub enum GlobalCommand: Global, ContextDispatcher {
        CreateInstance = "vkCreateInstance", V1_0, PFN_vkCreateInstance => create_instance;
        EnumerateInstanceExtensionProperties = "vkEnumerateInstanceExtensionProperties", V1_0,
            PFN_vkEnumerateInstanceExtensionProperties => enumerate_instance_extension_properties;
        EnumerateInstanceLayerProperties = "vkEnumerateInstanceLayerProperties", V1_0,
            PFN_vkEnumerateInstanceLayerProperties => enumerate_instance_layer_properties;
        EnumerateInstanceVersion = "vkEnumerateInstanceVersion", V1_1,
            PFN_vkEnumerateInstanceVersion => enumerate_instance_version;
    }
    aliases {}
}

command_catalog! {
    /// Entry points resolved with `vkGetInstanceProcAddr(instance, name)`.
    pub enum InstanceCommand: Instance, InstanceDispatcher {
        // ── Core 1.0 ──────────────────────────────────────────────
        DestroyInstance = "vkDestroyInstance", V1_0, PFN_vkDestroyInstance => destroy_instance;
        EnumeratePhysicalDevices = "vkEnumeratePhysicalDevices", V1_0,
            PFN_vkEnumeratePhysicalDevices => enumerate_physical_devices;
        GetPhysicalDeviceFeatures = "vkGetPhysicalDeviceFeatures", V1_0,
            PFN_vkGetPhysicalDeviceFeatures => get_physical_device_features;
        GetPhysicalDeviceFormatProperties = "vkGetPhysicalDeviceFormatProperties", V1_0,
            PFN_vkGetPhysicalDeviceFormatProperties => get_physical_device_format_properties;
        GetPhysicalDeviceImageFormatProperties = "vkGetPhysicalDeviceImageFormatProperties", V1_0,
            PFN_vkGetPhysicalDeviceImageFormatProperties => get_physical_device_image_format_properties;
        GetPhysicalDeviceProperties = "vkGetPhysicalDeviceProperties", V1_0,
            PFN_vkGetPhysicalDeviceProperties => get_physical_device_properties;
        GetPhysicalDeviceQueueFamilyProperties = "vkGetPhysicalDeviceQueueFamilyProperties", V1_0,
            PFN_vkGetPhysicalDeviceQueueFamilyProperties => get_physical_device_queue_family_properties;
        GetPhysicalDeviceMemoryProperties = "vkGetPhysicalDeviceMemoryProperties", V1_0,
            PFN_vkGetPhysicalDeviceMemoryProperties => get_physical_device_memory_properties;
        GetPhysicalDeviceSparseImageFormatProperties = "vkGetPhysicalDeviceSparseImageFormatProperties", V1_0,
            PFN_vkGetPhysicalDeviceSparseImageFormatProperties => get_physical_device_sparse_image_format_properties;
        GetDeviceProcAddr = "vkGetDeviceProcAddr", V1_0, PFN_vkGetDeviceProcAddr => get_device_proc_addr;
        CreateDevice = "vkCreateDevice", V1_0, PFN_vkCreateDevice => create_device;
        EnumerateDeviceExtensionProperties = "vkEnumerateDeviceExtensionProperties", V1_0,
            PFN_vkEnumerateDeviceExtensionProperties => enumerate_device_extension_properties;
        EnumerateDeviceLayerProperties = "vkEnumerateDeviceLayerProperties", V1_0,
            PFN_vkEnumerateDeviceLayerProperties => enumerate_device_layer_properties;

        // ── Core 1.1, promoted from KHR ───────────────────────────
        GetPhysicalDeviceFeatures2 = "vkGetPhysicalDeviceFeatures2", V1_1,
            PFN_vkGetPhysicalDeviceFeatures2 => get_physical_device_features2;
        GetPhysicalDeviceFeatures2KHR = "vkGetPhysicalDeviceFeatures2KHR",
            ext("VK_KHR_get_physical_device_properties2"),
            PFN_vkGetPhysicalDeviceFeatures2 => get_physical_device_features2_khr;
        GetPhysicalDeviceProperties2 = "vkGetPhysicalDeviceProperties2", V1_1,
            PFN_vkGetPhysicalDeviceProperties2 => get_physical_device_properties2;
        GetPhysicalDeviceProperties2KHR = "vkGetPhysicalDeviceProperties2KHR",
            ext("VK_KHR_get_physical_device_properties2"),
            PFN_vkGetPhysicalDeviceProperties2 => get_physical_device_properties2_khr;
        GetPhysicalDeviceFormatProperties2 = "vkGetPhysicalDeviceFormatProperties2", V1_1,
            PFN_vkGetPhysicalDeviceFormatProperties2 => get_physical_device_format_properties2;
        GetPhysicalDeviceFormatProperties2KHR = "vkGetPhysicalDeviceFormatProperties2KHR",
            ext("VK_KHR_get_physical_device_properties2"),
            PFN_vkGetPhysicalDeviceFormatProperties2 => get_physical_device_format_properties2_khr;
        GetPhysicalDeviceQueueFamilyProperties2 = "vkGetPhysicalDeviceQueueFamilyProperties2", V1_1,
            PFN_vkGetPhysicalDeviceQueueFamilyProperties2 => get_physical_device_queue_family_properties2;
        GetPhysicalDeviceQueueFamilyProperties2KHR = "vkGetPhysicalDeviceQueueFamilyProperties2KHR",
            ext("VK_KHR_get_physical_device_properties2"),
            PFN_vkGetPhysicalDeviceQueueFamilyProperties2 => get_physical_device_queue_family_properties2_khr;
        GetPhysicalDeviceMemoryProperties2 = "vkGetPhysicalDeviceMemoryProperties2", V1_1,
            PFN_vkGetPhysicalDeviceMemoryProperties2 => get_physical_device_memory_properties2;
        GetPhysicalDeviceMemoryProperties2KHR = "vkGetPhysicalDeviceMemoryProperties2KHR",
            ext("VK_KHR_get_physical_device_properties2"),
            PFN_vkGetPhysicalDeviceMemoryProperties2 => get_physical_device_memory_properties2_khr;
        EnumeratePhysicalDeviceGroups = "vkEnumeratePhysicalDeviceGroups", V1_1,
            PFN_vkEnumeratePhysicalDeviceGroups => enumerate_physical_device_groups;
        EnumeratePhysicalDeviceGroupsKHR = "vkEnumeratePhysicalDeviceGroupsKHR",
            ext("VK_KHR_device_group_creation"),
            PFN_vkEnumeratePhysicalDeviceGroups => enumerate_physical_device_groups_khr;
        GetPhysicalDeviceExternalBufferProperties = "vkGetPhysicalDeviceExternalBufferProperties", V1_1,
            PFN_vkGetPhysicalDeviceExternalBufferProperties => get_physical_device_external_buffer_properties;
        GetPhysicalDeviceExternalBufferPropertiesKHR = "vkGetPhysicalDeviceExternalBufferPropertiesKHR",
            ext("VK_KHR_external_memory_capabilities"),
            PFN_vkGetPhysicalDeviceExternalBufferProperties => get_physical_device_external_buffer_properties_khr;

        // ── Core 1.3, promoted from EXT ───────────────────────────
        GetPhysicalDeviceToolProperties = "vkGetPhysicalDeviceToolProperties", V1_3,
            PFN_vkGetPhysicalDeviceToolProperties => get_physical_device_tool_properties;
        GetPhysicalDeviceToolPropertiesEXT = "vkGetPhysicalDeviceToolPropertiesEXT",
            ext("VK_EXT_tooling_info"),
            PFN_vkGetPhysicalDeviceToolProperties => get_physical_device_tool_properties_ext;

        // ── VK_KHR_surface ────────────────────────────────────────
        DestroySurfaceKHR = "vkDestroySurfaceKHR", ext("VK_KHR_surface"),
            PFN_vkDestroySurfaceKHR => destroy_surface_khr;
        GetPhysicalDeviceSurfaceSupportKHR = "vkGetPhysicalDeviceSurfaceSupportKHR", ext("VK_KHR_surface"),
            PFN_vkGetPhysicalDeviceSurfaceSupportKHR => get_physical_device_surface_support_khr;
        GetPhysicalDeviceSurfaceCapabilitiesKHR = "vkGetPhysicalDeviceSurfaceCapabilitiesKHR", ext("VK_KHR_surface"),
            PFN_vkGetPhysicalDeviceSurfaceCapabilitiesKHR => get_physical_device_surface_capabilities_khr;
        GetPhysicalDeviceSurfaceFormatsKHR = "vkGetPhysicalDeviceSurfaceFormatsKHR", ext("VK_KHR_surface"),
            PFN_vkGetPhysicalDeviceSurfaceFormatsKHR => get_physical_device_surface_formats_khr;
        GetPhysicalDeviceSurfacePresentModesKHR = "vkGetPhysicalDeviceSurfacePresentModesKHR", ext("VK_KHR_surface"),
            PFN_vkGetPhysicalDeviceSurfacePresentModesKHR => get_physical_device_surface_present_modes_khr;

        // ── Platform surfaces ─────────────────────────────────────
        CreateXlibSurfaceKHR = "vkCreateXlibSurfaceKHR", ext("VK_KHR_xlib_surface"),
            PFN_vkCreateXlibSurfaceKHR => create_xlib_surface_khr;
        CreateXcbSurfaceKHR = "vkCreateXcbSurfaceKHR", ext("VK_KHR_xcb_surface"),
            PFN_vkCreateXcbSurfaceKHR => create_xcb_surface_khr;
        CreateWaylandSurfaceKHR = "vkCreateWaylandSurfaceKHR", ext("VK_KHR_wayland_surface"),
            PFN_vkCreateWaylandSurfaceKHR => create_wayland_surface_khr;
        CreateWin32SurfaceKHR = "vkCreateWin32SurfaceKHR", ext("VK_KHR_win32_surface"),
            PFN_vkCreateWin32SurfaceKHR => create_win32_surface_khr;
        CreateMetalSurfaceEXT = "vkCreateMetalSurfaceEXT", ext("VK_EXT_metal_surface"),
            PFN_vkCreateMetalSurfaceEXT => create_metal_surface_ext;
        CreateAndroidSurfaceKHR = "vkCreateAndroidSurfaceKHR", ext("VK_KHR_android_surface"),
            PFN_vkCreateAndroidSurfaceKHR => create_android_surface_khr;
        CreateHeadlessSurfaceEXT = "vkCreateHeadlessSurfaceEXT", ext("VK_EXT_headless_surface"),
            PFN_vkCreateHeadlessSurfaceEXT => create_headless_surface_ext;

        // ── VK_EXT_debug_utils ────────────────────────────────────
        CreateDebugUtilsMessengerEXT = "vkCreateDebugUtilsMessengerEXT", ext("VK_EXT_debug_utils"),
            PFN_vkCreateDebugUtilsMessengerEXT => create_debug_utils_messenger_ext;
        DestroyDebugUtilsMessengerEXT = "vkDestroyDebugUtilsMessengerEXT", ext("VK_EXT_debug_utils"),
            PFN_vkDestroyDebugUtilsMessengerEXT => destroy_debug_utils_messenger_ext;
        SubmitDebugUtilsMessageEXT = "vkSubmitDebugUtilsMessageEXT", ext("VK_EXT_debug_utils"),
            PFN_vkSubmitDebugUtilsMessageEXT => submit_debug_utils_message_ext;

        // ── Displays ──────────────────────────────────────────────
        GetPhysicalDeviceDisplayPropertiesKHR = "vkGetPhysicalDeviceDisplayPropertiesKHR", ext("VK_KHR_display"),
            PFN_vkGetPhysicalDeviceDisplayPropertiesKHR => get_physical_device_display_properties_khr;
        ReleaseDisplayEXT = "vkReleaseDisplayEXT", ext("VK_EXT_direct_mode_display"),
            PFN_vkReleaseDisplayEXT => release_display_ext;
    }
    aliases {
        [GetPhysicalDeviceFeatures2, GetPhysicalDeviceFeatures2KHR]
        [GetPhysicalDeviceProperties2, GetPhysicalDeviceProperties2KHR]
        [GetPhysicalDeviceFormatProperties2, GetPhysicalDeviceFormatProperties2KHR]
        [GetPhysicalDeviceQueueFamilyProperties2, GetPhysicalDeviceQueueFamilyProperties2KHR]
        [GetPhysicalDeviceMemoryProperties2, GetPhysicalDeviceMemoryProperties2KHR]
        [EnumeratePhysicalDeviceGroups, EnumeratePhysicalDeviceGroupsKHR]
        [GetPhysicalDeviceExternalBufferProperties, GetPhysicalDeviceExternalBufferPropertiesKHR]
        [GetPhysicalDeviceToolProperties, GetPhysicalDeviceToolPropertiesEXT]
    }
}

command_catalog! {
    /// Entry points resolved with `vkGetDeviceProcAddr(device, name)`.
    pub enum DeviceCommand: Device, DeviceDispatcher {
        // ── Core 1.0 ──────────────────────────────────────────────
        DestroyDevice = "vkDestroyDevice", V1_0, PFN_vkDestroyDevice => destroy_device;
        GetDeviceQueue = "vkGetDeviceQueue", V1_0, PFN_vkGetDeviceQueue => get_device_queue;
        QueueSubmit = "vkQueueSubmit", V1_0, PFN_vkQueueSubmit => queue_submit;
        QueueWaitIdle = "vkQueueWaitIdle", V1_0, PFN_vkQueueWaitIdle => queue_wait_idle;
        DeviceWaitIdle = "vkDeviceWaitIdle", V1_0, PFN_vkDeviceWaitIdle => device_wait_idle;
        AllocateMemory = "vkAllocateMemory", V1_0, PFN_vkAllocateMemory => allocate_memory;
        FreeMemory = "vkFreeMemory", V1_0, PFN_vkFreeMemory => free_memory;
        MapMemory = "vkMapMemory", V1_0, PFN_vkMapMemory => map_memory;
        UnmapMemory = "vkUnmapMemory", V1_0, PFN_vkUnmapMemory => unmap_memory;
        BindBufferMemory = "vkBindBufferMemory", V1_0, PFN_vkBindBufferMemory => bind_buffer_memory;
        BindImageMemory = "vkBindImageMemory", V1_0, PFN_vkBindImageMemory => bind_image_memory;
        GetBufferMemoryRequirements = "vkGetBufferMemoryRequirements", V1_0,
            PFN_vkGetBufferMemoryRequirements => get_buffer_memory_requirements;
        GetImageMemoryRequirements = "vkGetImageMemoryRequirements", V1_0,
            PFN_vkGetImageMemoryRequirements => get_image_memory_requirements;
        CreateFence = "vkCreateFence", V1_0, PFN_vkCreateFence => create_fence;
        DestroyFence = "vkDestroyFence", V1_0, PFN_vkDestroyFence => destroy_fence;
        ResetFences = "vkResetFences", V1_0, PFN_vkResetFences => reset_fences;
        GetFenceStatus = "vkGetFenceStatus", V1_0, PFN_vkGetFenceStatus => get_fence_status;
        WaitForFences = "vkWaitForFences", V1_0, PFN_vkWaitForFences => wait_for_fences;
        CreateSemaphore = "vkCreateSemaphore", V1_0, PFN_vkCreateSemaphore => create_semaphore;
        DestroySemaphore = "vkDestroySemaphore", V1_0, PFN_vkDestroySemaphore => destroy_semaphore;
        CreateEvent = "vkCreateEvent", V1_0, PFN_vkCreateEvent => create_event;
        DestroyEvent = "vkDestroyEvent", V1_0, PFN_vkDestroyEvent => destroy_event;
        CreateQueryPool = "vkCreateQueryPool", V1_0, PFN_vkCreateQueryPool => create_query_pool;
        DestroyQueryPool = "vkDestroyQueryPool", V1_0, PFN_vkDestroyQueryPool => destroy_query_pool;
        CreateBuffer = "vkCreateBuffer", V1_0, PFN_vkCreateBuffer => create_buffer;
        DestroyBuffer = "vkDestroyBuffer", V1_0, PFN_vkDestroyBuffer => destroy_buffer;
        CreateBufferView = "vkCreateBufferView", V1_0, PFN_vkCreateBufferView => create_buffer_view;
        DestroyBufferView = "vkDestroyBufferView", V1_0, PFN_vkDestroyBufferView => destroy_buffer_view;
        CreateImage = "vkCreateImage", V1_0, PFN_vkCreateImage => create_image;
        DestroyImage = "vkDestroyImage", V1_0, PFN_vkDestroyImage => destroy_image;
        CreateImageView = "vkCreateImageView", V1_0, PFN_vkCreateImageView => create_image_view;
        DestroyImageView = "vkDestroyImageView", V1_0, PFN_vkDestroyImageView => destroy_image_view;
        CreateShaderModule = "vkCreateShaderModule", V1_0, PFN_vkCreateShaderModule => create_shader_module;
        DestroyShaderModule = "vkDestroyShaderModule", V1_0, PFN_vkDestroyShaderModule => destroy_shader_module;
        CreatePipelineCache = "vkCreatePipelineCache", V1_0, PFN_vkCreatePipelineCache => create_pipeline_cache;
        DestroyPipelineCache = "vkDestroyPipelineCache", V1_0, PFN_vkDestroyPipelineCache => destroy_pipeline_cache;
        CreateGraphicsPipelines = "vkCreateGraphicsPipelines", V1_0,
            PFN_vkCreateGraphicsPipelines => create_graphics_pipelines;
        CreateComputePipelines = "vkCreateComputePipelines", V1_0,
            PFN_vkCreateComputePipelines => create_compute_pipelines;
        DestroyPipeline = "vkDestroyPipeline", V1_0, PFN_vkDestroyPipeline => destroy_pipeline;
        CreatePipelineLayout = "vkCreatePipelineLayout", V1_0, PFN_vkCreatePipelineLayout => create_pipeline_layout;
        DestroyPipelineLayout = "vkDestroyPipelineLayout", V1_0, PFN_vkDestroyPipelineLayout => destroy_pipeline_layout;
        CreateSampler = "vkCreateSampler", V1_0, PFN_vkCreateSampler => create_sampler;
        DestroySampler = "vkDestroySampler", V1_0, PFN_vkDestroySampler => destroy_sampler;
        CreateDescriptorSetLayout = "vkCreateDescriptorSetLayout", V1_0,
            PFN_vkCreateDescriptorSetLayout => create_descriptor_set_layout;
        DestroyDescriptorSetLayout = "vkDestroyDescriptorSetLayout", V1_0,
            PFN_vkDestroyDescriptorSetLayout => destroy_descriptor_set_layout;
        CreateDescriptorPool = "vkCreateDescriptorPool", V1_0, PFN_vkCreateDescriptorPool => create_descriptor_pool;
        DestroyDescriptorPool = "vkDestroyDescriptorPool", V1_0, PFN_vkDestroyDescriptorPool => destroy_descriptor_pool;
        AllocateDescriptorSets = "vkAllocateDescriptorSets", V1_0,
            PFN_vkAllocateDescriptorSets => allocate_descriptor_sets;
        FreeDescriptorSets = "vkFreeDescriptorSets", V1_0, PFN_vkFreeDescriptorSets => free_descriptor_sets;
        UpdateDescriptorSets = "vkUpdateDescriptorSets", V1_0, PFN_vkUpdateDescriptorSets => update_descriptor_sets;
        CreateFramebuffer = "vkCreateFramebuffer", V1_0, PFN_vkCreateFramebuffer => create_framebuffer;
        DestroyFramebuffer = "vkDestroyFramebuffer", V1_0, PFN_vkDestroyFramebuffer => destroy_framebuffer;
        CreateRenderPass = "vkCreateRenderPass", V1_0, PFN_vkCreateRenderPass => create_render_pass;
        DestroyRenderPass = "vkDestroyRenderPass", V1_0, PFN_vkDestroyRenderPass => destroy_render_pass;
        CreateCommandPool = "vkCreateCommandPool", V1_0, PFN_vkCreateCommandPool => create_command_pool;
        DestroyCommandPool = "vkDestroyCommandPool", V1_0, PFN_vkDestroyCommandPool => destroy_command_pool;
        ResetCommandPool = "vkResetCommandPool", V1_0, PFN_vkResetCommandPool => reset_command_pool;
        AllocateCommandBuffers = "vkAllocateCommandBuffers", V1_0,
            PFN_vkAllocateCommandBuffers => allocate_command_buffers;
        FreeCommandBuffers = "vkFreeCommandBuffers", V1_0, PFN_vkFreeCommandBuffers => free_command_buffers;
        BeginCommandBuffer = "vkBeginCommandBuffer", V1_0, PFN_vkBeginCommandBuffer => begin_command_buffer;
        EndCommandBuffer = "vkEndCommandBuffer", V1_0, PFN_vkEndCommandBuffer => end_command_buffer;
        CmdBindPipeline = "vkCmdBindPipeline", V1_0, PFN_vkCmdBindPipeline => cmd_bind_pipeline;
        CmdDispatch = "vkCmdDispatch", V1_0, PFN_vkCmdDispatch => cmd_dispatch;
        CmdDraw = "vkCmdDraw", V1_0, PFN_vkCmdDraw => cmd_draw;
        CmdCopyBuffer = "vkCmdCopyBuffer", V1_0, PFN_vkCmdCopyBuffer => cmd_copy_buffer;
        CmdPipelineBarrier = "vkCmdPipelineBarrier", V1_0, PFN_vkCmdPipelineBarrier => cmd_pipeline_barrier;

        // ── Core 1.1, promoted from KHR ───────────────────────────
        GetDeviceQueue2 = "vkGetDeviceQueue2", V1_1, PFN_vkGetDeviceQueue2 => get_device_queue2;
        TrimCommandPool = "vkTrimCommandPool", V1_1, PFN_vkTrimCommandPool => trim_command_pool;
        TrimCommandPoolKHR = "vkTrimCommandPoolKHR", ext("VK_KHR_maintenance1"),
            PFN_vkTrimCommandPool => trim_command_pool_khr;
        BindBufferMemory2 = "vkBindBufferMemory2", V1_1, PFN_vkBindBufferMemory2 => bind_buffer_memory2;
        BindBufferMemory2KHR = "vkBindBufferMemory2KHR", ext("VK_KHR_bind_memory2"),
            PFN_vkBindBufferMemory2 => bind_buffer_memory2_khr;
        BindImageMemory2 = "vkBindImageMemory2", V1_1, PFN_vkBindImageMemory2 => bind_image_memory2;
        BindImageMemory2KHR = "vkBindImageMemory2KHR", ext("VK_KHR_bind_memory2"),
            PFN_vkBindImageMemory2 => bind_image_memory2_khr;
        CreateSamplerYcbcrConversion = "vkCreateSamplerYcbcrConversion", V1_1,
            PFN_vkCreateSamplerYcbcrConversion => create_sampler_ycbcr_conversion;
        CreateSamplerYcbcrConversionKHR = "vkCreateSamplerYcbcrConversionKHR",
            ext("VK_KHR_sampler_ycbcr_conversion"),
            PFN_vkCreateSamplerYcbcrConversion => create_sampler_ycbcr_conversion_khr;
        DestroySamplerYcbcrConversion = "vkDestroySamplerYcbcrConversion", V1_1,
            PFN_vkDestroySamplerYcbcrConversion => destroy_sampler_ycbcr_conversion;
        DestroySamplerYcbcrConversionKHR = "vkDestroySamplerYcbcrConversionKHR",
            ext("VK_KHR_sampler_ycbcr_conversion"),
            PFN_vkDestroySamplerYcbcrConversion => destroy_sampler_ycbcr_conversion_khr;
        CreateDescriptorUpdateTemplate = "vkCreateDescriptorUpdateTemplate", V1_1,
            PFN_vkCreateDescriptorUpdateTemplate => create_descriptor_update_template;
        CreateDescriptorUpdateTemplateKHR = "vkCreateDescriptorUpdateTemplateKHR",
            ext("VK_KHR_descriptor_update_template"),
            PFN_vkCreateDescriptorUpdateTemplate => create_descriptor_update_template_khr;
        DestroyDescriptorUpdateTemplate = "vkDestroyDescriptorUpdateTemplate", V1_1,
            PFN_vkDestroyDescriptorUpdateTemplate => destroy_descriptor_update_template;
        DestroyDescriptorUpdateTemplateKHR = "vkDestroyDescriptorUpdateTemplateKHR",
            ext("VK_KHR_descriptor_update_template"),
            PFN_vkDestroyDescriptorUpdateTemplate => destroy_descriptor_update_template_khr;

        // ── Core 1.2 ──────────────────────────────────────────────
        CmdDrawIndirectCount = "vkCmdDrawIndirectCount", V1_2,
            PFN_vkCmdDrawIndirectCount => cmd_draw_indirect_count;
        CmdDrawIndirectCountKHR = "vkCmdDrawIndirectCountKHR", ext("VK_KHR_draw_indirect_count"),
            PFN_vkCmdDrawIndirectCount => cmd_draw_indirect_count_khr;
        CmdDrawIndirectCountAMD = "vkCmdDrawIndirectCountAMD", ext("VK_AMD_draw_indirect_count"),
            PFN_vkCmdDrawIndirectCount => cmd_draw_indirect_count_amd;
        CreateRenderPass2 = "vkCreateRenderPass2", V1_2, PFN_vkCreateRenderPass2 => create_render_pass2;
        CreateRenderPass2KHR = "vkCreateRenderPass2KHR", ext("VK_KHR_create_renderpass2"),
            PFN_vkCreateRenderPass2 => create_render_pass2_khr;
        GetBufferDeviceAddress = "vkGetBufferDeviceAddress", V1_2,
            PFN_vkGetBufferDeviceAddress => get_buffer_device_address;
        GetBufferDeviceAddressKHR = "vkGetBufferDeviceAddressKHR", ext("VK_KHR_buffer_device_address"),
            PFN_vkGetBufferDeviceAddress => get_buffer_device_address_khr;
        GetBufferDeviceAddressEXT = "vkGetBufferDeviceAddressEXT", ext("VK_EXT_buffer_device_address"),
            PFN_vkGetBufferDeviceAddress => get_buffer_device_address_ext;
        WaitSemaphores = "vkWaitSemaphores", V1_2, PFN_vkWaitSemaphores => wait_semaphores;
        WaitSemaphoresKHR = "vkWaitSemaphoresKHR", ext("VK_KHR_timeline_semaphore"),
            PFN_vkWaitSemaphores => wait_semaphores_khr;
        GetSemaphoreCounterValue = "vkGetSemaphoreCounterValue", V1_2,
            PFN_vkGetSemaphoreCounterValue => get_semaphore_counter_value;
        GetSemaphoreCounterValueKHR = "vkGetSemaphoreCounterValueKHR", ext("VK_KHR_timeline_semaphore"),
            PFN_vkGetSemaphoreCounterValue => get_semaphore_counter_value_khr;

        // ── Core 1.3 ──────────────────────────────────────────────
        CmdBeginRendering = "vkCmdBeginRendering", V1_3, PFN_vkCmdBeginRendering => cmd_begin_rendering;
        CmdBeginRenderingKHR = "vkCmdBeginRenderingKHR", ext("VK_KHR_dynamic_rendering"),
            PFN_vkCmdBeginRendering => cmd_begin_rendering_khr;
        CmdEndRendering = "vkCmdEndRendering", V1_3, PFN_vkCmdEndRendering => cmd_end_rendering;
        CmdEndRenderingKHR = "vkCmdEndRenderingKHR", ext("VK_KHR_dynamic_rendering"),
            PFN_vkCmdEndRendering => cmd_end_rendering_khr;
        QueueSubmit2 = "vkQueueSubmit2", V1_3, PFN_vkQueueSubmit2 => queue_submit2;
        QueueSubmit2KHR = "vkQueueSubmit2KHR", ext("VK_KHR_synchronization2"),
            PFN_vkQueueSubmit2 => queue_submit2_khr;
        CreatePrivateDataSlot = "vkCreatePrivateDataSlot", V1_3,
            PFN_vkCreatePrivateDataSlot => create_private_data_slot;
        CreatePrivateDataSlotEXT = "vkCreatePrivateDataSlotEXT", ext("VK_EXT_private_data"),
            PFN_vkCreatePrivateDataSlot => create_private_data_slot_ext;
        DestroyPrivateDataSlot = "vkDestroyPrivateDataSlot", V1_3,
            PFN_vkDestroyPrivateDataSlot => destroy_private_data_slot;
        DestroyPrivateDataSlotEXT = "vkDestroyPrivateDataSlotEXT", ext("VK_EXT_private_data"),
            PFN_vkDestroyPrivateDataSlot => destroy_private_data_slot_ext;

        // ── Extensions ────────────────────────────────────────────
        CreateSwapchainKHR = "vkCreateSwapchainKHR", ext("VK_KHR_swapchain"),
            PFN_vkCreateSwapchainKHR => create_swapchain_khr;
        DestroySwapchainKHR = "vkDestroySwapchainKHR", ext("VK_KHR_swapchain"),
            PFN_vkDestroySwapchainKHR => destroy_swapchain_khr;
        GetSwapchainImagesKHR = "vkGetSwapchainImagesKHR", ext("VK_KHR_swapchain"),
            PFN_vkGetSwapchainImagesKHR => get_swapchain_images_khr;
        AcquireNextImageKHR = "vkAcquireNextImageKHR", ext("VK_KHR_swapchain"),
            PFN_vkAcquireNextImageKHR => acquire_next_image_khr;
        QueuePresentKHR = "vkQueuePresentKHR", ext("VK_KHR_swapchain"),
            PFN_vkQueuePresentKHR => queue_present_khr;
        SetDebugUtilsObjectNameEXT = "vkSetDebugUtilsObjectNameEXT", ext("VK_EXT_debug_utils"),
            PFN_vkSetDebugUtilsObjectNameEXT => set_debug_utils_object_name_ext;
        CreateAccelerationStructureKHR = "vkCreateAccelerationStructureKHR",
            ext("VK_KHR_acceleration_structure"),
            PFN_vkCreateAccelerationStructureKHR => create_acceleration_structure_khr;
        DestroyAccelerationStructureKHR = "vkDestroyAccelerationStructureKHR",
            ext("VK_KHR_acceleration_structure"),
            PFN_vkDestroyAccelerationStructureKHR => destroy_acceleration_structure_khr;
    }
    aliases {
        [TrimCommandPool, TrimCommandPoolKHR]
        [BindBufferMemory2, BindBufferMemory2KHR]
        [BindImageMemory2, BindImageMemory2KHR]
        [CreateSamplerYcbcrConversion, CreateSamplerYcbcrConversionKHR]
        [DestroySamplerYcbcrConversion, DestroySamplerYcbcrConversionKHR]
        [CreateDescriptorUpdateTemplate, CreateDescriptorUpdateTemplateKHR]
        [DestroyDescriptorUpdateTemplate, DestroyDescriptorUpdateTemplateKHR]
        [CmdDrawIndirectCount, CmdDrawIndirectCountKHR, CmdDrawIndirectCountAMD]
        [CreateRenderPass2, CreateRenderPass2KHR]
        [GetBufferDeviceAddress, GetBufferDeviceAddressKHR, GetBufferDeviceAddressEXT]
        [WaitSemaphores, WaitSemaphoresKHR]
        [GetSemaphoreCounterValue, GetSemaphoreCounterValueKHR]
        [CmdBeginRendering, CmdBeginRenderingKHR]
        [CmdEndRendering, CmdEndRenderingKHR]
        [QueueSubmit2, QueueSubmit2KHR]
        [CreatePrivateDataSlot, CreatePrivateDataSlotEXT]
        [DestroyPrivateDataSlot, DestroyPrivateDataSlotEXT]
    }
}
