/// Vulkan debug messenger callback for the validation layers
///
/// Compiled in only with the `vulkan-validation` feature. Validation messages
/// are routed through the engine logging sink with a severity matching the
/// Vulkan one.

use ash::vk;
use nebula_3d_engine::{engine_error, engine_info, engine_trace, engine_warn};
use std::ffi::CStr;

/// Label for a validation message type
fn message_type_label(message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    match message_type {
        vk::DebugUtilsMessageTypeFlagsEXT::GENERAL => "general",
        vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION => "validation",
        vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE => "performance",
        _ => "unknown",
    }
}

/// Debug callback registered with the Vulkan debug utils messenger
///
/// # Safety
///
/// Called by the Vulkan loader; `p_callback_data` is valid for the duration
/// of the call.
pub unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _p_user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() {
        return vk::FALSE;
    }

    let callback_data = *p_callback_data;
    let message = if callback_data.p_message.is_null() {
        String::from("(no message)")
    } else {
        CStr::from_ptr(callback_data.p_message)
            .to_string_lossy()
            .into_owned()
    };

    let label = message_type_label(message_type);

    match message_severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => {
            engine_error!("nebula3d::vulkan", "[{}] {}", label, message);
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => {
            engine_warn!("nebula3d::vulkan", "[{}] {}", label, message);
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::INFO => {
            engine_info!("nebula3d::vulkan", "[{}] {}", label, message);
        }
        _ => {
            engine_trace!("nebula3d::vulkan", "[{}] {}", label, message);
        }
    }

    // Never abort the Vulkan call that triggered the message
    vk::FALSE
}
