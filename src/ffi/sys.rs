//! Hand-maintained bindings for the extplug API of `<alsa/pcm_external.h>`.
//!
//! `alsa-sys` binds `asoundlib.h` only; the external-plugin protocol lives in
//! a separate header. The declarations here mirror extplug protocol version
//! 1.0.2 and must stay layout-compatible with it.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int, c_uint, c_void};

use alsa_sys::{
    snd_config_t, snd_output_t, snd_pcm_channel_area_t, snd_pcm_chmap_query_t, snd_pcm_chmap_t,
    snd_pcm_format_t, snd_pcm_hw_params_t, snd_pcm_sframes_t, snd_pcm_stream_t,
    snd_pcm_subformat_t, snd_pcm_t, snd_pcm_uframes_t,
};

/// Extplug protocol version this crate is written against (1.0.2).
pub const SND_PCM_EXTPLUG_VERSION: c_uint = (1 << 16) | 2;

/// Index of the format entry in the extplug hw constraint lists.
pub const SND_PCM_EXTPLUG_HW_FORMAT: c_int = 0;

/// The extplug handle embedded at the head of a plugin instance. The host
/// reads and writes these fields across the instance lifetime; the layout
/// must match `struct snd_pcm_extplug` exactly.
#[repr(C)]
pub struct snd_pcm_extplug_t {
    /// Protocol version the plugin was built against.
    pub version: c_uint,
    /// Display name of the plugin.
    pub name: *const c_char,
    /// Callback table; `transfer` is the only required entry.
    pub callback: *const snd_pcm_extplug_callback_t,
    /// Plugin-private pointer, unused by the host.
    pub private_data: *mut c_void,
    /// Filled by the host on `snd_pcm_extplug_create`.
    pub pcm: *mut snd_pcm_t,
    /// Stream direction, filled by the host.
    pub stream: snd_pcm_stream_t,
    /// Negotiated client-side format, valid from `hw_params` onwards.
    pub format: snd_pcm_format_t,
    /// Negotiated client-side subformat.
    pub subformat: snd_pcm_subformat_t,
    /// Negotiated client-side channel count.
    pub channels: c_uint,
    /// Negotiated sample rate.
    pub rate: c_uint,
    /// Negotiated slave-side format.
    pub slave_format: snd_pcm_format_t,
    /// Negotiated slave-side subformat.
    pub slave_subformat: snd_pcm_subformat_t,
    /// Negotiated slave-side channel count.
    pub slave_channels: c_uint,
}

/// Callback table handed to the host, mirroring
/// `struct snd_pcm_extplug_callback`.
#[repr(C)]
pub struct snd_pcm_extplug_callback_t {
    /// Per-block processing callback (required).
    pub transfer: Option<
        unsafe extern "C" fn(
            ext: *mut snd_pcm_extplug_t,
            dst_areas: *const snd_pcm_channel_area_t,
            dst_offset: snd_pcm_uframes_t,
            src_areas: *const snd_pcm_channel_area_t,
            src_offset: snd_pcm_uframes_t,
            size: snd_pcm_uframes_t,
        ) -> snd_pcm_sframes_t,
    >,
    /// Teardown callback.
    pub close: Option<unsafe extern "C" fn(ext: *mut snd_pcm_extplug_t) -> c_int>,
    /// Hardware parameter negotiation hook.
    pub hw_params: Option<
        unsafe extern "C" fn(ext: *mut snd_pcm_extplug_t, params: *mut snd_pcm_hw_params_t) -> c_int,
    >,
    /// Hardware parameter release hook.
    pub hw_free: Option<unsafe extern "C" fn(ext: *mut snd_pcm_extplug_t) -> c_int>,
    /// Debug dump hook.
    pub dump: Option<unsafe extern "C" fn(ext: *mut snd_pcm_extplug_t, out: *mut snd_output_t)>,
    /// Pre-streaming initialization callback.
    pub init: Option<unsafe extern "C" fn(ext: *mut snd_pcm_extplug_t) -> c_int>,
    /// Channel map enumeration hook.
    pub query_chmaps:
        Option<unsafe extern "C" fn(ext: *mut snd_pcm_extplug_t) -> *mut *mut snd_pcm_chmap_query_t>,
    /// Channel map query hook.
    pub get_chmap:
        Option<unsafe extern "C" fn(ext: *mut snd_pcm_extplug_t) -> *mut snd_pcm_chmap_t>,
    /// Channel map assignment hook.
    pub set_chmap: Option<
        unsafe extern "C" fn(ext: *mut snd_pcm_extplug_t, map: *const snd_pcm_chmap_t) -> c_int,
    >,
}

extern "C" {
    /// Create the extplug instance on top of the slave configuration.
    pub fn snd_pcm_extplug_create(
        extplug: *mut snd_pcm_extplug_t,
        name: *const c_char,
        root: *mut snd_config_t,
        slave_conf: *mut snd_config_t,
        stream: snd_pcm_stream_t,
        mode: c_int,
    ) -> c_int;

    /// Delete the extplug instance.
    pub fn snd_pcm_extplug_delete(extplug: *mut snd_pcm_extplug_t) -> c_int;

    /// Constrain a client-side hw parameter to a list of values.
    pub fn snd_pcm_extplug_set_param_list(
        extplug: *mut snd_pcm_extplug_t,
        type_: c_int,
        num_list: c_uint,
        list: *const c_uint,
    ) -> c_int;

    /// Constrain a slave-side hw parameter to a list of values.
    pub fn snd_pcm_extplug_set_slave_param_list(
        extplug: *mut snd_pcm_extplug_t,
        type_: c_int,
        num_list: c_uint,
        list: *const c_uint,
    ) -> c_int;
}
