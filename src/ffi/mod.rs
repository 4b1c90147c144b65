//! ALSA extplug entry point and callback glue.
//!
//! This module is the only part of the crate that talks to libasound. The
//! host resolves [`_snd_pcm_procplug_open`] when `type procplug` appears in
//! the user's configuration, then drives the callbacks from its own I/O
//! thread, strictly serialized per instance. All real work happens in the
//! platform-independent modules; this layer converts configuration nodes,
//! buffers and error values at the boundary.

use std::ffi::{c_char, c_int, c_uint, c_void, CStr};
use std::ptr;
use std::slice;

use alsa_sys::{
    snd_config_get_id, snd_config_get_integer, snd_config_get_integer64, snd_config_get_real,
    snd_config_get_string, snd_config_get_type, snd_config_iterator_end,
    snd_config_iterator_entry, snd_config_iterator_first, snd_config_iterator_next, snd_config_t,
    snd_pcm_channel_area_t, snd_pcm_frames_to_bytes, snd_pcm_sframes_t, snd_pcm_stream_t,
    snd_pcm_t, snd_pcm_uframes_t, SND_CONFIG_TYPE_INTEGER, SND_CONFIG_TYPE_INTEGER64,
    SND_CONFIG_TYPE_REAL, SND_CONFIG_TYPE_STRING,
};

use crate::algo::AlgorithmRegistry;
use crate::config::{ConfigValue, PluginConfig};
use crate::help;
use crate::plugin::{PlugError, ProcPlug};

pub mod sys;

/// Formats advertised to the host and the slave: signed 32- and 16-bit PCM,
/// native endian.
#[cfg(target_endian = "little")]
const FORMATS: [c_uint; 2] = [
    alsa_sys::SND_PCM_FORMAT_S32_LE as c_uint,
    alsa_sys::SND_PCM_FORMAT_S16_LE as c_uint,
];
#[cfg(target_endian = "big")]
const FORMATS: [c_uint; 2] = [
    alsa_sys::SND_PCM_FORMAT_S32_BE as c_uint,
    alsa_sys::SND_PCM_FORMAT_S16_BE as c_uint,
];

const PLUGIN_NAME: &CStr = c"ALSA procplug plugin";

/// A plugin instance as seen by the host. The extplug header must stay the
/// first field so callback pointers can be cast back to the full instance.
#[repr(C)]
struct Extplug {
    ext: sys::snd_pcm_extplug_t,
    shim: ProcPlug,
}

static CALLBACK: sys::snd_pcm_extplug_callback_t = sys::snd_pcm_extplug_callback_t {
    transfer: Some(plug_transfer),
    close: Some(plug_close),
    hw_params: None,
    hw_free: None,
    dump: None,
    init: Some(plug_init),
    query_chmaps: None,
    get_chmap: None,
    set_chmap: None,
};

fn errno_of(err: &PlugError) -> c_int {
    match err {
        PlugError::Config(_) | PlugError::UnknownAlgorithm(_) => -libc::EINVAL,
        PlugError::Dump(_) => -libc::ENOENT,
        PlugError::Io(_) => -libc::EIO,
        PlugError::HelpRequested => -libc::EAGAIN,
        PlugError::OutOfOrder(_) => -libc::EBADF,
    }
}

unsafe fn instance<'a>(ext: *mut sys::snd_pcm_extplug_t) -> &'a mut Extplug {
    &mut *(ext as *mut Extplug)
}

/// Byte address of `offset` frames into an interleaved channel area.
unsafe fn area_addr(area: *const snd_pcm_channel_area_t, offset: snd_pcm_uframes_t) -> *mut u8 {
    let area = &*area;
    let bitofs = area.first as u64 + area.step as u64 * offset as u64;
    (area.addr as *mut u8).add((bitofs / 8) as usize)
}

/// Read one configuration node into the value model of the parser. Compound
/// nodes (the slave definition) carry no scalar payload.
unsafe fn node_value(node: *mut snd_config_t) -> ConfigValue {
    match snd_config_get_type(node) {
        SND_CONFIG_TYPE_STRING => {
            let mut value: *const c_char = ptr::null();
            if snd_config_get_string(node, &mut value) >= 0 && !value.is_null() {
                ConfigValue::Str(CStr::from_ptr(value).to_string_lossy().into_owned())
            } else {
                ConfigValue::Compound
            }
        }
        SND_CONFIG_TYPE_INTEGER => {
            let mut value = 0;
            let _ = snd_config_get_integer(node, &mut value);
            ConfigValue::Int(value as i64)
        }
        SND_CONFIG_TYPE_INTEGER64 => {
            let mut value = 0;
            let _ = snd_config_get_integer64(node, &mut value);
            ConfigValue::Int(value)
        }
        SND_CONFIG_TYPE_REAL => {
            let mut value = 0.0;
            let _ = snd_config_get_real(node, &mut value);
            ConfigValue::Real(value)
        }
        _ => ConfigValue::Compound,
    }
}

unsafe extern "C" fn plug_init(ext: *mut sys::snd_pcm_extplug_t) -> c_int {
    let plug = instance(ext);
    match plug.shim.init() {
        Ok(()) => 0,
        Err(err) => {
            log::error!("procplug: init failed: {err}");
            errno_of(&err)
        }
    }
}

unsafe extern "C" fn plug_close(ext: *mut sys::snd_pcm_extplug_t) -> c_int {
    // The instance memory itself is host-owned past this point; only the
    // resources held by the shim are released here.
    instance(ext).shim.close();
    0
}

unsafe extern "C" fn plug_transfer(
    ext: *mut sys::snd_pcm_extplug_t,
    dst_areas: *const snd_pcm_channel_area_t,
    dst_offset: snd_pcm_uframes_t,
    src_areas: *const snd_pcm_channel_area_t,
    src_offset: snd_pcm_uframes_t,
    size: snd_pcm_uframes_t,
) -> snd_pcm_sframes_t {
    let plug = instance(ext);
    let bytes = snd_pcm_frames_to_bytes(plug.ext.pcm, size as snd_pcm_sframes_t);
    if bytes < 0 {
        return bytes as snd_pcm_sframes_t;
    }
    let src = slice::from_raw_parts(area_addr(src_areas, src_offset), bytes as usize);
    let dst = slice::from_raw_parts_mut(area_addr(dst_areas, dst_offset), bytes as usize);
    match plug.shim.transfer(dst, src) {
        Ok(_) => size as snd_pcm_sframes_t,
        Err(err) => {
            log::error!("procplug: transfer failed: {err}");
            errno_of(&err) as snd_pcm_sframes_t
        }
    }
}

/// Plugin entry point, the expansion of `SND_PCM_PLUGIN_DEFINE_FUNC`.
///
/// Walks the plugin's configuration subtree, parses and validates it, prints
/// usage and returns `-EAGAIN` when `help=1` is set, and otherwise creates
/// the extplug instance on top of the configured slave.
///
/// # Safety
///
/// Called by libasound with valid configuration trees and an out-pointer for
/// the resulting PCM handle.
#[no_mangle]
pub unsafe extern "C" fn _snd_pcm_procplug_open(
    pcmp: *mut *mut snd_pcm_t,
    name: *const c_char,
    root: *mut snd_config_t,
    conf: *mut snd_config_t,
    stream: snd_pcm_stream_t,
    mode: c_int,
) -> c_int {
    let registry = AlgorithmRegistry::with_builtins();

    let mut slave: *mut snd_config_t = ptr::null_mut();
    let mut items = Vec::new();
    let mut iter = snd_config_iterator_first(conf);
    let end = snd_config_iterator_end(conf);
    while iter != end {
        let node = snd_config_iterator_entry(iter);
        iter = snd_config_iterator_next(iter);
        let mut id: *const c_char = ptr::null();
        if snd_config_get_id(node, &mut id) < 0 {
            continue;
        }
        let key = CStr::from_ptr(id).to_string_lossy().into_owned();
        if key == "slave" {
            slave = node;
        }
        items.push((key, node_value(node)));
    }

    let config = match PluginConfig::parse(items) {
        Ok(config) => config,
        Err(err) => {
            log::error!("procplug: {err}");
            return -libc::EINVAL;
        }
    };
    let shim = match ProcPlug::from_config(config, &registry) {
        Ok(shim) => shim,
        Err(PlugError::HelpRequested) => {
            help::print(&registry);
            return -libc::EAGAIN;
        }
        Err(err) => {
            log::error!("procplug: {err}");
            return errno_of(&err);
        }
    };

    let mut plug = Box::new(Extplug {
        ext: std::mem::zeroed(),
        shim,
    });
    plug.ext.version = sys::SND_PCM_EXTPLUG_VERSION;
    plug.ext.name = PLUGIN_NAME.as_ptr();
    plug.ext.callback = &CALLBACK;
    plug.ext.private_data = &mut *plug as *mut Extplug as *mut c_void;

    let err = sys::snd_pcm_extplug_create(&mut plug.ext, name, root, slave, stream, mode);
    if err < 0 {
        // Dropping the box here is the error-path cleanup; on success the
        // instance lives until host teardown.
        return err;
    }
    sys::snd_pcm_extplug_set_param_list(
        &mut plug.ext,
        sys::SND_PCM_EXTPLUG_HW_FORMAT,
        FORMATS.len() as c_uint,
        FORMATS.as_ptr(),
    );
    sys::snd_pcm_extplug_set_slave_param_list(
        &mut plug.ext,
        sys::SND_PCM_EXTPLUG_HW_FORMAT,
        FORMATS.len() as c_uint,
        FORMATS.as_ptr(),
    );

    *pcmp = plug.ext.pcm;
    let _ = Box::into_raw(plug);
    0
}

/// Versioned dlsym marker, the expansion of `SND_PCM_PLUGIN_SYMBOL`. The
/// host refuses to load plugins missing this symbol.
#[no_mangle]
#[allow(non_upper_case_globals)]
pub static __snd_pcm_procplug_open_dlsym_pcm_001: c_char = 0;
