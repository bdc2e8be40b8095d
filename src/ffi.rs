//! FFI bindings for Synheart ROI
//!
//! This module provides C-compatible functions for driving the dashboard from
//! other languages. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `roi_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::DashboardConfig;
use crate::dashboard::{Action, DashboardState};
use crate::encoder::DashboardEncoder;
use crate::source::{generate, SyntheticSource};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Generate `days` synthetic samples for `seed` as a JSON array.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `roi_free_string`.
/// - Returns NULL on error; call `roi_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn roi_generate_samples(seed: u64, days: u32) -> *mut c_char {
    clear_last_error();

    match serde_json::to_string(&generate(seed, days as usize)) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Dashboard API
// ============================================================================

/// Opaque handle to a dashboard session
pub struct RoiDashboardHandle {
    state: DashboardState,
    encoder: DashboardEncoder,
}

/// Create a dashboard backed by the synthetic source seeded with `seed`.
///
/// # Safety
/// - `config_json` may be NULL for default configuration, otherwise it must be
///   a valid null-terminated C string.
/// - Returns a pointer that must be freed with `roi_dashboard_free`.
/// - Returns NULL on error; call `roi_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn roi_dashboard_new(
    seed: u64,
    config_json: *const c_char,
) -> *mut RoiDashboardHandle {
    clear_last_error();

    let config = if config_json.is_null() {
        DashboardConfig::default()
    } else {
        let json = match cstr_to_string(config_json) {
            Some(s) => s,
            None => {
                set_last_error("Invalid config string pointer");
                return ptr::null_mut();
            }
        };
        match DashboardConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    };

    let source = SyntheticSource::new(seed);
    match DashboardState::new(&source, config) {
        Ok(state) => Box::into_raw(Box::new(RoiDashboardHandle {
            state,
            encoder: DashboardEncoder::new(),
        })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a dashboard.
///
/// # Safety
/// - `dashboard` must be a valid pointer returned by `roi_dashboard_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn roi_dashboard_free(dashboard: *mut RoiDashboardHandle) {
    if !dashboard.is_null() {
        drop(Box::from_raw(dashboard));
    }
}

/// Apply a JSON-encoded action, e.g. `{"type":"select_view","payload":"trends"}`.
///
/// # Safety
/// - `dashboard` must be a valid pointer returned by `roi_dashboard_new`.
/// - `action_json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `roi_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn roi_dashboard_dispatch(
    dashboard: *mut RoiDashboardHandle,
    action_json: *const c_char,
) -> i32 {
    clear_last_error();

    if dashboard.is_null() {
        set_last_error("Null dashboard pointer");
        return -1;
    }

    let handle = &mut *dashboard;

    let json_str = match cstr_to_string(action_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid action string pointer");
            return -1;
        }
    };

    let action: Action = match serde_json::from_str(&json_str) {
        Ok(action) => action,
        Err(e) => {
            set_last_error(&format!("Invalid action: {e}"));
            return -1;
        }
    };

    match handle.state.dispatch(action) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Project the selected view as a JSON payload.
///
/// # Safety
/// - `dashboard` must be a valid pointer returned by `roi_dashboard_new`.
/// - Returns a newly allocated string that must be freed with `roi_free_string`.
/// - Returns NULL on error; call `roi_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn roi_dashboard_project(
    dashboard: *const RoiDashboardHandle,
) -> *mut c_char {
    clear_last_error();

    if dashboard.is_null() {
        set_last_error("Null dashboard pointer");
        return ptr::null_mut();
    }

    let handle = &*dashboard;

    match handle.encoder.encode_to_json(&handle.state) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by ROI functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by an ROI function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn roi_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next ROI function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn roi_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the ROI library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn roi_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
