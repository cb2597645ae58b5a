//! FFI bindings for Stress Lens
//!
//! This module provides C-compatible functions for calling Stress Lens from a
//! host UI. All functions use C strings (null-terminated) carrying JSON and
//! return allocated memory that must be freed by the caller using
//! `stress_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::Utc;

use crate::chart::{render_history, ChartLayout, DisplayList, SvgSurface};
use crate::error::ComputeError;
use crate::recommendations::recommendations_for;
use crate::session::{assess, AssessmentSession};
use crate::trend::analyze_trend;
use crate::types::{QuestionnaireResponse, StressLevel, StressSample};

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

/// Hand a result to C: the string on success, NULL plus last error on failure
fn into_cstr(result: Result<String, ComputeError>) -> *mut c_char {
    match result {
        Ok(s) => string_to_cstr(&s),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

fn parse_history(json: &str) -> Result<Vec<StressSample>, ComputeError> {
    Ok(serde_json::from_str(json)?)
}

fn parse_responses(json: &str) -> Result<Vec<QuestionnaireResponse>, ComputeError> {
    Ok(serde_json::from_str(json)?)
}

fn surface_size(width: u32, height: u32) -> (u32, u32) {
    (
        if width == 0 { crate::chart::DEFAULT_WIDTH } else { width },
        if height == 0 { crate::chart::DEFAULT_HEIGHT } else { height },
    )
}

// ============================================================================
// Stateless API
// ============================================================================

/// Classify a JSON array of questionnaire responses.
///
/// Returns the assessment outcome as JSON: id, score/level and recommendations.
///
/// # Safety
/// - `responses_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_classify(responses_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(responses_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid responses string pointer");
            return ptr::null_mut();
        }
    };

    into_cstr(
        parse_responses(&json_str)
            .and_then(|responses| assess(&responses, Utc::now()))
            .and_then(|outcome| Ok(serde_json::to_string(&outcome)?)),
    )
}

/// Recommendations for a level name ("low", "moderate", "high", "severe") as a JSON array.
///
/// # Safety
/// - `level` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_recommendations(level: *const c_char) -> *mut c_char {
    clear_last_error();

    let level_str = match cstr_to_string(level) {
        Some(s) => s,
        None => {
            set_last_error("Invalid level string pointer");
            return ptr::null_mut();
        }
    };

    into_cstr(
        level_str
            .parse::<StressLevel>()
            .and_then(|level| Ok(serde_json::to_string(recommendations_for(level))?)),
    )
}

/// Analyze the trend of a JSON stress history.
///
/// # Safety
/// - `history_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_trend(history_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(history_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid history string pointer");
            return ptr::null_mut();
        }
    };

    into_cstr(
        parse_history(&json_str)
            .and_then(|history| analyze_trend(&history))
            .and_then(|trend| Ok(serde_json::to_string(&trend)?)),
    )
}

/// Render a JSON stress history as an SVG document.
///
/// A zero `width` or `height` selects the default chart size.
///
/// # Safety
/// - `history_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_render_svg(
    history_json: *const c_char,
    width: u32,
    height: u32,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(history_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid history string pointer");
            return ptr::null_mut();
        }
    };

    let (width, height) = surface_size(width, height);
    into_cstr(parse_history(&json_str).and_then(|history| {
        let mut surface = SvgSurface::new(width, height);
        render_history(&mut surface, &history, &ChartLayout::default())?;
        Ok(surface.to_svg())
    }))
}

/// Render a JSON stress history as a JSON list of draw operations for a host canvas.
///
/// # Safety
/// - `history_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_render_ops(
    history_json: *const c_char,
    width: u32,
    height: u32,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(history_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid history string pointer");
            return ptr::null_mut();
        }
    };

    let (width, height) = surface_size(width, height);
    into_cstr(parse_history(&json_str).and_then(|history| {
        let mut surface = DisplayList::new(width, height);
        render_history(&mut surface, &history, &ChartLayout::default())?;
        Ok(serde_json::to_string(&surface)?)
    }))
}

// ============================================================================
// Stateful Session API
// ============================================================================

/// Opaque handle to an AssessmentSession
pub struct StressSessionHandle {
    session: AssessmentSession,
}

/// Create a new session with an empty history.
///
/// # Safety
/// - Returns a pointer to a newly allocated session.
/// - Must be freed with `stress_session_free`.
#[no_mangle]
pub unsafe extern "C" fn stress_session_new() -> *mut StressSessionHandle {
    clear_last_error();
    Box::into_raw(Box::new(StressSessionHandle {
        session: AssessmentSession::new(),
    }))
}

/// Free a session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `stress_session_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn stress_session_free(session: *mut StressSessionHandle) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Submit questionnaire responses to a session, timestamped now.
///
/// # Safety
/// - `session` must be a valid pointer returned by `stress_session_new`.
/// - `responses_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_session_submit(
    session: *mut StressSessionHandle,
    responses_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }
    let handle = &mut *session;

    let json_str = match cstr_to_string(responses_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid responses string pointer");
            return ptr::null_mut();
        }
    };

    into_cstr(
        parse_responses(&json_str)
            .and_then(|responses| handle.session.submit(&responses, Utc::now()))
            .and_then(|outcome| Ok(serde_json::to_string(&outcome)?)),
    )
}

/// Save the session history to JSON.
///
/// # Safety
/// - `session` must be a valid pointer returned by `stress_session_new`.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_session_save_history(
    session: *mut StressSessionHandle,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }
    let handle = &*session;

    into_cstr(handle.session.save_history())
}

/// Load a session history from JSON, replacing the current one.
///
/// # Safety
/// - `session` must be a valid pointer returned by `stress_session_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
#[no_mangle]
pub unsafe extern "C" fn stress_session_load_history(
    session: *mut StressSessionHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return -1;
    }
    let handle = &mut *session;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.session.load_history(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Stress Lens functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Stress Lens function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn stress_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next Stress Lens call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn stress_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn stress_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
