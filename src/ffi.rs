//! FFI bindings for Rapport
//!
//! C-compatible functions for calling Rapport from other languages. All
//! functions take null-terminated C strings and return allocated memory that
//! must be freed by the caller using `rapport_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::AnalyzerConfig;
use crate::pipeline::{analyze_json, InterestAnalyzer};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

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

/// Read the three string arguments shared by the analyze entry points
unsafe fn read_arguments(
    json: *const c_char,
    me: *const c_char,
    them: *const c_char,
) -> Option<(String, String, String)> {
    let Some(json) = cstr_to_string(json) else {
        set_last_error("Invalid JSON string pointer");
        return None;
    };
    let Some(me) = cstr_to_string(me) else {
        set_last_error("Invalid me string pointer");
        return None;
    };
    let Some(them) = cstr_to_string(them) else {
        set_last_error("Invalid them string pointer");
        return None;
    };
    Some((json, me, them))
}

// ============================================================================
// Stateless API
// ============================================================================

/// Score a JSON array of chat records and return the report payload JSON.
///
/// # Safety
/// - `json`, `me`, and `them` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `rapport_free_string`.
/// - Returns NULL on error; call `rapport_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn rapport_analyze_json(
    json: *const c_char,
    me: *const c_char,
    them: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some((json, me, them)) = read_arguments(json, me, them) else {
        return ptr::null_mut();
    };

    match analyze_json(&json, &me, &them) {
        Ok(payload) => string_to_cstr(&payload),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Configured Analyzer API
// ============================================================================

/// Opaque handle to an InterestAnalyzer
pub struct RapportAnalyzerHandle {
    analyzer: InterestAnalyzer,
}

/// Create an analyzer from a TOML configuration, or the defaults when `config_toml` is NULL.
///
/// # Safety
/// - `config_toml` must be NULL or a valid null-terminated C string.
/// - Returns a pointer that must be freed with `rapport_analyzer_free`.
/// - Returns NULL on error; call `rapport_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn rapport_analyzer_new(
    config_toml: *const c_char,
) -> *mut RapportAnalyzerHandle {
    clear_last_error();

    let config = if config_toml.is_null() {
        Ok(AnalyzerConfig::default())
    } else {
        match cstr_to_string(config_toml) {
            Some(s) => AnalyzerConfig::from_toml_str(&s),
            None => {
                set_last_error("Invalid config string pointer");
                return ptr::null_mut();
            }
        }
    };

    match config.and_then(InterestAnalyzer::new) {
        Ok(analyzer) => Box::into_raw(Box::new(RapportAnalyzerHandle { analyzer })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free an analyzer.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `rapport_analyzer_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn rapport_analyzer_free(analyzer: *mut RapportAnalyzerHandle) {
    if !analyzer.is_null() {
        drop(Box::from_raw(analyzer));
    }
}

/// Score a JSON array of chat records with a configured analyzer.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `rapport_analyzer_new`.
/// - `json`, `me`, and `them` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `rapport_free_string`.
/// - Returns NULL on error; call `rapport_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn rapport_analyzer_analyze_json(
    analyzer: *const RapportAnalyzerHandle,
    json: *const c_char,
    me: *const c_char,
    them: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if analyzer.is_null() {
        set_last_error("Null analyzer pointer");
        return ptr::null_mut();
    }
    let Some((json, me, them)) = read_arguments(json, me, them) else {
        return ptr::null_mut();
    };

    let handle = &*analyzer;
    match handle.analyzer.analyze_json(&json, &me, &them) {
        Ok(payload) => string_to_cstr(&payload),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Rapport.
///
/// # Safety
/// - `ptr` must be a pointer returned by a Rapport function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn rapport_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the last error message on this thread.
///
/// # Safety
/// - Returns a pointer to a thread-local string, valid until the next Rapport call
///   on the same thread. Do not free it.
/// - Returns NULL if there was no error.
#[no_mangle]
pub unsafe extern "C" fn rapport_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the Rapport library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do not free it.
#[no_mangle]
pub unsafe extern "C" fn rapport_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> CString {
        CString::new(
            r#"[
                {"sender": "Alex", "timestamp": "2024-01-15T14:00:00Z", "text": "Hey!"},
                {"sender": "Sam", "timestamp": "2024-01-15T14:02:00Z", "text": "Hi! How are you? 😊"},
                {"sender": "Alex", "timestamp": "2024-01-15T14:10:00Z", "text": "Good, you?"},
                {"sender": "Sam", "timestamp": "2024-01-15T14:12:00Z", "text": "Great!! Missing you"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_analyze_json() {
        let json = sample_json();
        let me = CString::new("Alex").unwrap();
        let them = CString::new("Sam").unwrap();

        unsafe {
            let result = rapport_analyze_json(json.as_ptr(), me.as_ptr(), them.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("schema_version"));
            assert!(result_str.contains("composite"));

            rapport_free_string(result);
        }
    }

    #[test]
    fn test_ffi_analyzer_lifecycle() {
        let config = CString::new("[consistency]\nbucket_hours = 12\n").unwrap();
        let json = sample_json();
        let me = CString::new("Alex").unwrap();
        let them = CString::new("Sam").unwrap();

        unsafe {
            let analyzer = rapport_analyzer_new(config.as_ptr());
            assert!(!analyzer.is_null());

            let result =
                rapport_analyzer_analyze_json(analyzer, json.as_ptr(), me.as_ptr(), them.as_ptr());
            assert!(!result.is_null());
            rapport_free_string(result);

            rapport_analyzer_free(analyzer);
        }
    }

    #[test]
    fn test_ffi_default_analyzer() {
        unsafe {
            let analyzer = rapport_analyzer_new(ptr::null());
            assert!(!analyzer.is_null());
            rapport_analyzer_free(analyzer);
        }
    }

    #[test]
    fn test_ffi_invalid_config() {
        let config = CString::new("[weights]\nresponse_time = 0.9\n").unwrap();
        unsafe {
            let analyzer = rapport_analyzer_new(config.as_ptr());
            assert!(analyzer.is_null());
            assert!(!rapport_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_out_of_range_windows_rejected() {
        let config = CString::new("[initiation]\ninactivity_gap_minutes = 9223372036854775807\n")
            .unwrap();
        unsafe {
            let analyzer = rapport_analyzer_new(config.as_ptr());
            assert!(analyzer.is_null());
            let error = CStr::from_ptr(rapport_last_error()).to_str().unwrap();
            assert!(error.contains("inactivity_gap_minutes"));
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let json = CString::new("not valid json").unwrap();
        let me = CString::new("Alex").unwrap();
        let them = CString::new("Sam").unwrap();

        unsafe {
            let result = rapport_analyze_json(json.as_ptr(), me.as_ptr(), them.as_ptr());
            assert!(result.is_null());

            let error = rapport_last_error();
            assert!(!error.is_null());
            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.contains("JSON"));
        }
    }

    #[test]
    fn test_ffi_null_pointer() {
        let me = CString::new("Alex").unwrap();
        unsafe {
            let result = rapport_analyze_json(ptr::null(), me.as_ptr(), me.as_ptr());
            assert!(result.is_null());
            assert!(!rapport_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = rapport_version();
            assert!(!version.is_null());
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, env!("CARGO_PKG_VERSION"));
        }
    }
}
