use std::ffi::{CStr, c_char};
use std::str::Utf8Error;

/// `some_str` must carry its own trailing NUL.
pub fn str_to_c_string(some_str: &'static str) -> *const c_char {
    debug_assert!(some_str.ends_with('\0'));
    some_str.as_ptr() as *const c_char
}

/// Copies a NUL-terminated C string into an owned `String`.
///
/// # Safety
///
/// `raw` must be non-null and point to a valid NUL-terminated string.
pub unsafe fn cstr_to_rust_string(raw: *const c_char) -> Result<String, Utf8Error> {
    let c_str: &CStr = unsafe { CStr::from_ptr(raw) };
    c_str.to_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn round_trips_static_names() {
        let raw = str_to_c_string("rdsSnapshotter\0");
        let name = unsafe { cstr_to_rust_string(raw) }.unwrap();
        assert_eq!(name, "rdsSnapshotter");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let raw = CString::new(vec![0xff, 0xfe]).unwrap();
        assert!(unsafe { cstr_to_rust_string(raw.as_ptr()) }.is_err());
    }
}
