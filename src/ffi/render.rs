//! Rendering entry points

use core::mem::align_of;
use core::slice;
use std::os::raw::c_char;

use tracing::warn;

use super::renderer;
use crate::interop::{decode_all, TypeCode, VarArg, UNKNOWN_LABEL};

/// Render `argc` records from `argv` into `buf`
///
/// Returns the number of wide characters the full text needs. The buffer is
/// zero-filled and only receives the text when that number is below `maxbuf`.
/// A null `buf` or a zero `maxbuf` does nothing and returns 0. A null `argv`
/// or a non-positive `argc` renders nothing.
///
/// # Safety
///
/// `buf` must be valid for `maxbuf` writes of `u16`. `argv` must point to
/// `argc` records, each carrying valid pointer payloads for its type code.
#[no_mangle]
pub unsafe extern "C" fn vararg_native_render(
    buf: *mut u16,
    maxbuf: u32,
    argc: i64,
    argv: *const VarArg,
) -> u32 {
    if buf.is_null() || maxbuf < 1 {
        return 0;
    }

    let renderer = renderer();
    let records = unsafe { records(argc, argv) };
    let args = unsafe { decode_all(records, renderer.config()) };

    // SAFETY: caller guarantees `maxbuf` writable units at `buf`
    let buffer = unsafe { slice::from_raw_parts_mut(buf, maxbuf as usize) };
    let required = renderer.render_into(buffer, &args);

    u32::try_from(required).unwrap_or(u32::MAX)
}

/// Entry point under its historical export name
///
/// # Safety
///
/// Same contract as [`vararg_native_render`].
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn CSharpVarArgsNative(
    buf: *mut u16,
    maxbuf: u32,
    argc: i64,
    argv: *const VarArg,
) -> u32 {
    unsafe { vararg_native_render(buf, maxbuf, argc, argv) }
}

/// Static NUL-terminated label for `code`
#[no_mangle]
pub extern "C" fn vararg_native_type_name(code: i64) -> *const c_char {
    TypeCode::from_raw(code)
        .map_or(UNKNOWN_LABEL, TypeCode::c_label)
        .as_ptr()
}

unsafe fn records<'a>(argc: i64, argv: *const VarArg) -> &'a [VarArg] {
    let Ok(count) = usize::try_from(argc) else {
        return &[];
    };
    if count == 0 || argv.is_null() {
        return &[];
    }
    if (argv as usize) % align_of::<VarArg>() != 0 {
        warn!(address = ?argv, "misaligned argument array ignored");
        return &[];
    }

    // SAFETY: caller guarantees `argc` records at `argv`
    unsafe { slice::from_raw_parts(argv, count) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interop::{to_wide, Ref};
    use std::ffi::CStr;

    fn call(capacity: usize, args: &[VarArg]) -> (u32, Vec<u16>) {
        let mut buffer = vec![0xAAAAu16; capacity];
        let len = unsafe {
            vararg_native_render(buffer.as_mut_ptr(), capacity as u32, args.len() as i64, args.as_ptr())
        };
        (len, buffer)
    }

    fn text(buffer: &[u16]) -> String {
        let end = buffer.iter().position(|&u| u == 0).unwrap_or(buffer.len());
        String::from_utf16(&buffer[..end]).unwrap()
    }

    #[test]
    fn test_null_buffer() {
        let args = [VarArg::long(42)];
        let len = unsafe { vararg_native_render(core::ptr::null_mut(), 100, 1, args.as_ptr()) };
        assert_eq!(len, 0);
    }

    #[test]
    fn test_zero_capacity_leaves_buffer() {
        let mut buffer = [0xAAAAu16; 4];
        let args = [VarArg::long(42)];
        let len = unsafe { vararg_native_render(buffer.as_mut_ptr(), 0, 1, args.as_ptr()) };
        assert_eq!(len, 0);
        assert_eq!(buffer, [0xAAAAu16; 4]);
    }

    #[test]
    fn test_long_entry() {
        let (len, buffer) = call(100, &[VarArg::long(42)]);
        assert_eq!(len, 10);
        assert_eq!(text(&buffer), "[LONG=42] ");
        assert!(buffer[10..].iter().all(|&u| u == 0));
    }

    #[test]
    fn test_truncation_reports_length() {
        let (len, buffer) = call(5, &[VarArg::long(42)]);
        assert_eq!(len, 10);
        assert!(buffer.iter().all(|&u| u == 0));
    }

    #[test]
    fn test_string_and_binary_entries() {
        let hi = to_wide("hi");
        let bytes = [1u8, 2, 255];
        let args = [VarArg::string(&hi).unwrap(), VarArg::binary(&bytes)];

        let (len, buffer) = call(100, &args);
        assert_eq!(text(&buffer), "[STRING='hi'] [BINARY: 1 2 255] ");
        assert_eq!(len as usize, "[STRING='hi'] [BINARY: 1 2 255] ".len());
    }

    #[test]
    fn test_null_payload_degrades() {
        let (_, buffer) = call(100, &[VarArg::raw(1), VarArg::ulong(3)]);
        assert_eq!(text(&buffer), "[INVALID TypeCode:1] [ULONG=3] ");
    }

    #[test]
    fn test_missing_arguments() {
        let mut buffer = [0xAAAAu16; 8];
        let len = unsafe { vararg_native_render(buffer.as_mut_ptr(), 8, 3, core::ptr::null()) };
        assert_eq!(len, 0);
        assert_eq!(buffer, [0u16; 8]);

        let args = [VarArg::long(1)];
        let len = unsafe { vararg_native_render(buffer.as_mut_ptr(), 8, -1, args.as_ptr()) };
        assert_eq!(len, 0);
    }

    #[test]
    fn test_misaligned_argv_renders_nothing() {
        let slots = [0u64; 11];
        let argv = unsafe { slots.as_ptr().cast::<u8>().add(1) }.cast::<VarArg>();

        let mut buffer = [0xAAAAu16; 8];
        let len = unsafe { vararg_native_render(buffer.as_mut_ptr(), 8, 1, argv) };
        assert_eq!(len, 0);
        assert_eq!(buffer, [0u16; 8]);
    }

    #[test]
    fn test_historical_symbol() {
        let args = [VarArg::reference(Ref::new(777, 999))];
        let mut buffer = [0u16; 64];
        let len = unsafe { CSharpVarArgsNative(buffer.as_mut_ptr(), 64, 1, args.as_ptr()) };
        assert_eq!(len, 20);
        assert_eq!(text(&buffer), "[REFERENCE:777@999] ");
    }

    #[test]
    fn test_type_names() {
        let name = |code| unsafe { CStr::from_ptr(vararg_native_type_name(code)) }.to_str().unwrap();
        assert_eq!(name(3), "LONG");
        assert_eq!(name(5), "DECIMAL");
        assert_eq!(name(99), "Unknown");
        assert_eq!(name(0), "Unknown");
        for code in 1..=8 {
            assert_eq!(name(code), TypeCode::from_raw(code).unwrap().label());
        }
    }
}
