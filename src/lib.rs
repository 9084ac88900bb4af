//! vararg-native - describe tagged arguments received across a C boundary
//!
//! A managed caller passes an array of tagged variant records and a wide
//! character buffer; the library writes a bracketed description of each
//! argument and returns the length the full text needs.

#![warn(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod errors;
pub mod ffi;
pub mod interop;
pub mod logging;

// Re-export core types
pub use config::{PayloadSlot, RenderConfig};
pub use errors::{ConfigError, MarshalError};
pub use interop::{
    decode_all, format_general, render_into, render_sized, render_text, render_to_string, to_wide,
    Arg, Ref, Renderer, TypeCode, VarArg, WideText,
};
pub use logging::{init_file_logging, init_logging, LogConfig, LogFormat, LogOutput};
