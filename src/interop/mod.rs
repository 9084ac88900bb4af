//! Interoperability - describe values that crossed a foreign-function boundary
//!
//! Design: raw records are validated once at the boundary, rendering works on
//! a sum type that only carries the payload each type code licenses.
//!
//! Architecture:
//! - `types.rs` - boundary record and argument model (VarArg, TypeCode, Arg)
//! - `marshal.rs` - raw record validation and caller-side constructors
//! - `format.rs` - stream-compatible floating point output
//! - `render.rs` - wide text rendering and the buffer contract

mod types;
mod marshal;
mod format;
mod render;

pub use types::{Arg, Ref, TypeCode, VarArg, UNKNOWN_LABEL};
pub use marshal::{decode_all, to_wide};
pub use format::{format_general, write_general};
pub use render::{render_into, render_sized, render_text, render_to_string, Renderer, WideText};
