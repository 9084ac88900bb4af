//! Type definitions for the vararg boundary
//!
//! `VarArg` is the raw record a managed caller lays out in memory. `Arg` is
//! what the renderer actually consumes: one case per type code, carrying only
//! the payload that code licenses.

use core::ffi::{c_void, CStr};
use core::fmt;

/// Type discriminator stored in `VarArg::type_code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum TypeCode {
    String = 0x01,
    Binary = 0x02,
    Long = 0x03,
    ULong = 0x04,
    /// Reserved by callers, never rendered
    Decimal = 0x05,
    Float = 0x06,
    Double = 0x07,
    Reference = 0x08,
}

impl TypeCode {
    /// Map a raw discriminator onto a known code
    #[inline]
    pub const fn from_raw(code: i64) -> Option<Self> {
        match code {
            0x01 => Some(Self::String),
            0x02 => Some(Self::Binary),
            0x03 => Some(Self::Long),
            0x04 => Some(Self::ULong),
            0x05 => Some(Self::Decimal),
            0x06 => Some(Self::Float),
            0x07 => Some(Self::Double),
            0x08 => Some(Self::Reference),
            _ => None,
        }
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self as i64
    }

    /// NUL-terminated label, also handed out over the C ABI
    pub const fn c_label(self) -> &'static CStr {
        match self {
            Self::String => c"STRING",
            Self::Binary => c"BINARY",
            Self::Long => c"LONG",
            Self::ULong => c"ULONG",
            Self::Decimal => c"DECIMAL",
            Self::Float => c"FLOAT",
            Self::Double => c"DOUBLE",
            Self::Reference => c"REFERENCE",
        }
    }

    /// Label without its terminator
    pub fn label(self) -> &'static str {
        // Labels are ASCII
        self.c_label().to_str().unwrap_or_default()
    }
}

/// Label for codes outside the table
pub const UNKNOWN_LABEL: &CStr = c"Unknown";

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw tagged argument as laid out by the caller
///
/// Five 8-byte slots, in this order. Which slots mean anything depends on
/// `type_code`; see [`VarArg::decode`](crate::interop::VarArg::decode).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarArg {
    pub type_code: i64,
    pub long_value: i64,
    pub ulong_value: u64,
    pub double_value: f64,
    pub pointer_value: *const c_void,
}

impl VarArg {
    /// Record with only the discriminator set
    #[inline]
    pub const fn raw(type_code: i64) -> Self {
        Self {
            type_code,
            long_value: 0,
            ulong_value: 0,
            double_value: 0.0,
            pointer_value: core::ptr::null(),
        }
    }

    #[inline]
    pub const fn code(&self) -> Option<TypeCode> {
        TypeCode::from_raw(self.type_code)
    }
}

impl Default for VarArg {
    fn default() -> Self {
        Self::raw(0)
    }
}

/// Database reference pair carried by `TypeCode::Reference`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ref {
    pub db_id: u64,
    pub db_ref: u64,
}

impl Ref {
    #[inline]
    pub const fn new(db_id: u64, db_ref: u64) -> Self {
        Self { db_id, db_ref }
    }
}

/// Validated argument
///
/// Borrowed payloads live as long as the caller's memory for one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    /// Wide string without its terminator
    String(&'a [u16]),
    Binary(&'a [u8]),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    Reference { id: i64, target: u64 },
    /// Code outside the rendered set (including `Decimal`)
    Unknown(i64),
    /// Known code whose payload failed validation at the boundary
    Invalid(i64),
}

impl<'a> Arg<'a> {
    /// Raw discriminator this argument renders under
    pub fn type_code(&self) -> i64 {
        match self {
            Self::String(_) => TypeCode::String.raw(),
            Self::Binary(_) => TypeCode::Binary.raw(),
            Self::Long(_) => TypeCode::Long.raw(),
            Self::ULong(_) => TypeCode::ULong.raw(),
            Self::Float(_) => TypeCode::Float.raw(),
            Self::Double(_) => TypeCode::Double.raw(),
            Self::Reference { .. } => TypeCode::Reference.raw(),
            Self::Unknown(code) | Self::Invalid(code) => *code,
        }
    }
}
