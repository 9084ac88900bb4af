//! Boundary marshaling - raw records ↔ validated arguments
//!
//! Decoding is the only place raw pointers are dereferenced. Everything past
//! this module works on borrowed slices.

use core::ffi::c_void;
use core::mem::align_of;
use core::slice;

use tracing::{trace, warn};

use super::types::{Arg, Ref, TypeCode, VarArg};
use crate::config::{PayloadSlot, RenderConfig};
use crate::errors::MarshalError;

/// Encode `text` as a 0-terminated wide string
pub fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(core::iter::once(0)).collect()
}

impl VarArg {
    /// Read the numeric value stored in `slot`
    #[inline]
    pub fn slot(&self, slot: PayloadSlot) -> u64 {
        match slot {
            PayloadSlot::Signed => self.long_value as u64,
            PayloadSlot::Unsigned => self.ulong_value,
            PayloadSlot::Pointer => self.pointer_value as usize as u64,
        }
    }

    #[inline]
    fn store(&mut self, slot: PayloadSlot, value: u64) {
        match slot {
            PayloadSlot::Signed => self.long_value = value as i64,
            PayloadSlot::Unsigned => self.ulong_value = value,
            PayloadSlot::Pointer => self.pointer_value = value as usize as *const c_void,
        }
    }

    /// Wide string argument
    ///
    /// `units` must contain a 0 terminator (see [`to_wide`]). The record
    /// borrows the address, so `units` must outlive every use of it.
    pub fn string(units: &[u16]) -> Result<Self, MarshalError> {
        if !units.contains(&0) {
            return Err(MarshalError::Unterminated);
        }

        Ok(Self {
            pointer_value: units.as_ptr().cast(),
            ..Self::raw(TypeCode::String.raw())
        })
    }

    /// Byte array argument; the record borrows `bytes`
    pub fn binary(bytes: &[u8]) -> Self {
        Self {
            long_value: bytes.len() as i64,
            pointer_value: bytes.as_ptr().cast(),
            ..Self::raw(TypeCode::Binary.raw())
        }
    }

    pub fn long(value: i64) -> Self {
        Self {
            long_value: value,
            ..Self::raw(TypeCode::Long.raw())
        }
    }

    /// Unsigned argument in the `ulong_value` slot
    pub fn ulong(value: u64) -> Self {
        Self::ulong_in(value, PayloadSlot::Unsigned)
    }

    pub fn ulong_in(value: u64, slot: PayloadSlot) -> Self {
        let mut arg = Self::raw(TypeCode::ULong.raw());
        arg.store(slot, value);
        arg
    }

    /// Single precision argument, stored widened
    pub fn float(value: f32) -> Self {
        Self {
            double_value: f64::from(value),
            ..Self::raw(TypeCode::Float.raw())
        }
    }

    pub fn double(value: f64) -> Self {
        Self {
            double_value: value,
            ..Self::raw(TypeCode::Double.raw())
        }
    }

    /// Reference argument with its target in the `ulong_value` slot
    pub fn reference(reference: Ref) -> Self {
        Self::reference_in(reference, PayloadSlot::Unsigned)
    }

    pub fn reference_in(reference: Ref, slot: PayloadSlot) -> Self {
        let mut arg = Self {
            long_value: reference.db_id as i64,
            ..Self::raw(TypeCode::Reference.raw())
        };
        arg.store(slot, reference.db_ref);
        arg
    }

    /// Validate the record into an [`Arg`]
    ///
    /// Only the fields licensed by `type_code` are read, and only `String`
    /// and `Binary` dereference `pointer_value`.
    ///
    /// # Safety
    ///
    /// For `String`, a non-null aligned `pointer_value` must point to a
    /// readable run of `u16` ending in 0. For `Binary`, a non-null
    /// `pointer_value` must point to `long_value` readable bytes. Both must
    /// stay valid and unmodified for `'a`.
    pub unsafe fn decode<'a>(&'a self, config: &RenderConfig) -> Result<Arg<'a>, MarshalError> {
        let Some(code) = self.code() else {
            return Ok(Arg::Unknown(self.type_code));
        };

        let arg = match code {
            TypeCode::String => Arg::String(unsafe { self.wide_str()? }),
            TypeCode::Binary => Arg::Binary(unsafe { self.bytes()? }),
            TypeCode::Long => Arg::Long(self.long_value),
            TypeCode::ULong => Arg::ULong(self.slot(config.unsigned_source)),
            TypeCode::Float => Arg::Float(self.double_value as f32),
            TypeCode::Double => Arg::Double(self.double_value),
            TypeCode::Reference => Arg::Reference {
                id: self.long_value,
                target: self.slot(config.reference_source),
            },
            TypeCode::Decimal => Arg::Unknown(self.type_code),
        };

        Ok(arg)
    }

    unsafe fn wide_str<'a>(&'a self) -> Result<&'a [u16], MarshalError> {
        let ptr = self.pointer_value.cast::<u16>();
        if ptr.is_null() {
            return Err(MarshalError::NullString { code: self.type_code });
        }
        if (ptr as usize) % align_of::<u16>() != 0 {
            return Err(MarshalError::MisalignedString { addr: ptr as usize });
        }

        let mut len = 0usize;
        // SAFETY: caller guarantees the run is terminated
        while unsafe { *ptr.add(len) } != 0 {
            len += 1;
        }

        // SAFETY: `len` units were just read through `ptr`
        Ok(unsafe { slice::from_raw_parts(ptr, len) })
    }

    unsafe fn bytes<'a>(&'a self) -> Result<&'a [u8], MarshalError> {
        let len = self.long_value;
        if len < 0 {
            return Err(MarshalError::NegativeLength { len });
        }
        if len == 0 {
            return Ok(&[]);
        }
        if self.pointer_value.is_null() {
            return Err(MarshalError::NullBinary { len });
        }
        let count = isize::try_from(len)
            .map(|count| count as usize)
            .map_err(|_| MarshalError::LengthOverflow { len })?;

        // SAFETY: caller guarantees `count` readable bytes
        Ok(unsafe { slice::from_raw_parts(self.pointer_value.cast::<u8>(), count) })
    }
}

/// Decode every record, degrading failures to [`Arg::Invalid`]
///
/// # Safety
///
/// Each record must satisfy the contract of [`VarArg::decode`].
pub unsafe fn decode_all<'a>(args: &'a [VarArg], config: &RenderConfig) -> Vec<Arg<'a>> {
    args.iter()
        .enumerate()
        .map(|(index, raw)| match unsafe { raw.decode(config) } {
            Ok(arg) => {
                trace!(index, type_code = raw.type_code, "decoded argument");
                arg
            }
            Err(error) => {
                let code = error.type_code();
                warn!(index, type_code = code, %error, "rejected argument payload");
                Arg::Invalid(code)
            }
        })
        .collect()
}
