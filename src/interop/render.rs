//! Argument renderer
//!
//! Renders validated arguments into wide text and applies the caller buffer
//! contract: zero-fill, copy only when the whole text fits, always report the
//! full length so the caller can retry with a larger buffer.

use core::fmt::{self, Write};

use tracing::{debug, trace, warn};

use super::format::write_general;
use super::types::{Arg, TypeCode};
use crate::config::RenderConfig;

/// Growable UTF-16 accumulator
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WideText {
    units: Vec<u16>,
}

impl WideText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append code units verbatim, unpaired surrogates included
    #[inline]
    pub fn push_units(&mut self, units: &[u16]) {
        self.units.extend_from_slice(units);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[inline]
    pub fn as_units(&self) -> &[u16] {
        &self.units
    }

    pub fn into_units(self) -> Vec<u16> {
        self.units
    }
}

impl Write for WideText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.units.extend(s.encode_utf16());
        Ok(())
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        let mut buf = [0u16; 2];
        self.units.extend_from_slice(c.encode_utf16(&mut buf));
        Ok(())
    }
}

/// Renders argument lists under one configuration
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Append one bracketed entry and its trailing separator
    pub fn write_arg(&self, out: &mut WideText, arg: &Arg<'_>) -> fmt::Result {
        let precision = self.config.precision();

        match *arg {
            Arg::Long(value) => write!(out, "[LONG={}", value)?,
            Arg::ULong(value) => write!(out, "[ULONG={}", value)?,
            Arg::Float(value) => {
                out.write_str("[FLOAT=")?;
                write_general(out, f64::from(value), precision)?;
            }
            Arg::Double(value) => {
                out.write_str("[DOUBLE=")?;
                write_general(out, value, precision)?;
            }
            Arg::String(units) => {
                out.write_str("[STRING='")?;
                out.push_units(units);
                out.write_char('\'')?;
            }
            Arg::Binary(bytes) => {
                out.write_str("[BINARY:")?;
                for byte in bytes {
                    write!(out, " {}", byte)?;
                }
            }
            Arg::Reference { id, target } => write!(out, "[REFERENCE:{}@{}", id, target)?,
            Arg::Unknown(code) => {
                warn!(type_code = code, known = TypeCode::from_raw(code).is_some(), "unrendered type code");
                write!(out, "[Unknown TypeCode:{}", code)?;
            }
            Arg::Invalid(code) => write!(out, "[INVALID TypeCode:{}", code)?,
        }

        out.write_str("] ")
    }

    /// Full text for `args`, in order
    pub fn render_text(&self, args: &[Arg<'_>]) -> Vec<u16> {
        let mut out = WideText::new();
        for arg in args {
            // WideText never reports a write error
            let _ = self.write_arg(&mut out, arg);
        }
        out.into_units()
    }

    /// Render into `buffer`, returning the required length
    ///
    /// An empty buffer is left alone and yields 0. Otherwise the buffer is
    /// zeroed and receives the text only if the text is strictly shorter
    /// than the buffer; a return value `>= buffer.len()` means nothing was
    /// written.
    pub fn render_into(&self, buffer: &mut [u16], args: &[Arg<'_>]) -> usize {
        if buffer.is_empty() {
            return 0;
        }

        let text = self.render_text(args);
        buffer.fill(0);

        if text.len() < buffer.len() {
            buffer[..text.len()].copy_from_slice(&text);
        } else {
            debug!(required = text.len(), capacity = buffer.len(), "buffer too small, left zeroed");
        }

        trace!(args = args.len(), required = text.len(), capacity = buffer.len(), "rendered arguments");
        text.len()
    }

    /// Text decoded for display, unpaired surrogates replaced
    pub fn render_to_string(&self, args: &[Arg<'_>]) -> String {
        String::from_utf16_lossy(&self.render_text(args))
    }

    /// Size, allocate, fill: the two-call sequence callers use
    pub fn render_sized(&self, args: &[Arg<'_>]) -> Vec<u16> {
        let mut sizing = [0u16; 1];
        let required = self.render_into(&mut sizing, args);
        if required == 0 {
            return Vec::new();
        }

        let mut buffer = vec![0u16; required + 1];
        let written = self.render_into(&mut buffer, args);
        buffer.truncate(written);
        buffer
    }
}

/// [`Renderer::render_into`] with an explicit configuration
pub fn render_into(buffer: &mut [u16], args: &[Arg<'_>], config: &RenderConfig) -> usize {
    Renderer::new(config.clone()).render_into(buffer, args)
}

/// [`Renderer::render_text`] with an explicit configuration
pub fn render_text(args: &[Arg<'_>], config: &RenderConfig) -> Vec<u16> {
    Renderer::new(config.clone()).render_text(args)
}

/// [`Renderer::render_to_string`] with an explicit configuration
pub fn render_to_string(args: &[Arg<'_>], config: &RenderConfig) -> String {
    Renderer::new(config.clone()).render_to_string(args)
}

/// [`Renderer::render_sized`] with an explicit configuration
pub fn render_sized(args: &[Arg<'_>], config: &RenderConfig) -> Vec<u16> {
    Renderer::new(config.clone()).render_sized(args)
}
