// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Native `println` overloads of `java/io/PrintStream`.

use std::fmt;

use super::{NativeFrame, NativeMethod};
use crate::error::{Result, RuntimeError};
use crate::runtime::print_stream::PrintStream;
use crate::runtime::value::Value;

pub(super) const NATIVES: &[(&str, &str, &str, NativeMethod)] = &[
    (PrintStream::CLASS_NAME, "println", "()V", println_void),
    (PrintStream::CLASS_NAME, "println", "(Ljava/lang/String;)V", println_string),
    (PrintStream::CLASS_NAME, "println", "(I)V", println_int),
    (PrintStream::CLASS_NAME, "println", "(J)V", println_long),
    (PrintStream::CLASS_NAME, "println", "(Z)V", println_boolean),
    (PrintStream::CLASS_NAME, "println", "(F)V", println_float),
    (PrintStream::CLASS_NAME, "println", "(D)V", println_double),
    (PrintStream::CLASS_NAME, "println", "(C)V", println_char),
];

/// `void println()`
pub fn println_void(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    frame.this_print_stream(args)?.println(b"")?;
    Ok(None)
}

/// `void println(String)`; a null string prints `null`.
pub fn println_string(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let out = frame.this_print_stream(args)?;
    let arg = frame.arg(args, 1)?;
    match arg.as_jstring() {
        Some(s) => out.println(s.as_bytes())?,
        None if arg.is_null() => out.println(b"null")?,
        None => {
            return Err(RuntimeError::TypeMismatch {
                expected: "string",
                found: arg.kind(),
            });
        }
    }
    Ok(None)
}

/// `void println(int)`
pub fn println_int(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let out = frame.this_print_stream(args)?;
    let v = frame.arg(args, 1)?.as_int()?;
    out.println(v.to_string().as_bytes())?;
    Ok(None)
}

/// `void println(long)`
pub fn println_long(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let out = frame.this_print_stream(args)?;
    let v = frame.arg(args, 1)?.as_long()?;
    out.println(v.to_string().as_bytes())?;
    Ok(None)
}

/// `void println(boolean)`
pub fn println_boolean(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let out = frame.this_print_stream(args)?;
    let v = frame.arg(args, 1)?.as_int()? != 0;
    out.println(if v { &b"true"[..] } else { b"false" })?;
    Ok(None)
}

/// `void println(float)`
pub fn println_float(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let out = frame.this_print_stream(args)?;
    let v = frame.arg(args, 1)?.as_float()?;
    out.println(format_floating(v).as_bytes())?;
    Ok(None)
}

/// `void println(double)`
pub fn println_double(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let out = frame.this_print_stream(args)?;
    let v = frame.arg(args, 1)?.as_double()?;
    out.println(format_floating(v).as_bytes())?;
    Ok(None)
}

/// `void println(char)`
pub fn println_char(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let out = frame.this_print_stream(args)?;
    // Chars travel as ints; only the low 16 bits are the code unit.
    let unit = frame.arg(args, 1)?.as_int()? as u16;
    let ch = char::decode_utf16([unit])
        .next()
        .and_then(|r| r.ok())
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    let mut buf = [0u8; 4];
    out.println(ch.encode_utf8(&mut buf).as_bytes())?;
    Ok(None)
}

/// Renders a float or double the way `Double.toString` does: shortest
/// round-trip digits, always with a fractional part, plain notation for
/// magnitudes in `[1e-3, 1e7)` and computerized scientific notation
/// (`1.0E7`, `1.0E-4`) outside it. Non-finite values are spelled out.
fn format_floating<T>(value: T) -> String
where
    T: fmt::Display + fmt::LowerExp + Into<f64> + Copy,
{
    let wide: f64 = value.into();
    if wide.is_nan() {
        return "NaN".to_string();
    }
    if wide.is_infinite() {
        return if wide > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = wide.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let mut plain = value.to_string();
        if !plain.contains('.') {
            plain.push_str(".0");
        }
        return plain;
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{mantissa}E{exponent}")
    } else {
        format!("{mantissa}.0E{exponent}")
    }
}
