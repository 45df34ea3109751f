// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Native methods of `java/lang/String`.

use super::{NativeFrame, NativeMethod};
use crate::error::{Result, RuntimeError};
use crate::runtime::array::RuntimeArray;
use crate::runtime::string::JString;
use crate::runtime::value::{HeapObject, Value};

pub(super) const NATIVES: &[(&str, &str, &str, NativeMethod)] = &[
    (JString::CLASS_NAME, "<init>", "()V", str_init),
    (JString::CLASS_NAME, "<init>", "([B)V", str_init_bytes),
    (JString::CLASS_NAME, "length", "()I", str_length),
    (JString::CLASS_NAME, "charAt", "(I)C", str_char_at),
    (JString::CLASS_NAME, "equals", "(Ljava/lang/Object;)Z", str_equals),
    (JString::CLASS_NAME, "getBytes", "()[B", str_get_bytes),
];

/// `String()`
///
/// Strings are immutable, so constructors return the constructed string and
/// the caller substitutes it for the allocated receiver.
pub fn str_init(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    frame.this_string(args)?;
    Ok(Some(Value::string(JString::new())))
}

/// `String(byte[])`, copying the array's contents.
pub fn str_init_bytes(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    frame.this_string(args)?;
    let bytes = match frame.arg(args, 1)?.as_object()? {
        Some(obj) => match &**obj {
            HeapObject::Array(array) => array.to_bytes()?,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "byte[]",
                    found: other.kind(),
                });
            }
        },
        None => return Err(RuntimeError::null_pointer("String(byte[]) with null array")),
    };
    Ok(Some(Value::string(JString::from_bytes(&bytes))))
}

/// `int length()`
pub fn str_length(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let this = frame.this_string(args)?;
    Ok(Some(Value::Int(this.int_length()?)))
}

/// `char charAt(int)`
pub fn str_char_at(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let this = frame.this_string(args)?;
    let index = frame.arg(args, 1)?.as_int()?;
    let ch = this.char_at(index)?;
    Ok(Some(Value::Int(i32::from(ch))))
}

/// `boolean equals(Object)`
pub fn str_equals(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let this = frame.this_string(args)?;
    let other = frame.arg(args, 1)?;
    // Same reference short-circuits before comparing bytes.
    let same = match (&args[0], other) {
        (Value::Ref(a), Value::Ref(b)) if std::sync::Arc::ptr_eq(a, b) => true,
        _ => this.equals(other),
    };
    Ok(Some(Value::from(same)))
}

/// `byte[] getBytes()`
pub fn str_get_bytes(frame: &mut NativeFrame<'_>, args: &[Value]) -> Result<Option<Value>> {
    let this = frame.this_string(args)?;
    let bytes = RuntimeArray::from_bytes(this.as_bytes());
    Ok(Some(Value::new_ref(HeapObject::Array(bytes))))
}
