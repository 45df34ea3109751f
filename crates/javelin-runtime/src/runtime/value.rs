// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Slot values passed between the interpreter and native methods.

use std::fmt;
use std::sync::Arc;

use super::array::RuntimeArray;
use super::object::RuntimeObject;
use super::print_stream::PrintStream;
use super::string::JString;
use crate::error::{Result, RuntimeError};

/// A shared reference to a heap object.
pub type ObjectRef = Arc<HeapObject>;

/// Everything a reference slot can point at.
///
/// Plain instances and arrays are created by the interpreter; strings and
/// print streams are host-backed and only expose native operations.
#[derive(Debug)]
pub enum HeapObject {
    /// An instance of an interpreted class
    Instance(RuntimeObject),
    /// A primitive or reference array
    Array(RuntimeArray),
    /// `java/lang/String`
    String(JString),
    /// `java/io/PrintStream`
    PrintStream(PrintStream),
}

impl HeapObject {
    /// Internal class name of the object.
    pub fn class_name(&self) -> &str {
        match self {
            HeapObject::Instance(obj) => obj.class().name(),
            HeapObject::Array(arr) => arr.class_name(),
            HeapObject::String(_) => JString::CLASS_NAME,
            HeapObject::PrintStream(_) => PrintStream::CLASS_NAME,
        }
    }

    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            HeapObject::Instance(_) => "object",
            HeapObject::Array(_) => "array",
            HeapObject::String(_) => "string",
            HeapObject::PrintStream(_) => "print stream",
        }
    }
}

/// A value in a local-variable or operand slot.
///
/// `boolean`, `byte`, `char` and `short` travel as [`Value::Int`], the way
/// the JVM widens them on the operand stack.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The null reference
    #[default]
    Null,
    /// 32-bit int (also boolean, byte, char, short)
    Int(i32),
    /// 64-bit long
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit double
    Double(f64),
    /// Non-null reference
    Ref(ObjectRef),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            // Reference identity, like `if_acmpeq`
            (Value::Ref(a), Value::Ref(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Wraps a heap object in a fresh reference.
    pub fn new_ref(object: HeapObject) -> Self {
        Value::Ref(Arc::new(object))
    }

    /// Wraps a string in a fresh reference.
    pub fn string(s: JString) -> Self {
        Self::new_ref(HeapObject::String(s))
    }

    /// Returns true if this value is the null reference.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Ref(obj) => obj.kind(),
        }
    }

    /// Reads the slot as an int.
    pub fn as_int(&self) -> Result<i32> {
        match self {
            Value::Int(v) => Ok(*v),
            other => Err(mismatch("int", other)),
        }
    }

    /// Reads the slot as a long.
    pub fn as_long(&self) -> Result<i64> {
        match self {
            Value::Long(v) => Ok(*v),
            other => Err(mismatch("long", other)),
        }
    }

    /// Reads the slot as a float.
    pub fn as_float(&self) -> Result<f32> {
        match self {
            Value::Float(v) => Ok(*v),
            other => Err(mismatch("float", other)),
        }
    }

    /// Reads the slot as a double.
    pub fn as_double(&self) -> Result<f64> {
        match self {
            Value::Double(v) => Ok(*v),
            other => Err(mismatch("double", other)),
        }
    }

    /// Reads the slot as a reference, `None` for null.
    pub fn as_object(&self) -> Result<Option<&ObjectRef>> {
        match self {
            Value::Null => Ok(None),
            Value::Ref(obj) => Ok(Some(obj)),
            other => Err(mismatch("reference", other)),
        }
    }

    /// Returns the string behind this slot, if it holds one.
    ///
    /// Never fails: null, primitives and other objects yield `None`.
    pub fn as_jstring(&self) -> Option<&JString> {
        match self {
            Value::Ref(obj) => match &**obj {
                HeapObject::String(s) => Some(s),
                _ => None,
            },
            _ => None,
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Ref(obj) => match &**obj {
                HeapObject::String(s) => write!(f, "{}", s),
                other => write!(f, "{}@{:p}", other.class_name(), Arc::as_ptr(obj)),
            },
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Int(v as i32)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        assert!(Value::default().is_null());
    }

    #[test]
    fn test_reference_equality_is_identity() {
        let a = Value::string(JString::from_bytes(b"x"));
        let b = Value::string(JString::from_bytes(b"x"));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(7).as_int().unwrap(), 7);
        assert_eq!(Value::Long(-1).as_long().unwrap(), -1);
        assert_eq!(Value::from(true), Value::Int(1));
        assert!(Value::Null.as_object().unwrap().is_none());

        let err = Value::Long(1).as_int().unwrap_err();
        assert_eq!(
            err,
            RuntimeError::TypeMismatch {
                expected: "int",
                found: "long"
            }
        );
    }

    #[test]
    fn test_as_jstring_never_fails() {
        assert!(Value::Null.as_jstring().is_none());
        assert!(Value::Int(3).as_jstring().is_none());
        let s = Value::string(JString::from_bytes(b"ok"));
        assert_eq!(s.as_jstring().unwrap().as_bytes(), b"ok");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::string(JString::from_bytes(b"HI")).to_string(), "HI");
    }

    #[test]
    fn test_nan_bits_compare_equal() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    }
}
