// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Host-backed `java/lang/String`.
//!
//! A string owns a private, fixed-length byte buffer. Every buffer that
//! crosses the type's boundary is copied, in both directions, so a string
//! can be shared between threads without synchronization.

use std::fmt;

use super::value::Value;
use crate::error::{Result, RuntimeError};

/// An immutable, byte-backed string.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct JString {
    value: Box<[u8]>,
}

impl JString {
    /// Internal class name.
    pub const CLASS_NAME: &'static str = "java/lang/String";

    /// Creates the empty string.
    pub fn new() -> Self {
        Self {
            value: Box::default(),
        }
    }

    /// Creates a string backed by a copy of `bytes`.
    ///
    /// The caller keeps ownership of `bytes`; later mutation of it is not
    /// observable through the new string.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            value: Box::from(bytes),
        }
    }

    /// Number of bytes in the backing buffer.
    pub fn length(&self) -> usize {
        self.value.len()
    }

    /// Length as the JVM's `int`; longer buffers cannot be reported.
    pub fn int_length(&self) -> Result<i32> {
        int_length(self.value.len())
    }

    /// Returns true for the zero-length string.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The character unit at `index`, zero-extended from its byte.
    pub fn char_at(&self, index: i32) -> Result<u16> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.value.get(i))
            .map(|&b| u16::from(b))
            .ok_or(RuntimeError::StringIndexOutOfBounds {
                index,
                length: self.value.len(),
            })
    }

    /// Byte equality against an arbitrary slot value.
    ///
    /// Anything that is not a string, including null, compares unequal.
    pub fn equals(&self, other: &Value) -> bool {
        other
            .as_jstring()
            .is_some_and(|other| self.value == other.value)
    }

    /// A fresh copy of the backing buffer.
    pub fn get_bytes(&self) -> Vec<u8> {
        self.value.to_vec()
    }

    /// Borrows the backing buffer read-only.
    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }
}

fn int_length(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| {
        RuntimeError::OutOfMemory(format!("string of {len} bytes exceeds the int length range"))
    })
}

impl From<&str> for JString {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl fmt::Display for JString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.value))
    }
}

impl fmt::Debug for JString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JString({:?})", String::from_utf8_lossy(&self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let s = JString::new();
        assert_eq!(s.length(), 0);
        assert!(s.is_empty());
        assert!(s.get_bytes().is_empty());
        assert!(s.char_at(0).is_err());
    }

    #[test]
    fn test_int_length_bounds() {
        assert_eq!(JString::from("HI").int_length().unwrap(), 2);
        assert_eq!(int_length(i32::MAX as usize).unwrap(), i32::MAX);
        assert!(matches!(
            int_length(i32::MAX as usize + 1),
            Err(RuntimeError::OutOfMemory(_))
        ));
    }

    #[test]
    fn test_hi_scenario() {
        let s = JString::from_bytes(&[72, 73]);
        assert_eq!(s.length(), 2);
        assert_eq!(s.char_at(0).unwrap(), 72);
        assert_eq!(s.char_at(1).unwrap(), 73);
        assert_eq!(
            s.char_at(2).unwrap_err(),
            RuntimeError::StringIndexOutOfBounds {
                index: 2,
                length: 2
            }
        );
        assert_eq!(s.get_bytes(), vec![72, 73]);
    }

    #[test]
    fn test_negative_index_is_rejected() {
        let s = JString::from("abc");
        assert!(matches!(
            s.char_at(-1),
            Err(RuntimeError::StringIndexOutOfBounds { index: -1, length: 3 })
        ));
        assert!(s.char_at(i32::MIN).is_err());
    }

    #[test]
    fn test_high_bytes_zero_extend() {
        let s = JString::from_bytes(&[0xFF, 0x80]);
        assert_eq!(s.char_at(0).unwrap(), 0x00FF);
        assert_eq!(s.char_at(1).unwrap(), 0x0080);
    }

    #[test]
    fn test_construction_copies_input() {
        let mut input = vec![1u8, 2, 3];
        let s = JString::from_bytes(&input);
        input[0] = 99;
        input.push(4);
        assert_eq!(s.get_bytes(), vec![1, 2, 3]);
    }

    #[test]
    fn test_get_bytes_returns_copy() {
        let s = JString::from("HI");
        let mut out = s.get_bytes();
        out[0] = b'X';
        out.clear();
        assert_eq!(s.as_bytes(), b"HI");
        assert_eq!(s.get_bytes(), b"HI".to_vec());
    }

    #[test]
    fn test_equals() {
        let ab = Value::string(JString::from_bytes(&[65, 66]));
        let ab2 = Value::string(JString::from_bytes(&[65, 66]));
        let ac = Value::string(JString::from_bytes(&[65, 67]));
        let abc = Value::string(JString::from_bytes(&[65, 66, 67]));

        let s = ab.as_jstring().unwrap();
        assert!(s.equals(&ab));
        assert!(s.equals(&ab2));
        assert!(ab2.as_jstring().unwrap().equals(&ab));
        assert!(!s.equals(&ac));
        assert!(!s.equals(&abc));
    }

    #[test]
    fn test_equals_incompatible_is_false() {
        let s = JString::from("65");
        assert!(!s.equals(&Value::Null));
        assert!(!s.equals(&Value::Int(65)));
        assert!(!s.equals(&Value::Long(65)));
        assert!(!JString::new().equals(&Value::Null));
    }

    #[test]
    fn test_empty_is_not_absent() {
        let empty = Value::string(JString::new());
        assert!(!empty.is_null());
        assert!(JString::new().equals(&empty));
    }

    #[test]
    fn test_display() {
        assert_eq!(JString::from("Olá").to_string(), "Olá");
        assert_eq!(format!("{:?}", JString::from("x")), "JString(\"x\")");
    }
}
