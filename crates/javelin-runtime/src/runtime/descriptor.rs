// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Field and method descriptors (JVMS §4.3).

use std::fmt;

use super::value::Value;
use crate::error::{Result, RuntimeError};

/// A parsed field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `D`
    Double,
    /// `F`
    Float,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `S`
    Short,
    /// `Z`
    Boolean,
    /// `Lname;`
    Object(String),
    /// `[component`
    Array(Box<FieldType>),
}

impl FieldType {
    /// Parses a complete field descriptor.
    pub fn parse(descriptor: &str) -> Result<Self> {
        match Self::parse_prefix(descriptor) {
            Some((ty, "")) => Ok(ty),
            _ => Err(RuntimeError::InvalidDescriptor(descriptor.to_string())),
        }
    }

    /// Parses one field type off the front of `s`, returning the rest.
    fn parse_prefix(s: &str) -> Option<(Self, &str)> {
        let mut chars = s.chars();
        let ty = match chars.next()? {
            'B' => FieldType::Byte,
            'C' => FieldType::Char,
            'D' => FieldType::Double,
            'F' => FieldType::Float,
            'I' => FieldType::Int,
            'J' => FieldType::Long,
            'S' => FieldType::Short,
            'Z' => FieldType::Boolean,
            'L' => {
                let end = s.find(';')?;
                let name = &s[1..end];
                if name.is_empty() {
                    return None;
                }
                return Some((FieldType::Object(name.to_string()), &s[end + 1..]));
            }
            '[' => {
                let (component, rest) = Self::parse_prefix(&s[1..])?;
                return Some((FieldType::Array(Box::new(component)), rest));
            }
            _ => return None,
        };
        Some((ty, chars.as_str()))
    }

    /// Bytes occupied in an object's field layout.
    ///
    /// References are laid out as 4-byte handles.
    pub fn size_in_bytes(&self) -> u32 {
        match self {
            FieldType::Byte | FieldType::Boolean => 1,
            FieldType::Char | FieldType::Short => 2,
            FieldType::Int | FieldType::Float | FieldType::Object(_) | FieldType::Array(_) => 4,
            FieldType::Long | FieldType::Double => 8,
        }
    }

    /// Number of local-variable slots the type occupies.
    pub fn slot_width(&self) -> usize {
        match self {
            FieldType::Long | FieldType::Double => 2,
            _ => 1,
        }
    }

    /// Returns true for object and array types.
    pub fn is_reference(&self) -> bool {
        matches!(self, FieldType::Object(_) | FieldType::Array(_))
    }

    /// The value a freshly allocated field of this type holds.
    pub fn default_value(&self) -> Value {
        match self {
            FieldType::Long => Value::Long(0),
            FieldType::Float => Value::Float(0.0),
            FieldType::Double => Value::Double(0.0),
            FieldType::Object(_) | FieldType::Array(_) => Value::Null,
            _ => Value::Int(0),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Byte => write!(f, "B"),
            FieldType::Char => write!(f, "C"),
            FieldType::Double => write!(f, "D"),
            FieldType::Float => write!(f, "F"),
            FieldType::Int => write!(f, "I"),
            FieldType::Long => write!(f, "J"),
            FieldType::Short => write!(f, "S"),
            FieldType::Boolean => write!(f, "Z"),
            FieldType::Object(name) => write!(f, "L{};", name),
            FieldType::Array(component) => write!(f, "[{}", component),
        }
    }
}

/// A parsed method descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Parameter types in declaration order
    pub params: Vec<FieldType>,
    /// Return type, `None` for `V`
    pub ret: Option<FieldType>,
}

impl MethodDescriptor {
    /// Parses a method descriptor such as `(ILjava/lang/String;)V`.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let invalid = || RuntimeError::InvalidDescriptor(descriptor.to_string());

        let mut rest = descriptor.strip_prefix('(').ok_or_else(invalid)?;
        let mut params = Vec::new();
        while !rest.starts_with(')') {
            let (ty, tail) = FieldType::parse_prefix(rest).ok_or_else(invalid)?;
            params.push(ty);
            rest = tail;
        }

        let ret = match &rest[1..] {
            "V" => None,
            other => Some(FieldType::parse(other).map_err(|_| invalid())?),
        };

        Ok(Self { params, ret })
    }

    /// Local-variable slots taken by the parameters, excluding `this`.
    pub fn param_slots(&self) -> usize {
        self.params.iter().map(FieldType::slot_width).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives() {
        assert_eq!(FieldType::parse("I").unwrap(), FieldType::Int);
        assert_eq!(FieldType::parse("Z").unwrap(), FieldType::Boolean);
        assert_eq!(FieldType::parse("J").unwrap(), FieldType::Long);
    }

    #[test]
    fn test_parse_references() {
        assert_eq!(
            FieldType::parse("Ljava/io/PrintStream;").unwrap(),
            FieldType::Object("java/io/PrintStream".to_string())
        );
        assert_eq!(
            FieldType::parse("[B").unwrap(),
            FieldType::Array(Box::new(FieldType::Byte))
        );
        assert_eq!(FieldType::parse("[[I").unwrap().to_string(), "[[I");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(FieldType::parse("").is_err());
        assert!(FieldType::parse("Q").is_err());
        assert!(FieldType::parse("L;").is_err());
        assert!(FieldType::parse("Ljava/lang/String").is_err());
        assert!(FieldType::parse("II").is_err());
    }

    #[test]
    fn test_layout_sizes() {
        let sizes: Vec<u32> = ["B", "Z", "C", "S", "I", "F", "Ljava/lang/Object;", "[B", "J", "D"]
            .iter()
            .map(|d| FieldType::parse(d).unwrap().size_in_bytes())
            .collect();
        assert_eq!(sizes, vec![1, 1, 2, 2, 4, 4, 4, 4, 8, 8]);
    }

    #[test]
    fn test_default_values() {
        assert_eq!(FieldType::Int.default_value(), Value::Int(0));
        assert_eq!(FieldType::Long.default_value(), Value::Long(0));
        assert!(FieldType::parse("[B").unwrap().default_value().is_null());
    }

    #[test]
    fn test_method_descriptor() {
        let desc = MethodDescriptor::parse("(ILjava/lang/String;J[D)V").unwrap();
        assert_eq!(desc.params.len(), 4);
        assert_eq!(desc.ret, None);
        assert_eq!(desc.param_slots(), 5);

        let desc = MethodDescriptor::parse("()[B").unwrap();
        assert!(desc.params.is_empty());
        assert_eq!(desc.ret, Some(FieldType::Array(Box::new(FieldType::Byte))));
    }

    #[test]
    fn test_method_descriptor_rejects_garbage() {
        assert!(MethodDescriptor::parse("I)V").is_err());
        assert!(MethodDescriptor::parse("(I").is_err());
        assert!(MethodDescriptor::parse("(I)").is_err());
        assert!(MethodDescriptor::parse("(X)V").is_err());
    }
}
