// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Array objects.
//!
//! Primitive arrays keep their elements as raw little-endian bytes with a
//! fixed element size; reference arrays keep one [`Value`] per element.

use parking_lot::RwLock;

use super::descriptor::FieldType;
use super::value::Value;
use crate::error::{Result, RuntimeError};

#[derive(Debug)]
enum Elements {
    Primitive { elem_size: usize, raw: RwLock<Vec<u8>> },
    Reference(RwLock<Vec<Value>>),
}

/// A Java array.
#[derive(Debug)]
pub struct RuntimeArray {
    component: FieldType,
    class_name: String,
    length: usize,
    elements: Elements,
}

impl RuntimeArray {
    /// Allocates an array of `length` zeroed/null elements.
    pub fn new(component: FieldType, length: usize) -> Self {
        let elements = if component.is_reference() {
            Elements::Reference(RwLock::new(vec![Value::Null; length]))
        } else {
            let elem_size = component.size_in_bytes() as usize;
            Elements::Primitive {
                elem_size,
                raw: RwLock::new(vec![0; length * elem_size]),
            }
        };
        Self {
            class_name: format!("[{}", component),
            component,
            length,
            elements,
        }
    }

    /// Creates a `byte[]` holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            component: FieldType::Byte,
            class_name: "[B".to_string(),
            length: bytes.len(),
            elements: Elements::Primitive {
                elem_size: 1,
                raw: RwLock::new(bytes.to_vec()),
            },
        }
    }

    /// Creates a reference array of objects of class `component`.
    pub fn of_class(component: &str, length: usize) -> Self {
        Self::new(FieldType::Object(component.to_string()), length)
    }

    /// Number of elements.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Element type.
    pub fn component(&self) -> &FieldType {
        &self.component
    }

    /// Array class name, e.g. `[B` or `[Ljava/lang/String;`.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    fn check_index(&self, index: i32) -> Result<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.length)
            .ok_or(RuntimeError::ArrayIndexOutOfBounds {
                index,
                length: self.length,
            })
    }

    /// Reads element `index`, widened to its slot representation.
    pub fn read(&self, index: i32) -> Result<Value> {
        let idx = self.check_index(index)?;
        match &self.elements {
            Elements::Reference(refs) => Ok(refs.read()[idx].clone()),
            Elements::Primitive { elem_size, raw } => {
                let raw = raw.read();
                let bytes = &raw[idx * elem_size..(idx + 1) * elem_size];
                Ok(decode(&self.component, bytes))
            }
        }
    }

    /// Writes element `index`, narrowing ints to the component width.
    pub fn write(&self, index: i32, value: Value) -> Result<()> {
        let idx = self.check_index(index)?;
        match &self.elements {
            Elements::Reference(refs) => {
                value.as_object()?;
                refs.write()[idx] = value;
            }
            Elements::Primitive { elem_size, raw } => {
                let encoded = encode(&self.component, &value)?;
                let mut raw = raw.write();
                raw[idx * elem_size..(idx + 1) * elem_size].copy_from_slice(&encoded);
            }
        }
        Ok(())
    }

    /// Copies the contents of a `byte[]` or `boolean[]`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match (&self.component, &self.elements) {
            (FieldType::Byte | FieldType::Boolean, Elements::Primitive { raw, .. }) => {
                Ok(raw.read().clone())
            }
            _ => Err(RuntimeError::TypeMismatch {
                expected: "byte[]",
                found: "array",
            }),
        }
    }
}

fn decode(component: &FieldType, bytes: &[u8]) -> Value {
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    match component {
        FieldType::Byte => Value::Int(i32::from(buf[0] as i8)),
        FieldType::Boolean => Value::Int(i32::from(buf[0])),
        FieldType::Char => Value::Int(i32::from(u16::from_le_bytes([buf[0], buf[1]]))),
        FieldType::Short => Value::Int(i32::from(i16::from_le_bytes([buf[0], buf[1]]))),
        FieldType::Int => Value::Int(i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
        FieldType::Float => Value::Float(f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
        FieldType::Long => Value::Long(i64::from_le_bytes(buf)),
        FieldType::Double => Value::Double(f64::from_le_bytes(buf)),
        FieldType::Object(_) | FieldType::Array(_) => Value::Null,
    }
}

fn encode(component: &FieldType, value: &Value) -> Result<Vec<u8>> {
    Ok(match component {
        FieldType::Byte | FieldType::Boolean => vec![value.as_int()? as u8],
        FieldType::Char | FieldType::Short => (value.as_int()? as u16).to_le_bytes().to_vec(),
        FieldType::Int => value.as_int()?.to_le_bytes().to_vec(),
        FieldType::Float => value.as_float()?.to_le_bytes().to_vec(),
        FieldType::Long => value.as_long()?.to_le_bytes().to_vec(),
        FieldType::Double => value.as_double()?.to_le_bytes().to_vec(),
        FieldType::Object(_) | FieldType::Array(_) => {
            return Err(RuntimeError::TypeMismatch {
                expected: "primitive",
                found: value.kind(),
            });
        }
    })
}
