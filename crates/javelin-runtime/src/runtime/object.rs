// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Instances of interpreted classes.

use std::sync::Arc;

use parking_lot::RwLock;

use super::class::{RuntimeClass, RuntimeField};
use super::value::Value;
use crate::error::{Result, RuntimeError};

/// An instance of a [`RuntimeClass`], one slot per instance field.
#[derive(Debug)]
pub struct RuntimeObject {
    class: Arc<RuntimeClass>,
    fields: RwLock<Vec<Value>>,
}

impl RuntimeObject {
    /// Allocates an instance with every field at its default value.
    pub fn new(class: Arc<RuntimeClass>) -> Self {
        let fields = RwLock::new(class.instance_defaults());
        Self { class, fields }
    }

    /// The object's class.
    pub fn class(&self) -> &Arc<RuntimeClass> {
        &self.class
    }

    /// Reads an instance field.
    pub fn read_field(&self, field: &RuntimeField) -> Result<Value> {
        self.check_field(field)?;
        Ok(self.fields.read()[field.slot].clone())
    }

    /// Writes an instance field.
    pub fn write_field(&self, field: &RuntimeField, value: Value) -> Result<()> {
        self.check_field(field)?;
        self.fields.write()[field.slot] = value;
        Ok(())
    }

    fn check_field(&self, field: &RuntimeField) -> Result<()> {
        let declared = self
            .class
            .find_field(&field.name, &field.descriptor)
            .is_some_and(|f| !f.is_static() && f.slot == field.slot);
        if declared {
            Ok(())
        } else {
            Err(RuntimeError::NoSuchField {
                class: self.class.name().to_string(),
                name: field.name.clone(),
                descriptor: field.descriptor.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::class::access::*;
    use crate::runtime::string::JString;

    fn holder() -> Arc<RuntimeClass> {
        Arc::new(
            RuntimeClass::builder("test/Holder")
                .field("id", "I", ACC_PRIVATE)
                .field("shared", "I", ACC_STATIC)
                .field("name", "Ljava/lang/String;", ACC_PRIVATE | ACC_FINAL)
                .field("big", "J", ACC_PRIVATE)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_defaults() {
        let class = holder();
        let obj = RuntimeObject::new(Arc::clone(&class));
        assert_eq!(obj.read_field(class.field("id", "I").unwrap()).unwrap(), Value::Int(0));
        assert!(obj
            .read_field(class.field("name", "Ljava/lang/String;").unwrap())
            .unwrap()
            .is_null());
        assert_eq!(obj.read_field(class.field("big", "J").unwrap()).unwrap(), Value::Long(0));
    }

    #[test]
    fn test_write_then_read() {
        let class = holder();
        let obj = RuntimeObject::new(Arc::clone(&class));
        let name = class.field("name", "Ljava/lang/String;").unwrap();
        let value = Value::string(JString::from("bob"));

        obj.write_field(name, value.clone()).unwrap();
        assert_eq!(obj.read_field(name).unwrap(), value);
    }

    #[test]
    fn test_static_field_is_not_an_instance_slot() {
        let class = holder();
        let obj = RuntimeObject::new(Arc::clone(&class));
        let shared = class.field("shared", "I").unwrap();
        assert!(matches!(
            obj.read_field(shared),
            Err(RuntimeError::NoSuchField { .. })
        ));
    }

    #[test]
    fn test_foreign_field_is_rejected() {
        let class = holder();
        let other = RuntimeClass::builder("test/Other")
            .field("x", "I", 0)
            .build()
            .unwrap();
        let obj = RuntimeObject::new(class);
        assert!(obj.read_field(other.field("x", "I").unwrap()).is_err());
    }
}
