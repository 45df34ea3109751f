// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Runtime class metadata and field layout.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::descriptor::{FieldType, MethodDescriptor};
use super::init::{InitOnce, InitState};
use super::value::Value;
use crate::error::{Result, RuntimeError};

/// Access flags shared by classes, fields and methods (JVMS §4.1, §4.5, §4.6).
pub mod access {
    /// `public`
    pub const ACC_PUBLIC: u16 = 0x0001;
    /// `private`
    pub const ACC_PRIVATE: u16 = 0x0002;
    /// `protected`
    pub const ACC_PROTECTED: u16 = 0x0004;
    /// `static`
    pub const ACC_STATIC: u16 = 0x0008;
    /// `final`
    pub const ACC_FINAL: u16 = 0x0010;
    /// `native`
    pub const ACC_NATIVE: u16 = 0x0100;
}

use access::{ACC_FINAL, ACC_NATIVE, ACC_STATIC};

/// A resolved field.
#[derive(Debug, Clone)]
pub struct RuntimeField {
    /// Field name
    pub name: String,
    /// Field descriptor text
    pub descriptor: String,
    /// Parsed descriptor
    pub field_type: FieldType,
    /// Access flags
    pub access_flags: u16,
    /// Byte offset in the instance (or static) layout
    pub offset: u32,
    /// Index into the instance (or static) slot table
    pub slot: usize,
}

impl RuntimeField {
    /// Returns true for class-level fields.
    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }

    /// Bytes this field occupies in the layout.
    pub fn size_in_bytes(&self) -> u32 {
        self.field_type.size_in_bytes()
    }
}

/// A resolved method.
#[derive(Debug, Clone)]
pub struct RuntimeMethod {
    /// Method name
    pub name: String,
    /// Method descriptor text
    pub descriptor: String,
    /// Parsed descriptor
    pub signature: MethodDescriptor,
    /// Access flags
    pub access_flags: u16,
    /// Local slots taken by arguments, including `this` for instance methods
    pub arg_slots: usize,
}

impl RuntimeMethod {
    /// Returns true if the body is supplied by the host.
    pub fn is_native(&self) -> bool {
        self.access_flags & ACC_NATIVE != 0
    }

    /// Returns true for class-level methods.
    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }
}

type HostInitFn = dyn Fn(&RuntimeClass) -> Result<()> + Send + Sync;

/// Static initialization supplied by the host for a host-backed class.
///
/// Runs under the class's init guard, before any interpreted `<clinit>`.
#[derive(Clone)]
pub struct HostInit(Arc<HostInitFn>);

impl fmt::Debug for HostInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostInit")
    }
}

/// A loaded class.
///
/// Instance fields are laid out in declaration order with byte offsets
/// taken from their descriptor sizes; static fields get a separate table
/// owned by the class.
#[derive(Debug)]
pub struct RuntimeClass {
    name: String,
    super_name: Option<String>,
    access_flags: u16,
    fields: Vec<RuntimeField>,
    methods: Vec<RuntimeMethod>,
    instance_size: u32,
    instance_slots: usize,
    statics: RwLock<Vec<Value>>,
    host_init: Option<HostInit>,
    init: InitOnce<()>,
}

impl RuntimeClass {
    /// Starts building a class named `name` (internal form, `a/b/C`).
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            super_name: None,
            access_flags: 0,
            fields: Vec::new(),
            methods: Vec::new(),
            host_init: None,
        }
    }

    /// Internal class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Superclass name, `None` for `java/lang/Object`.
    pub fn super_name(&self) -> Option<&str> {
        self.super_name.as_deref()
    }

    /// Class access flags.
    pub fn access_flags(&self) -> u16 {
        self.access_flags
    }

    /// All declared fields.
    pub fn fields(&self) -> &[RuntimeField] {
        &self.fields
    }

    /// All declared methods.
    pub fn methods(&self) -> &[RuntimeMethod] {
        &self.methods
    }

    /// Size in bytes of one instance's field data.
    pub fn instance_size(&self) -> u32 {
        self.instance_size
    }

    /// Number of instance field slots.
    pub fn instance_slots(&self) -> usize {
        self.instance_slots
    }

    /// Looks up a declared field.
    pub fn find_field(&self, name: &str, descriptor: &str) -> Option<&RuntimeField> {
        self.fields
            .iter()
            .find(|f| f.name == name && f.descriptor == descriptor)
    }

    /// Looks up a declared field, failing with `NoSuchFieldError`.
    pub fn field(&self, name: &str, descriptor: &str) -> Result<&RuntimeField> {
        self.find_field(name, descriptor)
            .ok_or_else(|| RuntimeError::NoSuchField {
                class: self.name.clone(),
                name: name.to_string(),
                descriptor: descriptor.to_string(),
            })
    }

    /// Looks up a declared method.
    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&RuntimeMethod> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }

    /// Default values for a fresh instance's field slots.
    pub(crate) fn instance_defaults(&self) -> Vec<Value> {
        self.fields
            .iter()
            .filter(|f| !f.is_static())
            .map(|f| f.field_type.default_value())
            .collect()
    }

    /// Initialization phase of this class.
    pub fn init_state(&self) -> InitState {
        self.init.state()
    }

    /// Runs the class's static initialization exactly once, the first time
    /// any caller asks: the host initializer if one is attached, then
    /// `clinit`.
    ///
    /// Concurrent callers block until the first run finishes; a failed run
    /// leaves the class permanently unusable and every caller gets the same
    /// error.
    pub fn ensure_initialized<F>(&self, clinit: F) -> Result<()>
    where
        F: FnOnce(&RuntimeClass) -> Result<()>,
    {
        self.init.get_or_try_init(|| {
            if let Some(HostInit(host)) = &self.host_init {
                host(self)?;
            }
            clinit(self)
        })?;
        Ok(())
    }

    /// Initializes a class that has no interpreted `<clinit>`.
    pub fn initialize(&self) -> Result<()> {
        self.ensure_initialized(|_| Ok(()))
    }

    /// Reads a static field.
    pub fn get_static(&self, field: &RuntimeField) -> Result<Value> {
        let field = self.check_static(field)?;
        Ok(self.statics.read()[field.slot].clone())
    }

    /// Writes a static field.
    ///
    /// `final` statics are writable only by the thread running this class's
    /// initializer.
    pub fn put_static(&self, field: &RuntimeField, value: Value) -> Result<()> {
        let field = self.check_static(field)?;
        if field.access_flags & ACC_FINAL != 0 && !self.init.is_initializing_thread() {
            return Err(RuntimeError::FinalField {
                class: self.name.clone(),
                name: field.name.clone(),
            });
        }
        self.statics.write()[field.slot] = value;
        Ok(())
    }

    fn check_static(&self, field: &RuntimeField) -> Result<&RuntimeField> {
        self.find_field(&field.name, &field.descriptor)
            .filter(|f| f.is_static() && f.slot == field.slot)
            .ok_or_else(|| RuntimeError::NoSuchField {
                class: self.name.clone(),
                name: field.name.clone(),
                descriptor: field.descriptor.clone(),
            })
    }
}

/// Builder for [`RuntimeClass`], used by class loaders and by the runtime
/// for its host-backed classes.
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    name: String,
    super_name: Option<String>,
    access_flags: u16,
    fields: Vec<(String, String, u16)>,
    methods: Vec<(String, String, u16)>,
    host_init: Option<HostInit>,
}

impl ClassBuilder {
    /// Sets the superclass.
    pub fn super_class(mut self, name: impl Into<String>) -> Self {
        self.super_name = Some(name.into());
        self
    }

    /// Sets the class access flags.
    pub fn access(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    /// Declares a field.
    pub fn field(mut self, name: &str, descriptor: &str, flags: u16) -> Self {
        self.fields
            .push((name.to_string(), descriptor.to_string(), flags));
        self
    }

    /// Declares a method.
    pub fn method(mut self, name: &str, descriptor: &str, flags: u16) -> Self {
        self.methods
            .push((name.to_string(), descriptor.to_string(), flags));
        self
    }

    /// Attaches host-side static initialization.
    pub fn host_init<F>(mut self, init: F) -> Self
    where
        F: Fn(&RuntimeClass) -> Result<()> + Send + Sync + 'static,
    {
        self.host_init = Some(HostInit(Arc::new(init)));
        self
    }

    /// Parses descriptors and computes the field layout.
    pub fn build(self) -> Result<RuntimeClass> {
        let mut fields = Vec::with_capacity(self.fields.len());
        let (mut instance_offset, mut instance_slots) = (0u32, 0usize);
        let (mut static_offset, mut static_defaults) = (0u32, Vec::new());

        for (name, descriptor, access_flags) in self.fields {
            let field_type = FieldType::parse(&descriptor)?;
            let size = field_type.size_in_bytes();
            let (offset, slot) = if access_flags & ACC_STATIC != 0 {
                static_defaults.push(field_type.default_value());
                static_offset += size;
                (static_offset - size, static_defaults.len() - 1)
            } else {
                instance_offset += size;
                instance_slots += 1;
                (instance_offset - size, instance_slots - 1)
            };
            fields.push(RuntimeField {
                name,
                descriptor,
                field_type,
                access_flags,
                offset,
                slot,
            });
        }

        let methods = self
            .methods
            .into_iter()
            .map(|(name, descriptor, access_flags)| -> Result<RuntimeMethod> {
                let signature = MethodDescriptor::parse(&descriptor)?;
                let this_slot = usize::from(access_flags & ACC_STATIC == 0);
                Ok(RuntimeMethod {
                    arg_slots: signature.param_slots() + this_slot,
                    name,
                    descriptor,
                    signature,
                    access_flags,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RuntimeClass {
            init: InitOnce::named(self.name.clone()),
            name: self.name,
            super_name: self.super_name,
            access_flags: self.access_flags,
            fields,
            methods,
            instance_size: instance_offset,
            instance_slots,
            statics: RwLock::new(static_defaults),
            host_init: self.host_init,
        })
    }
}
