// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Native method table and the host implementations behind it.
//!
//! A method flagged `ACC_NATIVE` has no bytecode. The interpreter asks the
//! [`NativeRegistry`] to [`bind`](NativeRegistry::bind) it and, for a native
//! binding, calls the host function with the receiver and arguments instead
//! of pushing an interpreted frame. The host function's return value or
//! error is handed back exactly as an interpreted method's would be.
//!
//! Calling convention: `args` holds one [`Value`] per parameter, preceded by
//! the receiver for instance methods. A `long` or `double` argument is a
//! single `Value`.

pub mod print_stream;
pub mod string;

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{Result, RuntimeError};
use crate::runtime::class::{RuntimeClass, RuntimeMethod};
use crate::runtime::descriptor::MethodDescriptor;
use crate::runtime::print_stream::PrintStream;
use crate::runtime::string::JString;
use crate::runtime::value::{HeapObject, Value};

/// A host implementation of a native method.
///
/// Returns `None` for `void` methods.
pub type NativeMethod = fn(&mut NativeFrame<'_>, &[Value]) -> Result<Option<Value>>;

/// Identity of a native method: owning class, name and descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeKey {
    /// Owning class, internal form
    pub class: String,
    /// Method name
    pub name: String,
    /// Method descriptor
    pub descriptor: String,
}

impl NativeKey {
    /// Creates a key.
    pub fn new(class: &str, name: &str, descriptor: &str) -> Self {
        Self {
            class: class.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        }
    }
}

impl fmt::Display for NativeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}", self.descriptor, self.class, self.name)
    }
}

/// Context handed to a native method for the duration of one call.
#[derive(Debug)]
pub struct NativeFrame<'a> {
    key: &'a NativeKey,
}

impl<'a> NativeFrame<'a> {
    /// The method being executed.
    pub fn key(&self) -> &'a NativeKey {
        self.key
    }

    /// The receiver of an instance method.
    pub fn this<'v>(&self, args: &'v [Value]) -> Result<&'v Value> {
        match args.first() {
            Some(Value::Null) | None => Err(RuntimeError::null_pointer(format!(
                "cannot invoke {}.{} on null",
                self.key.class, self.key.name
            ))),
            Some(this) => Ok(this),
        }
    }

    /// The receiver, which must be a string.
    pub fn this_string<'v>(&self, args: &'v [Value]) -> Result<&'v JString> {
        let this = self.this(args)?;
        this.as_jstring().ok_or(RuntimeError::TypeMismatch {
            expected: "string",
            found: this.kind(),
        })
    }

    /// The receiver, which must be a print stream.
    pub fn this_print_stream<'v>(&self, args: &'v [Value]) -> Result<&'v PrintStream> {
        let this = self.this(args)?;
        match this {
            Value::Ref(obj) => match &**obj {
                HeapObject::PrintStream(stream) => Ok(stream),
                other => Err(RuntimeError::TypeMismatch {
                    expected: "print stream",
                    found: other.kind(),
                }),
            },
            other => Err(RuntimeError::TypeMismatch {
                expected: "print stream",
                found: other.kind(),
            }),
        }
    }

    /// Argument `index` (0 is the receiver for instance methods).
    pub fn arg<'v>(&self, args: &'v [Value], index: usize) -> Result<&'v Value> {
        args.get(index).ok_or_else(|| RuntimeError::ArgumentCount {
            key: self.key.to_string(),
            expected: index + 1,
            actual: args.len(),
        })
    }
}

/// A registered native method.
#[derive(Debug, Clone)]
pub struct NativeEntry {
    key: NativeKey,
    is_static: bool,
    arg_count: usize,
    func: NativeMethod,
}

impl NativeEntry {
    /// The method's identity.
    pub fn key(&self) -> &NativeKey {
        &self.key
    }

    /// Returns true for class-level methods.
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Number of `Value`s the method expects, receiver included.
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    /// Calls the host function.
    pub fn invoke(&self, args: &[Value]) -> Result<Option<Value>> {
        if args.len() != self.arg_count {
            return Err(RuntimeError::ArgumentCount {
                key: self.key.to_string(),
                expected: self.arg_count,
                actual: args.len(),
            });
        }
        debug!(native = %self.key, "invoking native method");
        let mut frame = NativeFrame { key: &self.key };
        (self.func)(&mut frame, args)
    }
}

/// How the interpreter must run a resolved method.
#[derive(Debug, Clone)]
pub enum Invocation<'r> {
    /// Execute the method's bytecode
    Interpreted,
    /// Call the host function instead
    Native(&'r NativeEntry),
}

/// Table of host-implemented methods keyed by class, name and descriptor.
#[derive(Debug, Default)]
pub struct NativeRegistry {
    methods: FxHashMap<NativeKey, NativeEntry>,
}

impl NativeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in native method.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    /// Registers (or replaces) a host function.
    pub fn register(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
        is_static: bool,
        func: NativeMethod,
    ) -> Result<()> {
        let signature = MethodDescriptor::parse(descriptor)?;
        let key = NativeKey::new(class, name, descriptor);
        let entry = NativeEntry {
            key: key.clone(),
            is_static,
            arg_count: signature.params.len() + usize::from(!is_static),
            func,
        };
        self.methods.insert(key, entry);
        Ok(())
    }

    /// Looks up a host function.
    pub fn resolve(&self, class: &str, name: &str, descriptor: &str) -> Option<&NativeEntry> {
        self.methods.get(&NativeKey::new(class, name, descriptor))
    }

    /// Decides how `method` of `class` must be executed.
    ///
    /// A native method without a registration is an `UnsatisfiedLinkError`.
    pub fn bind(&self, class: &RuntimeClass, method: &RuntimeMethod) -> Result<Invocation<'_>> {
        if !method.is_native() {
            return Ok(Invocation::Interpreted);
        }
        self.resolve(class.name(), &method.name, &method.descriptor)
            .map(Invocation::Native)
            .ok_or_else(|| {
                RuntimeError::UnsatisfiedLink(
                    NativeKey::new(class.name(), &method.name, &method.descriptor).to_string(),
                )
            })
    }

    /// Resolves and calls a host function.
    pub fn invoke(
        &self,
        class: &str,
        name: &str,
        descriptor: &str,
        args: &[Value],
    ) -> Result<Option<Value>> {
        let entry = self.resolve(class, name, descriptor).ok_or_else(|| {
            RuntimeError::UnsatisfiedLink(NativeKey::new(class, name, descriptor).to_string())
        })?;
        entry.invoke(args)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<&NativeKey> {
        let mut keys: Vec<_> = self.methods.keys().collect();
        keys.sort();
        keys
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Register all built-in native methods.
pub fn register_builtins(registry: &mut NativeRegistry) {
    for (class, name, descriptor, func) in string::NATIVES
        .iter()
        .chain(print_stream::NATIVES.iter())
    {
        // Built-in descriptors are constants; a parse failure is a typo here.
        if let Err(err) = registry.register(class, name, descriptor, false, *func) {
            unreachable!("built-in native {class}.{name}{descriptor}: {err}");
        }
    }
}
