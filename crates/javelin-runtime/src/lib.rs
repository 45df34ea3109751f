// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # javelin-runtime
//!
//! Host-implemented pieces of a small JVM interpreter's standard library.
//!
//! ## Overview
//!
//! This crate provides:
//! - An immutable byte-backed `java/lang/String` with native `length`,
//!   `charAt`, `equals` and `getBytes`
//! - A native method table keyed by class, name and descriptor
//! - `System.out`, bound exactly once by a guarded static initializer
//! - Class metadata, objects, arrays and a method area for the interpreter
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use javelin_runtime::{Runtime, RuntimeConfig, Value};
//!
//! let runtime = Runtime::new(RuntimeConfig::default())?;
//! let hi = runtime.new_string("HI");
//! let len = runtime.invoke_native("java/lang/String", "length", "()I", &[hi])?;
//! assert_eq!(len, Some(Value::Int(2)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtins;
pub mod config;
pub mod error;
pub mod programs;
pub mod runtime;

use std::sync::Arc;

use tracing::{debug, info};

pub use builtins::{NativeKey, NativeRegistry};
pub use config::{OutputTarget, RuntimeConfig, SystemInit};
pub use error::{InitError, Result, RuntimeError};
pub use runtime::{HeapObject, JString, ObjectRef, RuntimeArray, Value};

use runtime::class::access::*;
use runtime::{MethodArea, PrintStream, RuntimeClass, RuntimeObject, SinkFactory, SystemClass};

/// A runtime instance: loaded classes, native table and `System` state.
#[derive(Debug)]
pub struct Runtime {
    config: RuntimeConfig,
    method_area: MethodArea,
    natives: NativeRegistry,
    system: SystemClass,
}

impl Runtime {
    /// Creates a runtime writing `System.out` to the configured target.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let factory = config.output.sink_factory();
        Self::with_sink_factory(config, factory)
    }

    /// Creates a runtime whose `System.out` sink comes from `factory`.
    ///
    /// With [`SystemInit::Eager`] the sink is built before this returns and a
    /// failure is reported here.
    pub fn with_sink_factory(config: RuntimeConfig, factory: SinkFactory) -> Result<Self> {
        let natives = NativeRegistry::with_builtins();
        let method_area = MethodArea::new();
        let system = SystemClass::new(factory)?;

        method_area.store(Arc::new(
            RuntimeClass::builder("java/lang/Object")
                .access(ACC_PUBLIC)
                .method("<init>", "()V", ACC_PUBLIC)
                .build()?,
        ));
        method_area.store(Arc::new(host_class(JString::CLASS_NAME, &natives).build()?));
        method_area.store(Arc::new(host_class(PrintStream::CLASS_NAME, &natives).build()?));
        method_area.store(Arc::clone(system.class()));

        let runtime = Self {
            config,
            method_area,
            natives,
            system,
        };
        debug!(
            classes = runtime.method_area.len(),
            natives = runtime.natives.len(),
            "runtime created"
        );

        if runtime.config.system_init == SystemInit::Eager {
            runtime.system.initialize()?;
        }
        Ok(runtime)
    }

    /// Active configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Loaded classes.
    pub fn method_area(&self) -> &MethodArea {
        &self.method_area
    }

    /// Native method table.
    pub fn natives(&self) -> &NativeRegistry {
        &self.natives
    }

    /// `java/lang/System` state.
    pub fn system(&self) -> &SystemClass {
        &self.system
    }

    /// `System.out`, initializing `java/lang/System` on first use.
    pub fn system_out(&self) -> Result<Value> {
        Ok(Value::Ref(Arc::clone(self.system.out()?)))
    }

    /// Executes `getstatic`, running the owning class's initializer first.
    pub fn get_static(&self, class: &str, name: &str, descriptor: &str) -> Result<Value> {
        let owner = self.method_area.class(class)?;
        owner.initialize()?;
        let field = owner.field(name, descriptor)?;
        owner.get_static(field)
    }

    /// Executes `new`: initializes the class and allocates an instance.
    ///
    /// Host-backed strings are immutable, so `new java/lang/String` yields an
    /// empty string and the `<init>` natives return the constructed string.
    /// The interpreter replaces the allocated reference with that return
    /// value when it completes the `invokespecial`.
    pub fn allocate(&self, class: &str) -> Result<Value> {
        let owner = self.method_area.class(class)?;
        owner.initialize()?;
        match owner.name() {
            JString::CLASS_NAME => Ok(Value::string(JString::new())),
            PrintStream::CLASS_NAME | SystemClass::CLASS_NAME => Err(RuntimeError::TypeMismatch {
                expected: "constructible class",
                found: "host-backed object",
            }),
            _ => Ok(Value::new_ref(HeapObject::Instance(RuntimeObject::new(owner)))),
        }
    }

    /// Calls a registered native method.
    pub fn invoke_native(
        &self,
        class: &str,
        name: &str,
        descriptor: &str,
        args: &[Value],
    ) -> Result<Option<Value>> {
        if self.config.trace_natives {
            info!(native = %NativeKey::new(class, name, descriptor), args = args.len(), "native call");
        }
        self.natives.invoke(class, name, descriptor, args)
    }

    /// Allocates a string holding the bytes of `s`.
    pub fn new_string(&self, s: &str) -> Value {
        Value::string(JString::from(s))
    }

    /// Materializes command-line arguments as the `String[]` passed to `main`.
    pub fn build_args_array(&self, args: &[String]) -> Result<Value> {
        let array = RuntimeArray::of_class(JString::CLASS_NAME, args.len());
        for (index, arg) in args.iter().enumerate() {
            let index = i32::try_from(index).map_err(|_| RuntimeError::ArrayIndexOutOfBounds {
                index: i32::MAX,
                length: args.len(),
            })?;
            array.write(index, self.new_string(arg))?;
        }
        Ok(Value::new_ref(HeapObject::Array(array)))
    }
}

/// Metadata for a host-backed class whose native methods come from `natives`.
fn host_class(name: &str, natives: &NativeRegistry) -> runtime::ClassBuilder {
    natives
        .keys()
        .into_iter()
        .filter(|key| key.class == name)
        .fold(
            RuntimeClass::builder(name)
                .super_class("java/lang/Object")
                .access(ACC_PUBLIC),
            |builder, key| builder.method(&key.name, &key.descriptor, ACC_PUBLIC | ACC_NATIVE),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{BufferSink, InitState, Sink};

    fn buffered(config: RuntimeConfig) -> (Runtime, BufferSink) {
        let buffer = BufferSink::new();
        let sink = buffer.clone();
        let runtime = Runtime::with_sink_factory(
            config,
            Box::new(move || -> std::io::Result<Box<dyn Sink>> { Ok(Box::new(sink.clone())) }),
        )
        .unwrap();
        (runtime, buffer)
    }

    #[test]
    fn test_core_classes_loaded() {
        let (runtime, _) = buffered(RuntimeConfig::default());
        let area = runtime.method_area();
        assert!(area.contains("java/lang/Object"));
        assert!(area.contains("java/lang/System"));

        let string = area.class("java/lang/String").unwrap();
        let length = string.find_method("length", "()I").unwrap();
        assert!(length.is_native());
        assert_eq!(length.arg_slots, 1);

        let stream = area.class("java/io/PrintStream").unwrap();
        assert_eq!(stream.methods().len(), 8);
    }

    #[test]
    fn test_lazy_by_default() {
        let (runtime, _) = buffered(RuntimeConfig::default());
        assert_eq!(runtime.system().state(), InitState::Uninitialized);
        runtime
            .get_static("java/lang/System", "out", "Ljava/io/PrintStream;")
            .unwrap();
        assert_eq!(runtime.system().state(), InitState::Ready);
    }

    #[test]
    fn test_eager_init() {
        let config = RuntimeConfig {
            system_init: SystemInit::Eager,
            ..RuntimeConfig::default()
        };
        let (runtime, _) = buffered(config);
        assert_eq!(runtime.system().state(), InitState::Ready);
    }

    #[test]
    fn test_eager_init_failure_is_reported() {
        let config = RuntimeConfig {
            system_init: SystemInit::Eager,
            ..RuntimeConfig::default()
        };
        let err = Runtime::with_sink_factory(
            config,
            Box::new(|| -> std::io::Result<Box<dyn Sink>> {
                Err(std::io::Error::other("no console"))
            }),
        )
        .unwrap_err();
        assert!(matches!(err, RuntimeError::Initialization(InitError::Failed { .. })));
    }

    #[test]
    fn test_get_static_unknown() {
        let (runtime, _) = buffered(RuntimeConfig::default());
        assert!(matches!(
            runtime.get_static("demo/Missing", "x", "I"),
            Err(RuntimeError::ClassNotFound(_))
        ));
        assert!(matches!(
            runtime.get_static("java/lang/String", "x", "I"),
            Err(RuntimeError::NoSuchField { .. })
        ));
    }

    #[test]
    fn test_build_args_array() {
        let (runtime, _) = buffered(RuntimeConfig::default());
        let args = runtime
            .build_args_array(&["a".to_string(), "bc".to_string()])
            .unwrap();
        let Value::Ref(obj) = &args else {
            panic!("expected reference");
        };
        let HeapObject::Array(array) = &**obj else {
            panic!("expected array");
        };
        assert_eq!(array.class_name(), "[Ljava/lang/String;");
        assert_eq!(array.length(), 2);
        assert_eq!(
            array.read(1).unwrap().as_jstring().unwrap().as_bytes(),
            b"bc"
        );
    }

    #[test]
    fn test_println_through_system_out() {
        let (runtime, buffer) = buffered(RuntimeConfig::default());
        let out = runtime
            .get_static("java/lang/System", "out", "Ljava/io/PrintStream;")
            .unwrap();
        runtime
            .invoke_native(
                "java/io/PrintStream",
                "println",
                "(Ljava/lang/String;)V",
                &[out, runtime.new_string("hello")],
            )
            .unwrap();
        assert_eq!(buffer.text(), "hello\n");
    }
}
