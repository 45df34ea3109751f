// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Host-backed `java/lang/System`, the holder of the `out` singleton.

use std::fmt;
use std::io;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::class::{RuntimeClass, access::*};
use super::init::InitState;
use super::print_stream::{PrintStream, Sink};
use super::value::{HeapObject, ObjectRef, Value};
use crate::error::Result;

/// Builds the sink behind `System.out`. Called at most once per holder.
pub type SinkFactory = Box<dyn Fn() -> io::Result<Box<dyn Sink>> + Send + Sync>;

/// Static state of `java/lang/System`.
///
/// The class's own init guard is the only trigger: its host initializer
/// builds the stream, stores it in the `out` static and publishes it here.
/// Whether a caller goes through [`SystemClass::out`] or through
/// `ensure_initialized` plus `get_static` on the class, it sees the same
/// object, and the `final` slot cannot be reassigned afterwards.
pub struct SystemClass {
    class: Arc<RuntimeClass>,
    out: Arc<OnceLock<ObjectRef>>,
}

impl SystemClass {
    /// Internal class name.
    pub const CLASS_NAME: &'static str = "java/lang/System";
    /// Name of the output stream field.
    pub const OUT_FIELD: &'static str = "out";
    /// Descriptor of the output stream field.
    pub const OUT_DESCRIPTOR: &'static str = "Ljava/io/PrintStream;";

    /// Creates the holder; `factory` runs during static initialization.
    pub fn new(factory: SinkFactory) -> Result<Self> {
        let out = Arc::new(OnceLock::new());
        let published = Arc::clone(&out);

        let class = RuntimeClass::builder(Self::CLASS_NAME)
            .super_class("java/lang/Object")
            .access(ACC_PUBLIC | ACC_FINAL)
            .field(Self::OUT_FIELD, Self::OUT_DESCRIPTOR, ACC_PUBLIC | ACC_STATIC | ACC_FINAL)
            .method("<init>", "()V", ACC_PRIVATE)
            .method("<clinit>", "()V", ACC_STATIC)
            .host_init(move |class| {
                let sink = factory()?;
                let stream: ObjectRef = Arc::new(HeapObject::PrintStream(PrintStream::new(sink)));
                let field = class.field(Self::OUT_FIELD, Self::OUT_DESCRIPTOR)?;
                class.put_static(field, Value::Ref(Arc::clone(&stream)))?;
                // Only the initializing thread gets here, once.
                let _ = published.set(stream);
                debug!("bound System.out");
                Ok(())
            })
            .build()?;

        Ok(Self {
            class: Arc::new(class),
            out,
        })
    }

    /// Class metadata for the method area.
    pub fn class(&self) -> &Arc<RuntimeClass> {
        &self.class
    }

    /// Initialization phase of the class.
    pub fn state(&self) -> InitState {
        self.class.init_state()
    }

    /// Runs the static initializer if it has not run yet.
    pub fn initialize(&self) -> Result<()> {
        self.class.initialize()
    }

    /// The `System.out` stream, initializing the class on first use.
    pub fn out(&self) -> Result<&ObjectRef> {
        if let Some(stream) = self.out.get() {
            return Ok(stream);
        }
        self.class.initialize()?;
        match self.out.get() {
            Some(stream) => Ok(stream),
            // A successful initialization always publishes the stream.
            None => unreachable!("{} initialized without binding out", Self::CLASS_NAME),
        }
    }
}

impl fmt::Debug for SystemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemClass")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
