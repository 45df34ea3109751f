// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Runtime data model: classes, objects, values and the host-backed
//! `java.lang` types.

pub mod array;
pub mod class;
pub mod descriptor;
pub mod init;
pub mod method_area;
pub mod object;
pub mod print_stream;
pub mod string;
pub mod system;
pub mod value;

pub use array::RuntimeArray;
pub use class::{ClassBuilder, RuntimeClass, RuntimeField, RuntimeMethod};
pub use descriptor::{FieldType, MethodDescriptor};
pub use init::{InitOnce, InitState};
pub use method_area::MethodArea;
pub use object::RuntimeObject;
pub use print_stream::{BufferSink, PrintStream, Sink, StderrSink, StdoutSink};
pub use string::JString;
pub use system::{SinkFactory, SystemClass};
pub use value::{HeapObject, ObjectRef, Value};
