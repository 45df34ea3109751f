// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the runtime substrate.

use thiserror::Error;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors raised by native methods, the method area and class initialization.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    /// `String.charAt` outside `[0, length)`
    #[error("java/lang/StringIndexOutOfBoundsException: index {index}, length {length}")]
    StringIndexOutOfBounds {
        /// Requested index
        index: i32,
        /// Length of the string
        length: usize,
    },

    /// Array element access outside `[0, length)`
    #[error("java/lang/ArrayIndexOutOfBoundsException: index {index}, length {length}")]
    ArrayIndexOutOfBounds {
        /// Requested index
        index: i32,
        /// Length of the array
        length: usize,
    },

    /// A null reference was dereferenced
    #[error("java/lang/NullPointerException: {0}")]
    NullPointer(String),

    /// A slot held a value of the wrong kind
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the callee needed
        expected: &'static str,
        /// What it got
        found: &'static str,
    },

    /// A native method has no host implementation registered
    #[error("java/lang/UnsatisfiedLinkError: {0}")]
    UnsatisfiedLink(String),

    /// A native method was invoked with the wrong number of slots
    #[error("{key}: expected {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// Native key being invoked
        key: String,
        /// Count implied by the descriptor
        expected: usize,
        /// Count supplied by the caller
        actual: usize,
    },

    /// A class is not present in the method area
    #[error("java/lang/NoClassDefFoundError: {0}")]
    ClassNotFound(String),

    /// A field lookup failed
    #[error("java/lang/NoSuchFieldError: {class}.{name}:{descriptor}")]
    NoSuchField {
        /// Owning class
        class: String,
        /// Field name
        name: String,
        /// Field descriptor
        descriptor: String,
    },

    /// A `final` field was written outside its class's initializer
    #[error("java/lang/IllegalAccessError: {class}.{name} is final")]
    FinalField {
        /// Owning class
        class: String,
        /// Field name
        name: String,
    },

    /// A value does not fit the JVM's `int`-sized limits
    #[error("java/lang/OutOfMemoryError: {0}")]
    OutOfMemory(String),

    /// A descriptor could not be parsed
    #[error("invalid descriptor '{0}'")]
    InvalidDescriptor(String),

    /// Static initialization of a class failed
    #[error(transparent)]
    Initialization(#[from] InitError),

    /// The output sink rejected a write
    #[error("I/O error: {0}")]
    Io(String),
}

impl RuntimeError {
    /// Returns true when the interpreter may surface this failure to
    /// interpreted code as a catchable exception.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RuntimeError::Initialization(_))
    }

    /// Create a null pointer error
    pub fn null_pointer(msg: impl Into<String>) -> Self {
        Self::NullPointer(msg.into())
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Failure of a one-shot static initializer.
///
/// Cloned to every thread that observes the failed initialization, so all
/// observers see the same error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InitError {
    /// The initializer returned an error
    #[error("java/lang/ExceptionInInitializerError: {target}: {reason}")]
    Failed {
        /// What was being initialized
        target: String,
        /// Why it failed
        reason: String,
    },

    /// The initializer panicked before finishing
    #[error("java/lang/ExceptionInInitializerError: {0}: initializer panicked")]
    Panicked(String),

    /// The initializing thread triggered its own initialization again
    #[error("recursive initialization of {0}")]
    Reentrant(String),
}
