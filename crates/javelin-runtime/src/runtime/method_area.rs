// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loaded classes, keyed by internal name.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::class::RuntimeClass;
use crate::error::{Result, RuntimeError};

/// Shared store of loaded classes.
#[derive(Debug, Default)]
pub struct MethodArea {
    classes: RwLock<FxHashMap<String, Arc<RuntimeClass>>>,
}

impl MethodArea {
    /// Creates an empty method area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a class, keeping the existing entry if the name is taken.
    ///
    /// Returns the class now registered under that name.
    pub fn store(&self, class: Arc<RuntimeClass>) -> Arc<RuntimeClass> {
        let mut classes = self.classes.write();
        let entry = classes
            .entry(class.name().to_string())
            .or_insert_with(|| {
                debug!(class = class.name(), "stored class");
                Arc::clone(&class)
            });
        Arc::clone(entry)
    }

    /// Looks up a class.
    pub fn get(&self, name: &str) -> Option<Arc<RuntimeClass>> {
        self.classes.read().get(name).cloned()
    }

    /// Looks up a class, failing with `NoClassDefFoundError`.
    pub fn class(&self, name: &str) -> Result<Arc<RuntimeClass>> {
        self.get(name)
            .ok_or_else(|| RuntimeError::ClassNotFound(name.to_string()))
    }

    /// Returns true if a class with this name is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    /// Number of loaded classes.
    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    /// Returns true if nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> Arc<RuntimeClass> {
        Arc::new(RuntimeClass::builder(name).build().unwrap())
    }

    #[test]
    fn test_store_and_lookup() {
        let area = MethodArea::new();
        assert!(area.is_empty());

        area.store(class("demo/Main"));
        assert!(area.contains("demo/Main"));
        assert_eq!(area.class("demo/Main").unwrap().name(), "demo/Main");
        assert_eq!(area.len(), 1);
    }

    #[test]
    fn test_missing_class() {
        let area = MethodArea::new();
        assert_eq!(
            area.class("demo/Missing").unwrap_err(),
            RuntimeError::ClassNotFound("demo/Missing".to_string())
        );
    }

    #[test]
    fn test_first_store_wins() {
        let area = MethodArea::new();
        let first = class("demo/Main");
        let kept = area.store(Arc::clone(&first));
        let again = area.store(class("demo/Main"));
        assert!(Arc::ptr_eq(&kept, &first));
        assert!(Arc::ptr_eq(&again, &first));
    }
}
