// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Runtime configuration.

use serde::{Deserialize, Serialize};

use crate::runtime::print_stream::{Sink, StderrSink, StdoutSink};
use crate::runtime::system::SinkFactory;

/// When `java/lang/System` runs its static initializer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemInit {
    /// On the first `System.out` access
    #[default]
    Lazy,
    /// While the runtime is being constructed
    Eager,
}

/// Where `System.out` writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    /// Process standard output
    #[default]
    Stdout,
    /// Process standard error
    Stderr,
}

impl OutputTarget {
    /// Factory producing the sink for this target.
    pub fn sink_factory(self) -> SinkFactory {
        match self {
            OutputTarget::Stdout => {
                Box::new(|| -> std::io::Result<Box<dyn Sink>> { Ok(Box::new(StdoutSink)) })
            }
            OutputTarget::Stderr => {
                Box::new(|| -> std::io::Result<Box<dyn Sink>> { Ok(Box::new(StderrSink)) })
            }
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// When `System.out` is bound
    pub system_init: SystemInit,
    /// Where `System.out` writes
    pub output: OutputTarget,
    /// Log every native call at `info` level
    pub trace_natives: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.system_init, SystemInit::Lazy);
        assert_eq!(config.output, OutputTarget::Stdout);
        assert!(!config.trace_natives);
    }

    #[test]
    fn test_partial_json() {
        let config: RuntimeConfig = serde_json::from_str(r#"{"system_init": "eager"}"#).unwrap();
        assert_eq!(config.system_init, SystemInit::Eager);
        assert_eq!(config.output, OutputTarget::Stdout);
    }

    #[test]
    fn test_json_round_trip() {
        let config = RuntimeConfig {
            system_init: SystemInit::Eager,
            output: OutputTarget::Stderr,
            trace_natives: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"system_init":"eager","output":"stderr","trace_natives":true}"#
        );
        assert_eq!(serde_json::from_str::<RuntimeConfig>(&json).unwrap(), config);
    }

    #[test]
    fn test_unknown_target_rejected() {
        assert!(serde_json::from_str::<RuntimeConfig>(r#"{"output": "printer"}"#).is_err());
    }
}
