//! Run configuration shared by every combinator

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for a [`Flow`]
///
/// Deserializes with defaults for missing fields, so it can be embedded in
/// a host application's own config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Name attached to every log event a run emits
    #[serde(default = "default_name")]
    pub name: String,
    /// Log a warning when a completion signal is dropped without reporting
    #[serde(default = "default_warn_on_abandoned")]
    pub warn_on_abandoned: bool,
}

fn default_name() -> String {
    "flow".to_string()
}

fn default_warn_on_abandoned() -> bool {
    true
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            warn_on_abandoned: default_warn_on_abandoned(),
        }
    }
}

impl FlowConfig {
    /// Create a config with the given run name and default settings
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Toggle the abandoned-signal warning
    #[must_use]
    pub fn with_warn_on_abandoned(mut self, enabled: bool) -> Self {
        self.warn_on_abandoned = enabled;
        self
    }
}

/// Entry point for running combinators under a [`FlowConfig`]
///
/// `Flow` is cheap to clone and holds no per-run state; every call to
/// `serial`, `parallel` or `map` creates its own run state.
#[derive(Clone, Debug)]
pub struct Flow {
    config: FlowConfig,
    name: Arc<str>,
}

impl Default for Flow {
    fn default() -> Self {
        Self::new(FlowConfig::default())
    }
}

impl Flow {
    /// Create a flow from a config
    #[must_use]
    pub fn new(config: FlowConfig) -> Self {
        let name = Arc::from(config.name.as_str());
        Self { config, name }
    }

    /// The config this flow was built from
    #[must_use]
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Run name used in log events
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Name handed to completion signals so they can report abandonment
    pub(crate) fn watch(&self) -> Option<Arc<str>> {
        self.config.warn_on_abandoned.then(|| self.shared_name())
    }
}
