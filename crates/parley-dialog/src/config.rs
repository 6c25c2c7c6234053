#![forbid(unsafe_code)]

//! Dialog controller configuration.
//!
//! Configs are built in code with the builder methods, or, with the
//! `policy-config` feature, loaded from TOML/JSON:
//!
//! ```toml
//! label = "delete-file"
//! supersede = "cancel-previous"
//! ```

use std::fmt;

/// Label used in log events when none is configured.
pub const DEFAULT_LABEL: &str = "confirm-dialog";

/// What happens to an unsettled request when `reveal` is called again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum SupersedePolicy {
    /// The earlier future resolves to `RevealError::Superseded`.
    #[default]
    Reject,
    /// The earlier future resolves as canceled with no data.
    CancelPrevious,
}

/// Configuration for a `ConfirmDialog`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct ConfirmDialogConfig {
    /// Name attached to every log event of this dialog.
    pub label: Option<String>,
    /// Handling of overlapping reveals.
    pub supersede: SupersedePolicy,
}

impl ConfirmDialogConfig {
    /// Set the log label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the supersede policy.
    #[must_use]
    pub fn supersede(mut self, policy: SupersedePolicy) -> Self {
        self.supersede = policy;
        self
    }

    /// The configured label, or [`DEFAULT_LABEL`].
    #[must_use]
    pub fn label_or_default(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }
}

#[cfg(feature = "policy-config")]
impl ConfirmDialogConfig {
    /// Parse a config from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|err| ConfigError::Toml(err.to_string()))
    }

    /// Parse a config from a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(|err| ConfigError::Json(err.to_string()))
    }
}

/// Errors from loading a [`ConfirmDialogConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The TOML document could not be parsed into a config.
    Toml(String),
    /// The JSON document could not be parsed into a config.
    Json(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml(msg) => write!(f, "invalid TOML dialog config: {msg}"),
            Self::Json(msg) => write!(f, "invalid JSON dialog config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
