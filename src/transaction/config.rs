use super::TxOptions;
use crate::core::{DbError, Result};
use serde::{Deserialize, Serialize};

/// Transaction runner configuration
///
/// Can be built in code or loaded from JSON:
///
/// ```
/// use txwrapper::{IsolationLevel, RunnerConfig};
///
/// # fn main() -> Result<(), txwrapper::DbError> {
/// let config = RunnerConfig::from_json(r#"{
///     "label": "billing",
///     "default_options": { "isolation": "serializable" }
/// }"#)?;
///
/// assert_eq!(config.label, "billing");
/// assert_eq!(config.default_options.isolation, Some(IsolationLevel::Serializable));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Name recorded on the runner's tracing span
    pub label: String,

    /// Options used when a run does not pass its own
    pub default_options: TxOptions,
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self {
            label: "transaction".to_string(),
            default_options: TxOptions::default(),
        }
    }

    /// Set the span label
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Set the default transaction options
    pub fn default_options(mut self, options: TxOptions) -> Self {
        self.default_options = options;
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(DbError::Config("label cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::IsolationLevel;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.label, "transaction");
        assert!(config.default_options.is_default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RunnerConfig::new()
            .label("orders")
            .default_options(TxOptions::new().read_only(true));

        assert_eq!(config.label, "orders");
        assert!(config.default_options.read_only);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = RunnerConfig::from_json(r#"{"default_options": {"read_only": true}}"#).unwrap();
        assert_eq!(config.label, "transaction");
        assert!(config.default_options.read_only);
        assert_eq!(config.default_options.isolation, None);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        let malformed = RunnerConfig::from_json("{ not json");
        assert!(matches!(malformed, Err(DbError::Config(_))));

        let unknown_level =
            RunnerConfig::from_json(r#"{"default_options": {"isolation": "snapshot"}}"#);
        assert!(matches!(unknown_level, Err(DbError::Config(_))));

        let empty_label = RunnerConfig::from_json(r#"{"label": "  "}"#);
        assert!(matches!(empty_label, Err(DbError::Config(_))));
    }

    #[test]
    fn test_validate() {
        let valid = RunnerConfig::new().default_options(
            TxOptions::new().isolation(IsolationLevel::ReadCommitted),
        );
        assert!(valid.validate().is_ok());

        let invalid = RunnerConfig::new().label("");
        assert!(invalid.validate().is_err());
    }
}
