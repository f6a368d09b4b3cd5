//! Label Controller Configuration
//!
//! Small mounted-file configuration for the namespace labeler. Everything has
//! a sensible default so the controller runs without any file present.

use serde::{Deserialize, Serialize};

/// Main controller configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerConfig {
    /// Extra label keys to protect in addition to the built-in
    /// `app.kubernetes.io/*` set
    #[serde(default, rename = "protectedLabels")]
    pub protected_labels: Vec<String>,

    /// Override notification behavior
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Seconds to wait before a failed pass is retried
    #[serde(
        rename = "requeueOnErrorSeconds",
        default = "default_requeue_seconds"
    )]
    pub requeue_on_error_seconds: u64,
}

/// Notification configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// Emit an override notice whenever any declaration exists, even if the
    /// pass changed nothing. Off by default: notices fire only when a
    /// pre-existing label was actually replaced or removed.
    #[serde(default, rename = "alwaysNotify")]
    pub always_notify: bool,
}

fn default_requeue_seconds() -> u64 {
    5
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            protected_labels: Vec::new(),
            notifications: NotificationConfig::default(),
            requeue_on_error_seconds: default_requeue_seconds(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from a mounted YAML file
    pub fn from_mounted_file(config_path: &str) -> Result<Self, anyhow::Error> {
        let config_str = std::fs::read_to_string(config_path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {config_path}: {e}"))?;

        let config: ControllerConfig = serde_yaml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config YAML: {e}"))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for key in &self.protected_labels {
            if key.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "protectedLabels entries must be non-empty label keys"
                ));
            }
        }

        if self.requeue_on_error_seconds == 0 {
            return Err(anyhow::anyhow!(
                "requeueOnErrorSeconds must be greater than zero"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
protectedLabels:
  - "dana.io/tenant"
  - "dana.io/tier"

notifications:
  alwaysNotify: true

requeueOnErrorSeconds: 10
"#;

        let config: ControllerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.protected_labels,
            vec!["dana.io/tenant", "dana.io/tier"]
        );
        assert!(config.notifications.always_notify);
        assert_eq!(config.requeue_on_error_seconds, 10);
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let config: ControllerConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.protected_labels.is_empty());
        assert!(!config.notifications.always_notify);
        assert_eq!(config.requeue_on_error_seconds, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_protected_keys() {
        let config = ControllerConfig {
            protected_labels: vec!["  ".to_string()],
            ..ControllerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_requeue_delay() {
        let config = ControllerConfig {
            requeue_on_error_seconds: 0,
            ..ControllerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
