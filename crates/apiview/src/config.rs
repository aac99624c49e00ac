use crate::error::{Result, ViewError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output formats a view can be rendered in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            other => Err(ViewError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderConfig {
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub pretty: bool,
}

impl RenderConfig {
    pub fn pretty() -> Self {
        Self {
            format: Format::Json,
            pretty: true,
        }
    }

    /// Reads `APIVIEW_FORMAT` and `APIVIEW_PRETTY`, falling back to compact JSON.
    pub fn from_env() -> Result<Self> {
        let format = match std::env::var("APIVIEW_FORMAT") {
            Ok(value) => value.trim().parse()?,
            Err(_) => Format::default(),
        };
        let pretty = std::env::var("APIVIEW_PRETTY")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);
        Ok(Self { format, pretty })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_json_is_supported() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        let err = "xml".parse::<Format>().unwrap_err();
        assert_eq!(
            err,
            ViewError::UnsupportedFormat {
                format: "xml".to_string()
            }
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_flag_values() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{ "pretty": true }"#).unwrap();
        assert_eq!(config, RenderConfig::pretty());
    }
}
