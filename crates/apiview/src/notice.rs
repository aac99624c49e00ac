use crate::error::{Result, ViewError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Longest accepted notice message, counted in Unicode code points.
pub const MAX_MESSAGE_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum NoticeType {
    #[serde(rename = "OK")]
    Ok,
    Warning,
    Error,
    Info,
}

impl NoticeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Info => "Info",
        }
    }
}

impl fmt::Display for NoticeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoticeType {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "OK" => Ok(Self::Ok),
            "Warning" => Ok(Self::Warning),
            "Error" => Ok(Self::Error),
            "Info" => Ok(Self::Info),
            other => Err(ViewError::validation(
                "notice type",
                format!("expected one of OK, Warning, Error, Info, got {other:?}"),
            )),
        }
    }
}

/// One entry of the top-level `notices` array:
///
/// ```json
/// { "type": "Error", "subtype": "Invalid Field", "context": "username", "message": "Already taken" }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    #[serde(rename = "type")]
    notice_type: NoticeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Notice {
    pub fn new(notice_type: NoticeType) -> Self {
        Self {
            notice_type,
            subtype: None,
            context: None,
            message: None,
        }
    }

    /// Builds a notice with every optional field validated up front.
    pub fn with_fields(
        notice_type: NoticeType,
        subtype: Option<&str>,
        context: Option<&str>,
        message: Option<&str>,
    ) -> Result<Self> {
        let mut notice = Self::new(notice_type);
        if let Some(subtype) = subtype {
            notice.set_subtype(subtype)?;
        }
        if let Some(context) = context {
            notice.set_context(context)?;
        }
        if let Some(message) = message {
            notice.set_message(message)?;
        }
        Ok(notice)
    }

    pub fn ok() -> Self {
        Self::new(NoticeType::Ok)
    }

    pub fn warning() -> Self {
        Self::new(NoticeType::Warning)
    }

    pub fn error() -> Self {
        Self::new(NoticeType::Error)
    }

    pub fn info() -> Self {
        Self::new(NoticeType::Info)
    }

    pub fn notice_type(&self) -> NoticeType {
        self.notice_type
    }

    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_type(&mut self, notice_type: NoticeType) -> &mut Self {
        self.notice_type = notice_type;
        self
    }

    /// Sets the subtype, e.g. "Authentication Failed".
    pub fn set_subtype(&mut self, subtype: impl Into<String>) -> Result<&mut Self> {
        let subtype = subtype.into();
        if subtype.is_empty() {
            return Err(ViewError::validation("notice subtype", "must not be empty"));
        }
        self.subtype = Some(subtype);
        Ok(self)
    }

    /// Sets the field the notice refers to, e.g. "username".
    pub fn set_context(&mut self, context: impl Into<String>) -> Result<&mut Self> {
        let context = context.into();
        if context.is_empty() {
            return Err(ViewError::validation("notice context", "must not be empty"));
        }
        self.context = Some(context);
        Ok(self)
    }

    pub fn set_message(&mut self, message: impl Into<String>) -> Result<&mut Self> {
        let message = message.into();
        let chars = message.chars().count();
        if chars == 0 {
            return Err(ViewError::validation("notice message", "must not be empty"));
        }
        if chars > MAX_MESSAGE_CHARS {
            return Err(ViewError::validation(
                "notice message",
                format!("must be {MAX_MESSAGE_CHARS} characters or less, got {chars}"),
            ));
        }
        self.message = Some(message);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notice_type_parsing() {
        assert_eq!("OK".parse::<NoticeType>().unwrap(), NoticeType::Ok);
        assert_eq!("Info".parse::<NoticeType>().unwrap(), NoticeType::Info);
        assert!("ok".parse::<NoticeType>().unwrap_err().is_validation());
        assert!("".parse::<NoticeType>().is_err());
    }

    #[test]
    fn test_message_length_is_counted_in_code_points() {
        let mut notice = Notice::error();
        assert!(notice.set_message("é".repeat(MAX_MESSAGE_CHARS)).is_ok());
        assert!(notice.set_message("é".repeat(MAX_MESSAGE_CHARS + 1)).is_err());
        assert_eq!(notice.message().map(|m| m.chars().count()), Some(120));
    }

    #[test]
    fn test_failed_setter_leaves_field_untouched() {
        let mut notice = Notice::warning();
        notice.set_context("username").unwrap();
        assert!(notice.set_context("").is_err());
        assert_eq!(notice.context(), Some("username"));
    }

    #[test]
    fn test_minimal_notice_serializes_type_only() {
        let value = serde_json::to_value(Notice::ok()).unwrap();
        assert_eq!(value, json!({ "type": "OK" }));
    }
}
