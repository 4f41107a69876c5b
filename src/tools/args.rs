// ABOUTME: Typed extraction of tool arguments from the tools/call JSON payload.
// ABOUTME: Turns absent or mistyped arguments into ToolError parameter errors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;

use super::errors::ToolError;

/// Borrowed view over a tool's arguments object
#[derive(Debug, Clone, Copy)]
pub struct ToolArgs<'a> {
    tool_name: &'static str,
    args: &'a Value,
}

impl<'a> ToolArgs<'a> {
    /// Wrap the raw arguments of `tool_name`
    #[must_use]
    pub const fn new(tool_name: &'static str, args: &'a Value) -> Self {
        Self { tool_name, args }
    }

    fn value(&self, key: &str) -> Option<&'a Value> {
        self.args.get(key).filter(|value| !value.is_null())
    }

    /// Required non-empty string
    ///
    /// # Errors
    ///
    /// `MissingParameter` when absent or blank, `InvalidParameter` when not a string
    pub fn required_str(&self, key: &str) -> Result<&'a str, ToolError> {
        match self.optional_str(key)? {
            Some(value) => Ok(value),
            None => Err(ToolError::missing_parameter(self.tool_name, key)),
        }
    }

    /// Optional string; blank strings count as absent
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when present with a non-string type
    pub fn optional_str(&self, key: &str) -> Result<Option<&'a str>, ToolError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ToolError::invalid_parameter(
                self.tool_name,
                key,
                "expected a string",
            )),
        }
    }

    /// String with a fallback value
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when present with a non-string type
    pub fn str_or(&self, key: &str, default: &'a str) -> Result<&'a str, ToolError> {
        Ok(self.optional_str(key)?.unwrap_or(default))
    }

    /// Optional boolean, also accepting `"true"`/`"false"` strings
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the value is not a boolean
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ToolError> {
        match self.value(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
            Some(_) => Err(ToolError::invalid_parameter(
                self.tool_name,
                key,
                "expected a boolean",
            )),
        }
    }

    /// Whether the key is present with an explicit JSON `null`
    #[must_use]
    pub fn is_explicit_null(&self, key: &str) -> bool {
        matches!(self.args.get(key), Some(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_str_missing_and_blank() {
        let args = json!({"email": "  "});
        let view = ToolArgs::new("get_user", &args);
        assert_eq!(
            view.required_str("email"),
            Err(ToolError::missing_parameter("get_user", "email"))
        );
        assert!(view.required_str("other").is_err());
    }

    #[test]
    fn test_optional_str_type_mismatch() {
        let args = json!({"program": 42});
        let view = ToolArgs::new("list_users", &args);
        assert!(matches!(
            view.optional_str("program"),
            Err(ToolError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_bool_or_accepts_strings() {
        let args = json!({"a": "TRUE", "b": false});
        let view = ToolArgs::new("add_user", &args);
        assert!(view.bool_or("a", false).unwrap());
        assert!(!view.bool_or("b", true).unwrap());
        assert!(view.bool_or("c", true).unwrap());
    }

    #[test]
    fn test_explicit_null() {
        let args = json!({"status": null});
        let view = ToolArgs::new("list_clients", &args);
        assert!(view.is_explicit_null("status"));
        assert!(!view.is_explicit_null("missing"));
        assert_eq!(view.optional_str("status").unwrap(), None);
    }
}
