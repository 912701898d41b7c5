use crate::error::{ConfigError, ConfigResult};
use std::collections::HashMap;

/// Parser for the TOML subset rbrank config files use: `[section]` headers,
/// `key = value` lines, `#` comments, and flat arrays of scalars.
///
/// Keys come back flattened as `section.key`.
pub struct TomlParser;

impl TomlParser {
    /// Parse a TOML string into a map of dotted keys to values
    pub fn parse(content: &str) -> ConfigResult<HashMap<String, TomlValue>> {
        let mut result = HashMap::new();
        let mut current_section = String::new();

        for (line_num, raw) in content.lines().enumerate() {
            let line = Self::strip_comment(raw).trim();

            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].trim();
                if name.is_empty() {
                    return Err(ConfigError::Toml(format!(
                        "Empty section header on line {}",
                        line_num + 1
                    )));
                }
                current_section = name.to_string();
                continue;
            }

            let Some((key, value)) = Self::parse_key_value(line) else {
                return Err(ConfigError::Toml(format!(
                    "Invalid line {}: '{}'",
                    line_num + 1,
                    line
                )));
            };

            let full_key = if current_section.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", current_section, key)
            };

            let toml_value = Self::parse_value(value).map_err(|e| match e {
                ConfigError::Toml(msg) => ConfigError::Toml(format!("line {}: {}", line_num + 1, msg)),
                other => other,
            })?;

            if result.insert(full_key.clone(), toml_value).is_some() {
                return Err(ConfigError::Toml(format!(
                    "Duplicate key '{}' on line {}",
                    full_key,
                    line_num + 1
                )));
            }
        }

        Ok(result)
    }

    /// Drops a trailing `# comment`, ignoring `#` inside quoted strings.
    fn strip_comment(line: &str) -> &str {
        let mut in_string = false;
        for (i, c) in line.char_indices() {
            match c {
                '"' => in_string = !in_string,
                '#' if !in_string => return &line[..i],
                _ => {}
            }
        }
        line
    }

    fn parse_key_value(line: &str) -> Option<(&str, &str)> {
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key, value.trim()))
    }

    fn parse_value(value: &str) -> ConfigResult<TomlValue> {
        let value = value.trim();

        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            let content = &value[1..value.len() - 1];
            Ok(TomlValue::String(content.replace("\\\"", "\"")))
        } else if value == "true" {
            Ok(TomlValue::Bool(true))
        } else if value == "false" {
            Ok(TomlValue::Bool(false))
        } else if let Ok(int_val) = value.replace('_', "").parse::<i64>() {
            Ok(TomlValue::Integer(int_val))
        } else if value.starts_with('[') && value.ends_with(']') {
            let content = &value[1..value.len() - 1];
            let mut array = Vec::new();

            for item in content.split(',') {
                let trimmed = item.trim();
                if !trimmed.is_empty() {
                    array.push(Self::parse_value(trimmed)?);
                }
            }

            Ok(TomlValue::Array(array))
        } else if !value.is_empty() && !value.contains('"') {
            // bare identifiers, e.g. `mode = fixed`
            Ok(TomlValue::String(value.to_string()))
        } else {
            Err(ConfigError::Toml(format!("Unsupported value: '{}'", value)))
        }
    }
}

/// TOML value types supported by our parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TomlValue {
    String(String),
    Integer(i64),
    Bool(bool),
    Array(Vec<TomlValue>),
}

impl TomlValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            TomlValue::String(_) => "string",
            TomlValue::Integer(_) => "integer",
            TomlValue::Bool(_) => "boolean",
            TomlValue::Array(_) => "array",
        }
    }

    fn expected(&self, what: &str) -> ConfigError {
        ConfigError::Validation(format!("Expected {} value, found {}", what, self.type_name()))
    }

    pub fn as_string(&self) -> ConfigResult<&str> {
        match self {
            TomlValue::String(s) => Ok(s),
            _ => Err(self.expected("string")),
        }
    }

    pub fn as_integer(&self) -> ConfigResult<i64> {
        match self {
            TomlValue::Integer(i) => Ok(*i),
            _ => Err(self.expected("integer")),
        }
    }

    pub fn as_bool(&self) -> ConfigResult<bool> {
        match self {
            TomlValue::Bool(b) => Ok(*b),
            _ => Err(self.expected("boolean")),
        }
    }

    pub fn as_array(&self) -> ConfigResult<&[TomlValue]> {
        match self {
            TomlValue::Array(arr) => Ok(arr),
            _ => Err(self.expected("array")),
        }
    }

    /// Non-negative integer that fits `T`.
    pub fn as_unsigned<T: TryFrom<i64>>(&self) -> ConfigResult<T> {
        let value = self.as_integer()?;
        T::try_from(value).map_err(|_| {
            ConfigError::Validation(format!("Integer {} is out of range", value))
        })
    }
}

impl From<&str> for TomlValue {
    fn from(value: &str) -> Self {
        TomlValue::String(value.to_string())
    }
}

impl From<String> for TomlValue {
    fn from(value: String) -> Self {
        TomlValue::String(value)
    }
}

impl From<i64> for TomlValue {
    fn from(value: i64) -> Self {
        TomlValue::Integer(value)
    }
}

impl<T: Into<TomlValue>> From<Vec<T>> for TomlValue {
    fn from(values: Vec<T>) -> Self {
        TomlValue::Array(values.into_iter().map(Into::into).collect())
    }
}
