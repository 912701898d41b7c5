use crate::error::{ConfigError, ConfigResult};
use crate::settings::{LogSettings, RunSettings, SampleMode, SampleSettings};
use crate::toml_parser::{TomlParser, TomlValue};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

const SECTIONS: [&str; 3] = ["sample.", "run.", "log."];

/// Main configuration structure for the rbrank driver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Sample data generation
    pub sample: SampleSettings,
    /// Driver behaviour
    pub run: RunSettings,
    /// Logging
    pub log: LogSettings,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        debug!("reading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let values = TomlParser::parse(content)?;

        for key in values.keys() {
            if !SECTIONS.iter().any(|section| key.starts_with(section)) {
                warn!("ignoring unknown configuration key '{}'", key);
            }
        }

        let config = Self {
            sample: SampleSettings::from_toml(&values)?,
            run: RunSettings::from_toml(&values)?,
            log: LogSettings::from_toml(&values)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Export configuration as TOML string. Fails when a value cannot be
    /// written as a TOML integer.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        let mut all_values = HashMap::new();
        all_values.extend(self.sample.to_toml()?);
        all_values.extend(self.run.to_toml());
        all_values.extend(self.log.to_toml());

        Ok(Self::format_toml(&all_values))
    }

    /// Formats dotted keys back into `[section]` blocks, sorted so the output
    /// is stable.
    fn format_toml(values: &HashMap<String, TomlValue>) -> String {
        let mut sections: BTreeMap<&str, Vec<(&str, &TomlValue)>> = BTreeMap::new();

        for (key, value) in values {
            let (section, name) = key.split_once('.').unwrap_or(("", key.as_str()));
            sections.entry(section).or_default().push((name, value));
        }

        let mut output = String::new();

        if let Some(root_values) = sections.get("") {
            for (key, value) in root_values {
                output.push_str(&format!("{} = {}\n", key, Self::format_toml_value(value)));
            }
        }

        for (section, section_values) in sections.iter_mut().filter(|(k, _)| !k.is_empty()) {
            section_values.sort_by_key(|(name, _)| *name);
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("[{}]\n", section));

            for (key, value) in section_values.iter() {
                output.push_str(&format!("{} = {}\n", key, Self::format_toml_value(value)));
            }
        }

        output
    }

    fn format_toml_value(value: &TomlValue) -> String {
        match value {
            TomlValue::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
            TomlValue::Integer(i) => format!("{}", i),
            TomlValue::Bool(b) => format!("{}", b),
            TomlValue::Array(arr) => {
                let items: Vec<String> = arr.iter().map(Self::format_toml_value).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }

    /// Get configuration file search paths, in lookup order
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // User-specific config
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(PathBuf::from(&home).join(".rbrank").join("config.toml"));
            paths.push(PathBuf::from(&home).join(".config").join("rbrank").join("config.toml"));
        }

        // Current directory
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join("rbrank.toml"));
        }

        paths
    }

    /// Load configuration with automatic path discovery
    pub fn load() -> ConfigResult<Self> {
        Self::load_with_paths(&Self::config_paths())
    }

    /// Load the first existing file among `paths`, or defaults if none exists
    pub fn load_with_paths(paths: &[PathBuf]) -> ConfigResult<Self> {
        for path in paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load an explicitly requested file; unlike discovery, a missing file
    /// is an error
    pub fn load_required(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::Path(format!(
                "Configuration file '{}' does not exist",
                path.display()
            )));
        }
        Self::from_file(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        // Both end up as TOML integers, which are signed 64-bit.
        if i64::try_from(self.sample.count).is_err() {
            return Err(ConfigError::Validation(
                "sample.count does not fit a TOML integer".to_string(),
            ));
        }
        if self.sample.seed.is_some_and(|seed| i64::try_from(seed).is_err()) {
            return Err(ConfigError::Validation(
                "sample.seed does not fit a TOML integer".to_string(),
            ));
        }

        match self.sample.mode {
            SampleMode::Random => {
                if self.sample.count == 0 {
                    return Err(ConfigError::Validation(
                        "sample.count must be greater than 0 in random mode".to_string(),
                    ));
                }
                if self.sample.max_value <= 0 {
                    return Err(ConfigError::Validation(
                        "sample.max_value must be greater than 0".to_string(),
                    ));
                }
            }
            SampleMode::Fixed => {
                if self.sample.values.is_empty() {
                    return Err(ConfigError::Validation(
                        "sample.values must not be empty in fixed mode".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RemoveOrder;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_file() {
        let content = r#"
            [sample]
            mode = "random"
            count = 100
            max_value = 500
            seed = 3

            [run]
            check_invariants = false
            remove_order = "reverse"

            [log]
            level = "debug"
            file = "run.log"
        "#;
        let config = Config::from_toml_str(content).expect("valid config");

        assert_eq!(config.sample.mode, SampleMode::Random);
        assert_eq!(config.sample.count, 100);
        assert!(!config.run.check_invariants);
        assert_eq!(config.run.remove_order, RemoveOrder::Reverse);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn test_validation_failures() {
        assert!(Config::from_toml_str("[sample]\nmode = random\ncount = 0").is_err());
        assert!(Config::from_toml_str("[sample]\nmode = random\nmax_value = 0").is_err());
        assert!(Config::from_toml_str("[sample]\nvalues = []").is_err());
    }

    #[test]
    fn test_toml_string_parses_back() {
        let mut config = Config::default();
        config.sample.seed = Some(11);
        config.run.remove_order = RemoveOrder::Shuffled;

        let text = config.to_toml_string().expect("values fit TOML integers");
        assert!(text.contains("[sample]"));
        assert_eq!(Config::from_toml_str(&text).ok(), Some(config));
    }

    #[test]
    fn test_seed_beyond_toml_integer_range() {
        let mut config = Config::default();
        config.sample.seed = Some(u64::MAX);

        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        assert!(matches!(
            config.to_toml_string(),
            Err(ConfigError::Validation(_))
        ));

        config.sample.seed = Some(i64::MAX as u64);
        let text = config.to_toml_string().expect("largest seed still fits");
        assert_eq!(Config::from_toml_str(&text).ok(), Some(config));
    }

    #[test]
    fn test_home_paths_come_before_current_dir() {
        let paths = Config::config_paths();
        let Some(last) = paths.last() else {
            panic!("no search paths");
        };
        assert!(last.ends_with("rbrank.toml"));
        if std::env::var_os("HOME").is_some() {
            assert!(paths[0].ends_with(".rbrank/config.toml"));
        }
    }

    #[test]
    fn test_missing_paths_fall_back_to_defaults() {
        let paths = vec![PathBuf::from("/nonexistent/rbrank/config.toml")];
        let config = Config::load_with_paths(&paths).expect("defaults");
        assert_eq!(config, Config::default());

        assert!(matches!(
            Config::load_required(&paths[0]),
            Err(ConfigError::Path(_))
        ));
    }
}
