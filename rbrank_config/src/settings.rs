use crate::error::{ConfigError, ConfigResult};
use crate::toml_parser::TomlValue;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Values the driver falls back to when no sample values are configured.
pub const DEFAULT_FIXED_VALUES: [i64; 6] = [816, 444, 366, 975, 497, 696];

/// Where sample values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    /// Use `sample.values` verbatim
    Fixed,
    /// Draw `sample.count` values from `0..sample.max_value`
    Random,
}

impl FromStr for SampleMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(SampleMode::Fixed),
            "random" => Ok(SampleMode::Random),
            other => Err(ConfigError::Validation(format!(
                "Unknown sample mode '{}' (expected fixed or random)",
                other
            ))),
        }
    }
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleMode::Fixed => write!(f, "fixed"),
            SampleMode::Random => write!(f, "random"),
        }
    }
}

/// Order in which the removal pass visits the inserted elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOrder {
    Insertion,
    Reverse,
    Shuffled,
}

impl FromStr for RemoveOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "insertion" => Ok(RemoveOrder::Insertion),
            "reverse" => Ok(RemoveOrder::Reverse),
            "shuffled" => Ok(RemoveOrder::Shuffled),
            other => Err(ConfigError::Validation(format!(
                "Unknown remove order '{}' (expected insertion, reverse or shuffled)",
                other
            ))),
        }
    }
}

impl fmt::Display for RemoveOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveOrder::Insertion => write!(f, "insertion"),
            RemoveOrder::Reverse => write!(f, "reverse"),
            RemoveOrder::Shuffled => write!(f, "shuffled"),
        }
    }
}

/// Sample data settings (`[sample]`)
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSettings {
    pub mode: SampleMode,
    /// Number of random values
    pub count: usize,
    /// Exclusive upper bound for random values
    pub max_value: i64,
    /// Seed for reproducible random runs
    pub seed: Option<u64>,
    /// Values used in fixed mode
    pub values: Vec<i64>,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            mode: SampleMode::Fixed,
            count: 6,
            max_value: 1000,
            seed: None,
            values: DEFAULT_FIXED_VALUES.to_vec(),
        }
    }
}

impl SampleSettings {
    pub fn from_toml(values: &HashMap<String, TomlValue>) -> ConfigResult<Self> {
        let mut settings = Self::default();

        if let Some(value) = values.get("sample.mode") {
            settings.mode = value.as_string()?.parse()?;
        }
        if let Some(value) = values.get("sample.count") {
            settings.count = value.as_unsigned()?;
        }
        if let Some(value) = values.get("sample.max_value") {
            settings.max_value = value.as_integer()?;
        }
        if let Some(value) = values.get("sample.seed") {
            settings.seed = Some(value.as_unsigned()?);
        }
        if let Some(value) = values.get("sample.values") {
            settings.values = value
                .as_array()?
                .iter()
                .map(TomlValue::as_integer)
                .collect::<ConfigResult<_>>()?;
        }

        Ok(settings)
    }

    /// Fails when `count` or `seed` is too large for a TOML integer.
    pub fn to_toml(&self) -> ConfigResult<HashMap<String, TomlValue>> {
        let mut values = HashMap::new();
        values.insert("sample.mode".to_string(), TomlValue::from(self.mode.to_string()));
        values.insert("sample.count".to_string(), Self::integer("sample.count", self.count)?);
        values.insert("sample.max_value".to_string(), TomlValue::Integer(self.max_value));
        if let Some(seed) = self.seed {
            values.insert("sample.seed".to_string(), Self::integer("sample.seed", seed)?);
        }
        values.insert("sample.values".to_string(), TomlValue::from(self.values.clone()));
        Ok(values)
    }

    fn integer<T: TryInto<i64>>(key: &str, value: T) -> ConfigResult<TomlValue> {
        value.try_into().map(TomlValue::Integer).map_err(|_| {
            ConfigError::Validation(format!("{} does not fit a TOML integer", key))
        })
    }
}

/// Driver behaviour (`[run]`)
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// Validate the whole tree after every insert and remove
    pub check_invariants: bool,
    /// Log the in-order contents once everything is inserted
    pub print_tree: bool,
    pub remove_order: RemoveOrder,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            check_invariants: true,
            print_tree: true,
            remove_order: RemoveOrder::Insertion,
        }
    }
}

impl RunSettings {
    pub fn from_toml(values: &HashMap<String, TomlValue>) -> ConfigResult<Self> {
        let mut settings = Self::default();

        macro_rules! load_bool {
            ($field:ident, $key:expr) => {
                if let Some(value) = values.get($key) {
                    settings.$field = value.as_bool()?;
                }
            };
        }

        load_bool!(check_invariants, "run.check_invariants");
        load_bool!(print_tree, "run.print_tree");

        if let Some(value) = values.get("run.remove_order") {
            settings.remove_order = value.as_string()?.parse()?;
        }

        Ok(settings)
    }

    pub fn to_toml(&self) -> HashMap<String, TomlValue> {
        let mut values = HashMap::new();
        values.insert("run.check_invariants".to_string(), TomlValue::Bool(self.check_invariants));
        values.insert("run.print_tree".to_string(), TomlValue::Bool(self.print_tree));
        values.insert(
            "run.remove_order".to_string(),
            TomlValue::from(self.remove_order.to_string()),
        );
        values
    }
}

/// Logging (`[log]`)
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    /// One of off, error, warn, info, debug, trace
    pub level: String,
    /// Also write records to this file
    pub file: Option<PathBuf>,
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogSettings {
    pub fn from_toml(values: &HashMap<String, TomlValue>) -> ConfigResult<Self> {
        let mut settings = Self::default();

        if let Some(value) = values.get("log.level") {
            let level = value.as_string()?.to_ascii_lowercase();
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::Validation(format!("Unknown log level '{}'", level)));
            }
            settings.level = level;
        }
        if let Some(value) = values.get("log.file") {
            settings.file = Some(PathBuf::from(value.as_string()?));
        }

        Ok(settings)
    }

    pub fn to_toml(&self) -> HashMap<String, TomlValue> {
        let mut values = HashMap::new();
        values.insert("log.level".to_string(), TomlValue::from(self.level.clone()));
        if let Some(file) = &self.file {
            values.insert(
                "log.file".to_string(),
                TomlValue::from(file.to_string_lossy().into_owned()),
            );
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toml_parser::TomlParser;

    #[test]
    fn test_defaults_match_fixed_run() {
        let sample = SampleSettings::default();
        assert_eq!(sample.mode, SampleMode::Fixed);
        assert_eq!(sample.values, vec![816, 444, 366, 975, 497, 696]);
        assert_eq!(sample.max_value, 1000);
    }

    #[test]
    fn test_sample_from_toml() {
        let values = TomlParser::parse(
            "[sample]\nmode = \"Random\"\ncount = 50\nmax_value = 10\nseed = 7",
        )
        .expect("valid toml");
        let sample = SampleSettings::from_toml(&values).expect("valid sample settings");

        assert_eq!(sample.mode, SampleMode::Random);
        assert_eq!(sample.count, 50);
        assert_eq!(sample.max_value, 10);
        assert_eq!(sample.seed, Some(7));
    }

    #[test]
    fn test_bad_enum_values_rejected() {
        let values = TomlParser::parse("[sample]\nmode = sorted").expect("valid toml");
        assert!(SampleSettings::from_toml(&values).is_err());

        let values = TomlParser::parse("[run]\nremove_order = sideways").expect("valid toml");
        assert!(RunSettings::from_toml(&values).is_err());

        let values = TomlParser::parse("[log]\nlevel = loud").expect("valid toml");
        assert!(LogSettings::from_toml(&values).is_err());
    }

    #[test]
    fn test_sample_round_trip_and_oversized_seed() {
        let sample = SampleSettings {
            seed: Some(12),
            ..SampleSettings::default()
        };
        let values = sample.to_toml().expect("fits");
        assert_eq!(SampleSettings::from_toml(&values).ok(), Some(sample));

        let oversized = SampleSettings {
            seed: Some(u64::MAX),
            ..SampleSettings::default()
        };
        assert!(oversized.to_toml().is_err());
    }

    #[test]
    fn test_negative_count_rejected() {
        let values = TomlParser::parse("[sample]\ncount = -3").expect("valid toml");
        assert!(SampleSettings::from_toml(&values).is_err());
    }

    #[test]
    fn test_run_and_log_round_trip_through_toml_map() {
        let run = RunSettings {
            check_invariants: false,
            print_tree: true,
            remove_order: RemoveOrder::Shuffled,
        };
        assert_eq!(RunSettings::from_toml(&run.to_toml()).ok(), Some(run));

        let log = LogSettings {
            level: "trace".to_string(),
            file: Some(PathBuf::from("rbrank.log")),
        };
        assert_eq!(LogSettings::from_toml(&log.to_toml()).ok(), Some(log));
    }
}
