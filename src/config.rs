//! Plugin configuration parsing.
//!
//! The host hands the plugin entry point a tree of key/value nodes taken from
//! the user's ALSA configuration. This module validates the recognized keys
//! and collects them into a [`PluginConfig`]. It deliberately works on plain
//! `(key, value)` pairs rather than `snd_config_t` nodes so the whole parser
//! can be exercised without a running host; the [`ffi`](crate::ffi) layer does
//! the node-to-value conversion.

use std::path::PathBuf;

use thiserror::Error;

/// Type of errors from parsing the plugin configuration. All of them abort
/// plugin construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A key outside the recognized set was supplied.
    #[error("unknown field {0}")]
    UnknownField(String),
    /// A recognized key held a value of the wrong type.
    #[error("invalid value for {key}, expected {expected}")]
    InvalidValue {
        /// The offending key.
        key: String,
        /// Human-readable name of the expected value type.
        expected: &'static str,
    },
    /// The required `slave` key is absent.
    #[error("no slave defined")]
    MissingSlave,
    /// The required `algo` key is absent.
    #[error("no algo defined")]
    MissingAlgo,
    /// Dumping was enabled without naming one of the dump files.
    #[error("{role} dump file name is not defined")]
    MissingDumpPath {
        /// Which dump file is missing, `"input"` or `"output"`.
        role: &'static str,
    },
    /// Dumping was enabled with the same file name for both taps.
    #[error("input and output dump file names are the same")]
    DumpPathsEqual,
}

fn invalid(key: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_owned(),
        expected,
    }
}

/// A single configuration value, mirroring the value types of the host's
/// configuration nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// String value, quoted or bare.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Real(f64),
    /// Compound subtree. Only the `slave` key may hold one.
    Compound,
}

impl ConfigValue {
    /// String accessor. Fails for any non-string node.
    pub fn as_str(&self, key: &str) -> Result<&str, ConfigError> {
        match self {
            Self::Str(s) => Ok(s),
            _ => Err(invalid(key, "string")),
        }
    }

    /// Boolean accessor with the host's boolean semantics: integers must be
    /// exactly 0 or 1, strings accept the usual on/off spellings.
    pub fn as_bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self {
            Self::Int(0) => Ok(false),
            Self::Int(1) => Ok(true),
            Self::Str(s) => match s.to_ascii_lowercase().as_str() {
                "0" | "false" | "no" | "off" => Ok(false),
                "1" | "true" | "yes" | "on" => Ok(true),
                _ => Err(invalid(key, "boolean")),
            },
            _ => Err(invalid(key, "boolean")),
        }
    }
}

/// Locations of the dump tap files, present when `dump_enable` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    /// File receiving the raw bytes of every block before processing.
    pub input_path: PathBuf,
    /// File receiving the raw bytes of every block after processing.
    pub output_path: PathBuf,
}

/// Validated plugin parameters, ready for constructing the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginConfig {
    /// Name of the processing algorithm, resolved against the registry at
    /// construction.
    pub algo: String,
    /// Usage text was requested; construction must abort without side effects.
    pub help: bool,
    /// Dump tap locations, when dumping is enabled.
    pub dump: Option<DumpConfig>,
}

impl PluginConfig {
    /// Walk the configuration pairs and build a validated [`PluginConfig`].
    ///
    /// `type` is consumed without effect and `slave` is only checked for
    /// presence; the slave node itself stays with the host. Any unrecognized
    /// key is fatal. `slave` and `algo` are required, in that order of
    /// checking. A set `help` flag short-circuits before the dump file names
    /// are validated, so `help=1` never fails on dump settings.
    pub fn parse<I>(items: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, ConfigValue)>,
    {
        let mut slave = false;
        let mut algo = None;
        let mut help = false;
        let mut dump_enable = false;
        let mut input_fname = None;
        let mut output_fname = None;

        for (key, value) in items {
            match key.as_str() {
                "type" => {}
                "slave" => slave = true,
                "help" => help = value.as_bool(&key)?,
                "algo" => algo = Some(value.as_str(&key)?.to_owned()),
                "dump_enable" => dump_enable = value.as_bool(&key)?,
                "input_fname" => input_fname = Some(value.as_str(&key)?.to_owned()),
                "output_fname" => output_fname = Some(value.as_str(&key)?.to_owned()),
                _ => return Err(ConfigError::UnknownField(key)),
            }
        }

        if !slave {
            return Err(ConfigError::MissingSlave);
        }
        let algo = algo.ok_or(ConfigError::MissingAlgo)?;
        if help {
            return Ok(Self {
                algo,
                help: true,
                dump: None,
            });
        }

        let dump = if dump_enable {
            let input = input_fname
                .filter(|name| !name.is_empty())
                .ok_or(ConfigError::MissingDumpPath { role: "input" })?;
            let output = output_fname
                .filter(|name| !name.is_empty())
                .ok_or(ConfigError::MissingDumpPath { role: "output" })?;
            if input == output {
                return Err(ConfigError::DumpPathsEqual);
            }
            Some(DumpConfig {
                input_path: input.into(),
                output_path: output.into(),
            })
        } else {
            None
        };

        Ok(Self {
            algo,
            help: false,
            dump,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn item(key: &str, value: ConfigValue) -> (String, ConfigValue) {
        (key.to_owned(), value)
    }

    fn s(value: &str) -> ConfigValue {
        ConfigValue::Str(value.to_owned())
    }

    fn base() -> Vec<(String, ConfigValue)> {
        vec![
            item("type", s("procplug")),
            item("slave", ConfigValue::Compound),
            item("algo", s("dummy")),
        ]
    }

    #[test]
    fn test_minimal_config() {
        let config = PluginConfig::parse(base()).unwrap();
        assert_eq!(config.algo, "dummy");
        assert!(!config.help);
        assert!(config.dump.is_none());
    }

    #[test]
    fn test_unknown_field() {
        let mut items = base();
        items.push(item("volume", ConfigValue::Int(3)));
        assert_eq!(
            PluginConfig::parse(items),
            Err(ConfigError::UnknownField("volume".to_owned()))
        );
    }

    #[test]
    fn test_missing_slave() {
        let items = vec![item("algo", s("dummy"))];
        assert_eq!(PluginConfig::parse(items), Err(ConfigError::MissingSlave));
    }

    #[test]
    fn test_missing_algo() {
        let items = vec![item("slave", ConfigValue::Compound)];
        assert_eq!(PluginConfig::parse(items), Err(ConfigError::MissingAlgo));
    }

    #[test]
    fn test_slave_checked_before_algo() {
        assert_eq!(
            PluginConfig::parse(vec![]),
            Err(ConfigError::MissingSlave)
        );
    }

    #[test]
    fn test_bool_spellings() {
        for truthy in [ConfigValue::Int(1), s("1"), s("true"), s("YES"), s("on")] {
            let mut items = base();
            items.push(item("dump_enable", truthy));
            items.push(item("input_fname", s("in.raw")));
            items.push(item("output_fname", s("out.raw")));
            assert!(PluginConfig::parse(items).unwrap().dump.is_some());
        }
        for falsy in [ConfigValue::Int(0), s("0"), s("false"), s("no"), s("Off")] {
            let mut items = base();
            items.push(item("dump_enable", falsy));
            assert!(PluginConfig::parse(items).unwrap().dump.is_none());
        }
    }

    #[test]
    fn test_bad_bool() {
        let mut items = base();
        items.push(item("dump_enable", ConfigValue::Int(2)));
        assert_eq!(
            PluginConfig::parse(items),
            Err(ConfigError::InvalidValue {
                key: "dump_enable".to_owned(),
                expected: "boolean"
            })
        );

        let mut items = base();
        items.push(item("help", ConfigValue::Real(1.0)));
        assert!(PluginConfig::parse(items).is_err());
    }

    #[test]
    fn test_algo_must_be_string() {
        let items = vec![
            item("slave", ConfigValue::Compound),
            item("algo", ConfigValue::Int(1)),
        ];
        assert_eq!(
            PluginConfig::parse(items),
            Err(ConfigError::InvalidValue {
                key: "algo".to_owned(),
                expected: "string"
            })
        );
    }

    #[test]
    fn test_dump_requires_both_paths() {
        let mut items = base();
        items.push(item("dump_enable", ConfigValue::Int(1)));
        assert_eq!(
            PluginConfig::parse(items),
            Err(ConfigError::MissingDumpPath { role: "input" })
        );

        let mut items = base();
        items.push(item("dump_enable", ConfigValue::Int(1)));
        items.push(item("input_fname", s("in.raw")));
        assert_eq!(
            PluginConfig::parse(items),
            Err(ConfigError::MissingDumpPath { role: "output" })
        );
    }

    #[test]
    fn test_dump_rejects_empty_path() {
        let mut items = base();
        items.push(item("dump_enable", ConfigValue::Int(1)));
        items.push(item("input_fname", s("")));
        items.push(item("output_fname", s("out.raw")));
        assert_eq!(
            PluginConfig::parse(items),
            Err(ConfigError::MissingDumpPath { role: "input" })
        );
    }

    #[test]
    fn test_dump_rejects_equal_paths() {
        let mut items = base();
        items.push(item("dump_enable", ConfigValue::Int(1)));
        items.push(item("input_fname", s("same.raw")));
        items.push(item("output_fname", s("same.raw")));
        assert_eq!(PluginConfig::parse(items), Err(ConfigError::DumpPathsEqual));
    }

    #[test]
    fn test_help_skips_dump_validation() {
        let mut items = base();
        items.push(item("help", ConfigValue::Int(1)));
        items.push(item("dump_enable", ConfigValue::Int(1)));
        let config = PluginConfig::parse(items).unwrap();
        assert!(config.help);
        assert!(config.dump.is_none());
    }

    #[test]
    fn test_help_still_requires_slave_and_algo() {
        let items = vec![item("help", ConfigValue::Int(1))];
        assert_eq!(PluginConfig::parse(items), Err(ConfigError::MissingSlave));
    }
}
