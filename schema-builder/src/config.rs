//! Logic for loading the schema builder configuration.
use displaydoc::Display;
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// could not deserialize configuration: {0}
    DeserializeConfigError(serde_yaml::Error),
}

/// How type names are derived from class names when no explicit name is given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum TypeAutoNameStrategy {
    /// The simple class name; for inner classes only the inner part.
    #[default]
    Default,
    /// The simple names of the outer and inner classes, concatenated.
    MergeInnerClass,
    /// The fully qualified class name with `.` and `$` replaced by `_`.
    Full,
}

/// The configuration of a schema build.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Federation support.
    pub federation: Federation,

    /// How to name types without an explicit name.
    pub auto_name_strategy: TypeAutoNameStrategy,

    /// The suffix added to automatically named input types.
    pub input_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            federation: Federation::default(),
            auto_name_strategy: TypeAutoNameStrategy::default(),
            input_suffix: "Input".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Federation {
    /// Adds the federation directives to the schema and resolves `@link` imports.
    pub enabled: bool,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigurationError> {
        serde_yaml::from_str(yaml).map_err(ConfigurationError::DeserializeConfigError)
    }

    pub fn with_federation(mut self, enabled: bool) -> Self {
        self.federation.enabled = enabled;
        self
    }

    pub fn json_schema() -> RootSchema {
        schemars::schema_for!(Config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_yaml_is_the_default_configuration() {
        assert_eq!(Config::from_yaml("{}").unwrap(), Config::default());
    }

    #[test]
    fn reads_every_option() {
        let config = Config::from_yaml(
            r#"
federation:
  enabled: true
auto_name_strategy: Full
input_suffix: In
"#,
        )
        .unwrap();
        assert!(config.federation.enabled);
        assert_eq!(config.auto_name_strategy, TypeAutoNameStrategy::Full);
        assert_eq!(config.input_suffix, "In");
    }

    #[test]
    fn rejects_unknown_fields() {
        let error = Config::from_yaml("federation:\n  enable: true\n").unwrap_err();
        let message = error.to_string();
        assert!(
            message.starts_with("could not deserialize configuration: "),
            "{message}"
        );
        assert!(message.contains("unknown field `enable`"), "{message}");
    }

    #[test]
    fn json_schema_describes_the_options() {
        let schema = serde_json::to_value(Config::json_schema()).unwrap();
        let properties = &schema["properties"];
        assert!(properties.get("federation").is_some());
        assert!(properties.get("auto_name_strategy").is_some());
        assert!(properties.get("input_suffix").is_some());
    }
}
