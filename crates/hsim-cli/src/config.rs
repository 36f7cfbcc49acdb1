use std::path::Path;

use serde::{Deserialize, Serialize};

use hsim_eval::VerifyOptions;
use hsim_generate::GenerateOptions;

use crate::CliError;

/// Contents of an `hsim` TOML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HsimConfig {
    pub generate: GenerateOptions,
    pub verify: VerifyOptions,
}

impl HsimConfig {
    /// Load `path`, or the built-in defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsim_core::TemplateKind;

    #[test]
    fn empty_file_uses_defaults() {
        let config = HsimConfig::from_toml("").expect("parse");
        assert_eq!(config, HsimConfig::default());
        assert_eq!(config.generate.atlases.len(), 2);
        assert_eq!(config.verify.max_examples, 20);
    }

    #[test]
    fn sections_override_defaults() {
        let config = HsimConfig::from_toml(
            r#"
[generate]
seed = 7
samples_per_participant = 2

[[generate.templates]]
key = "bts:Biospecimen"
kind = "biospecimen"

[verify]
strict = true
"#,
        )
        .expect("parse");

        assert_eq!(config.generate.seed, 7);
        assert_eq!(config.generate.participants, 10);
        assert_eq!(config.generate.samples_per_participant, 2);
        assert_eq!(config.generate.templates.len(), 1);
        assert_eq!(config.generate.templates[0].kind, TemplateKind::Biospecimen);
        assert!(config.verify.strict);
    }

    #[test]
    fn unknown_kind_is_a_decode_error() {
        let err = HsimConfig::from_toml(
            r#"
[[generate.templates]]
key = "bts:Biospecimen"
kind = "imaging"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::TomlDecode(_)));
    }

    #[test]
    fn example_config_spells_out_defaults() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../config/hsim.example.toml");
        let config = HsimConfig::load(Some(&path)).expect("load example");
        let expected = HsimConfig {
            generate: GenerateOptions {
                seed: 42,
                ..GenerateOptions::default()
            },
            ..HsimConfig::default()
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = HsimConfig::load(Some(Path::new("/nonexistent/hsim.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
