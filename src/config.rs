//! Configuration loading for the twee toolchain.
//!
//! `defaults/twee.default.toml` is embedded into the binary so that docs and runtime
//! behavior stay in sync. Callers layer user-specific files and key overrides on top of
//! those defaults via [`Loader`] before deserializing into [`TweeConfig`].

use crate::processor::UnterminatedPolicy;
use crate::tokenizer::TokenizerOptions;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/twee.default.toml");

/// File name picked up from the working directory when present
pub const USER_CONFIG_FILE: &str = "twee.toml";

/// Top-level configuration consumed by twee applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TweeConfig {
    pub output: OutputConfig,
    pub diagnostics: DiagnosticsConfig,
    pub tokenizer: TokenizerOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// A `<stage>-<format>` string, see [`crate::processor::available_formats`]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub unterminated_strings: UnterminatedPolicy,
}

/// Layers of twee configuration, lowest precedence first: embedded defaults,
/// `twee.toml` in a working directory, an explicit `--config` file, then CLI flags.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    fn add_toml(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Pick up `twee.toml` from `dir` if it exists.
    pub fn with_working_dir(self, dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(USER_CONFIG_FILE);
        self.add_toml(&path, false)
    }

    /// Layer an explicit configuration file. A missing file fails at [`Loader::build`].
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.add_toml(path.as_ref(), true)
    }

    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Apply the command-line flags that shadow config keys.
    ///
    /// `format` overrides `output.format`; `macro_names` only ever turns recognition on.
    pub fn with_flags(self, format: Option<&str>, macro_names: bool) -> Result<Self, ConfigError> {
        let mut loader = self;
        if let Some(format) = format {
            loader = loader.set_override("output.format", format)?;
        }
        if macro_names {
            loader = loader.set_override("tokenizer.macro_names", true)?;
        }
        Ok(loader)
    }

    pub fn build(self) -> Result<TweeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone, with no user files or flags.
pub fn load_defaults() -> Result<TweeConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.output.format, "token-log");
        assert_eq!(
            config.diagnostics.unterminated_strings,
            UnterminatedPolicy::Warn
        );
        assert!(!config.tokenizer.macro_names);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("diagnostics.unterminated_strings", "error")
            .expect("override to apply")
            .set_override("tokenizer.macro_names", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(
            config.diagnostics.unterminated_strings,
            UnterminatedPolicy::Error
        );
        assert!(config.tokenizer.macro_names);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[output]\nformat = \"passage-json\"").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "passage-json");
        assert_eq!(
            config.diagnostics.unterminated_strings,
            UnterminatedPolicy::Warn
        );
    }

    #[test]
    fn working_dir_without_user_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Loader::new()
            .with_working_dir(dir.path())
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "token-log");
    }

    #[test]
    fn working_dir_user_file_is_layered() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(USER_CONFIG_FILE),
            "[diagnostics]\nunterminated_strings = \"ignore\"\n",
        )
        .expect("write config");

        let config = Loader::new()
            .with_working_dir(dir.path())
            .build()
            .expect("config to build");
        assert_eq!(
            config.diagnostics.unterminated_strings,
            UnterminatedPolicy::Ignore
        );
        assert_eq!(config.output.format, "token-log");
    }

    #[test]
    fn flags_win_over_files() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[output]\nformat = \"passage-json\"").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .with_flags(Some("token-simple"), true)
            .expect("flags to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "token-simple");
        assert!(config.tokenizer.macro_names);
    }

    #[test]
    fn absent_flags_change_nothing() {
        let config = Loader::new()
            .with_flags(None, false)
            .expect("flags to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "token-log");
        assert!(!config.tokenizer.macro_names);
    }

    #[test]
    fn required_file_must_exist() {
        let result = Loader::new().with_file("definitely/not/here.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_policy() {
        let result = Loader::new()
            .set_override("diagnostics.unterminated_strings", "shout")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
