//! File processing API for twee files
//!
//! This module drives the two core stages over a whole file: passages are split out of
//! the source, and (for the token stage) every passage body is tokenized. The result is
//! rendered in one of several formats selected by a `<stage>-<format>` string such as
//! `passage-json` or `token-log`.
//!
//! Unterminated strings are reported here, not by the tokenizer. The
//! [`UnterminatedPolicy`] decides whether they are ignored, logged as warnings or turned
//! into a [`ProcessingError::UnterminatedString`].

use crate::config::TweeConfig;
use crate::passage::{split_passages, Passage};
use crate::tokenizer::{Token, Tokenizer, TokenizerOptions};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Represents the processing stage (what data to extract)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Passage,
    Token,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Yaml,
    Log,
}

/// Represents a complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

/// What to do with string tokens that never found their closing delimiter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnterminatedPolicy {
    Ignore,
    #[default]
    Warn,
    Error,
}

/// Errors that can occur during processing
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid stage: {0}")]
    InvalidStage(String),
    #[error("Invalid format type: {0}")]
    InvalidFormatType(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Unterminated string in passage '{passage}': {value:?}")]
    UnterminatedString { passage: String, value: String },
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

impl ProcessingSpec {
    /// Parse a format string like "token-log" or "passage-json"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let (stage, format) = format_str
            .split_once('-')
            .ok_or_else(|| ProcessingError::InvalidFormat(format_str.to_string()))?;

        let stage = match stage {
            "passage" => ProcessingStage::Passage,
            "token" => ProcessingStage::Token,
            _ => return Err(ProcessingError::InvalidStage(stage.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            "log" => OutputFormat::Log,
            _ => return Err(ProcessingError::InvalidFormatType(format.to_string())),
        };

        match (stage, format) {
            (ProcessingStage::Passage, OutputFormat::Log) => Err(
                ProcessingError::InvalidFormatType(
                    "Format 'log' only works with token stage".to_string(),
                ),
            ),
            (ProcessingStage::Token, OutputFormat::Yaml) => Err(
                ProcessingError::InvalidFormatType(
                    "Format 'yaml' only works with passage stage".to_string(),
                ),
            ),
            _ => Ok(ProcessingSpec { stage, format }),
        }
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        [
            (ProcessingStage::Passage, OutputFormat::Simple),
            (ProcessingStage::Passage, OutputFormat::Json),
            (ProcessingStage::Passage, OutputFormat::Yaml),
            (ProcessingStage::Token, OutputFormat::Simple),
            (ProcessingStage::Token, OutputFormat::Log),
            (ProcessingStage::Token, OutputFormat::Json),
        ]
        .into_iter()
        .map(|(stage, format)| ProcessingSpec { stage, format })
        .collect()
    }

    /// The format string this spec parses from
    pub fn name(&self) -> String {
        let stage = match self.stage {
            ProcessingStage::Passage => "passage",
            ProcessingStage::Token => "token",
        };
        let format = match self.format {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Log => "log",
        };
        format!("{}-{}", stage, format)
    }
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .iter()
        .map(ProcessingSpec::name)
        .collect()
}

/// Tokens of one passage, as serialized by the token-json format
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassageTokens<'a> {
    pub title: &'a str,
    pub tokens: Vec<Token>,
}

/// Runs the passage and token stages with a fixed spec and diagnostics policy
#[derive(Debug, Clone, PartialEq)]
pub struct Processor {
    pub spec: ProcessingSpec,
    pub policy: UnterminatedPolicy,
    pub tokenizer: TokenizerOptions,
}

impl Processor {
    pub fn new(spec: ProcessingSpec) -> Self {
        Self {
            spec,
            policy: UnterminatedPolicy::default(),
            tokenizer: TokenizerOptions::default(),
        }
    }

    pub fn from_config(config: &TweeConfig) -> Result<Self, ProcessingError> {
        Ok(Self {
            spec: ProcessingSpec::from_string(&config.output.format)?,
            policy: config.diagnostics.unterminated_strings,
            tokenizer: config.tokenizer,
        })
    }

    pub fn with_policy(mut self, policy: UnterminatedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_tokenizer_options(mut self, options: TokenizerOptions) -> Self {
        self.tokenizer = options;
        self
    }

    /// Process a twee file according to this processor's spec
    pub fn process_file<P: AsRef<Path>>(&self, file_path: P) -> Result<String, ProcessingError> {
        let file_path = file_path.as_ref();
        if !file_path.exists() {
            return Err(ProcessingError::FileNotFound(
                file_path.display().to_string(),
            ));
        }
        let content = fs::read_to_string(file_path)?;
        self.process_source(&content)
    }

    /// Process twee source text according to this processor's spec
    pub fn process_source(&self, source: &str) -> Result<String, ProcessingError> {
        let passages = split_passages(source);
        debug!(count = passages.len(), "split passages");

        match self.spec.stage {
            ProcessingStage::Passage => format_passages(&passages, self.spec.format),
            ProcessingStage::Token => {
                let tokenized = passages
                    .iter()
                    .map(|passage| self.tokenize_passage(passage))
                    .collect::<Result<Vec<_>, _>>()?;
                format_tokens(&passages, &tokenized, self.spec.format)
            }
        }
    }

    /// Tokenize one passage body, applying the unterminated string policy
    pub fn tokenize_passage(&self, passage: &Passage) -> Result<Vec<Token>, ProcessingError> {
        let tokens: Vec<Token> = Tokenizer::new(&passage.content)
            .with_options(self.tokenizer)
            .map(|(token, _)| token)
            .collect();
        debug!(passage = %passage.title, tokens = tokens.len(), "tokenized passage");

        for token in tokens.iter().filter(|t| t.is_unterminated()) {
            match self.policy {
                UnterminatedPolicy::Ignore => {}
                UnterminatedPolicy::Warn => {
                    warn!(passage = %passage.title, value = %token.value(), "unterminated string");
                }
                UnterminatedPolicy::Error => {
                    return Err(ProcessingError::UnterminatedString {
                        passage: passage.title.clone(),
                        value: token.value(),
                    });
                }
            }
        }

        Ok(tokens)
    }
}

/// Process a file with the given spec and default diagnostics
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
) -> Result<String, ProcessingError> {
    Processor::new(*spec).process_file(file_path)
}

/// Process source text with the given spec and default diagnostics
pub fn process_source(source: &str, spec: &ProcessingSpec) -> Result<String, ProcessingError> {
    Processor::new(*spec).process_source(source)
}

fn serialization_error(e: impl std::fmt::Display) -> ProcessingError {
    ProcessingError::Serialization(e.to_string())
}

/// Format passages according to the specified format
fn format_passages(passages: &[Passage], format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            for passage in passages {
                write_passage_block(&mut result, passage);
            }
            Ok(result)
        }
        OutputFormat::Json => serde_json::to_string_pretty(passages).map_err(serialization_error),
        OutputFormat::Yaml => serde_yaml::to_string(passages).map_err(serialization_error),
        OutputFormat::Log => Err(ProcessingError::InvalidFormatType(
            "log format only works with token stage".to_string(),
        )),
    }
}

/// Format per-passage token streams according to the specified format
fn format_tokens(
    passages: &[Passage],
    tokenized: &[Vec<Token>],
    format: OutputFormat,
) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            for (passage, tokens) in passages.iter().zip(tokenized) {
                let _ = writeln!(result, "== {} ==", passage.title);
                for token in tokens {
                    let _ = writeln!(result, "{}", token);
                }
            }
            Ok(result)
        }
        OutputFormat::Log => {
            let mut result = String::new();
            let _ = writeln!(result, "Parsed {} passages.", passages.len());
            for (passage, tokens) in passages.iter().zip(tokenized) {
                write_passage_block(&mut result, passage);
                for token in tokens {
                    let _ = writeln!(result, "[{}] {}", token.kind().label(), token.value());
                }
            }
            Ok(result)
        }
        OutputFormat::Json => {
            let entries: Vec<PassageTokens> = passages
                .iter()
                .zip(tokenized)
                .map(|(passage, tokens)| PassageTokens {
                    title: &passage.title,
                    tokens: tokens.clone(),
                })
                .collect();
            serde_json::to_string_pretty(&entries).map_err(serialization_error)
        }
        OutputFormat::Yaml => Err(ProcessingError::InvalidFormatType(
            "yaml format only works with passage stage".to_string(),
        )),
    }
}

/// The title/tags/config/content block shared by the simple and log formats
fn write_passage_block(out: &mut String, passage: &Passage) {
    let _ = writeln!(out, "\n== {} ==", passage.title);
    let _ = writeln!(out, "\n== {} ==", passage.tags.join(","));
    let _ = writeln!(out, "\n== {} ==", passage.config.join(","));
    let _ = writeln!(out, "\n== {} ==", passage.content);
}
