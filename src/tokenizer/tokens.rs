//! Token definitions for twee passage bodies
//!
//! Every token produced by the [scanner](super::lexer_impl) is one of the variants below.
//! Structural tokens keep their literal punctuation, payload tokens keep the scanned
//! substring, and only [`Token::String`] carries the `unterminated` flag.
use serde::{Deserialize, Serialize};
use std::fmt;

/// All possible tokens in a passage body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// `(` or `)`
    Paren(char),
    /// `[`, `]` and the digraphs `[=`, `=]`, `{=`, `=}`
    Bracket(String),
    /// `{` or `}`
    Brace(char),
    Colon,
    Semicolon,
    Comma,
    /// A word immediately followed by `:` (only with macro name recognition enabled)
    MacroName(String),
    /// `$name`, `_name` or `?name`, sigil included
    Variable(String),
    /// Quoted text without its delimiters
    String { value: String, unterminated: bool },
    Number(String),
    Operator(String),
    Emoji(char),
    Text(String),
}

/// Fieldless mirror of [`Token`], used for lookback decisions and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Paren,
    Bracket,
    Brace,
    Colon,
    Semicolon,
    Comma,
    MacroName,
    Variable,
    String,
    Number,
    Operator,
    Emoji,
    Text,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Paren(_) => TokenKind::Paren,
            Token::Bracket(_) => TokenKind::Bracket,
            Token::Brace(_) => TokenKind::Brace,
            Token::Colon => TokenKind::Colon,
            Token::Semicolon => TokenKind::Semicolon,
            Token::Comma => TokenKind::Comma,
            Token::MacroName(_) => TokenKind::MacroName,
            Token::Variable(_) => TokenKind::Variable,
            Token::String { .. } => TokenKind::String,
            Token::Number(_) => TokenKind::Number,
            Token::Operator(_) => TokenKind::Operator,
            Token::Emoji(_) => TokenKind::Emoji,
            Token::Text(_) => TokenKind::Text,
        }
    }

    /// The token's payload as text (string tokens yield their unquoted value)
    pub fn value(&self) -> String {
        match self {
            Token::Paren(c) | Token::Brace(c) | Token::Emoji(c) => c.to_string(),
            Token::Colon => ":".to_string(),
            Token::Semicolon => ";".to_string(),
            Token::Comma => ",".to_string(),
            Token::Bracket(s)
            | Token::MacroName(s)
            | Token::Variable(s)
            | Token::Number(s)
            | Token::Operator(s)
            | Token::Text(s) => s.clone(),
            Token::String { value, .. } => value.clone(),
        }
    }

    /// True only for a string token whose closing delimiter was never found
    pub fn is_unterminated(&self) -> bool {
        matches!(
            self,
            Token::String {
                unterminated: true,
                ..
            }
        )
    }
}

impl TokenKind {
    /// Lower-case name used by the simple output format
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Paren => "paren",
            TokenKind::Bracket => "bracket",
            TokenKind::Brace => "brace",
            TokenKind::Colon => "colon",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Comma => "comma",
            TokenKind::MacroName => "macroName",
            TokenKind::Variable => "variable",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Operator => "operator",
            TokenKind::Emoji => "emoji",
            TokenKind::Text => "text",
        }
    }

    /// Upper-case label used by the log output format
    pub fn label(&self) -> String {
        match self {
            // established spelling of the comma label
            TokenKind::Comma => "COMA".to_string(),
            _ => self.name().to_uppercase(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::String {
                value,
                unterminated: true,
            } => write!(f, "<string:{}:unterminated>", value),
            _ => write!(f, "<{}:{}>", self.kind().name(), self.value()),
        }
    }
}
