//! Tokenizer for passage bodies
//!
//! This module turns the body text of a single passage into a flat sequence of typed
//! tokens for a downstream macro/expression parser.
//!
//! Disambiguation
//!
//!     Many lexical forms overlap in authored text: an apostrophe can be a possessive, a
//!     contraction or the start of a string; `[=` is a bracket digraph while `[` is a
//!     plain bracket; `?` is punctuation unless it follows a colon. The scanner resolves
//!     these using at most two characters of lookahead, the raw character behind the
//!     cursor and the kind of the previously emitted token. Rules are tried in a fixed
//!     priority order, see [lexer_impl](lexer_impl).
//!
//! Failure Semantics
//!
//!     Tokenizing never fails. Whitespace is skipped, any character that no rule claims
//!     becomes a one character text token, and a string that runs to the end of input is
//!     returned with `unterminated: true`. Callers decide whether that flag is a warning
//!     or an error.

pub mod chars;
pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::{
    tokenize, tokenize_with_options, tokenize_with_spans, Tokenizer, TokenizerOptions,
};
pub use tokens::{Token, TokenKind};
