//! # twee
//!
//! Passage splitting and body tokenization for the twee story format.
//!
//! A twee file is split into [passages](passage) by its `::` header lines, and each
//! passage body is turned into a flat [token](tokenizer) stream for a downstream
//! macro/expression parser. Both stages are pure functions over text and never fail:
//! malformed headers degrade to a plain title and unterminated strings are flagged on
//! the token itself.
//!
//! The [processor] module drives both stages over whole files and renders the results,
//! configured through [config].

pub mod config;
pub mod passage;
pub mod processor;
pub mod tokenizer;

pub use passage::{split_passages, Passage};
pub use tokenizer::{tokenize, Token, TokenKind};
