//! Implementation of the passage body scanner
//!
//! The scanner walks the body one decision point at a time. Each decision looks at
//! the current character, at most two characters ahead, the raw character behind the
//! cursor and the kind of the last emitted token. Rules are tried in priority order
//! and every rule consumes at least one character, so the scan always terminates.

use super::chars::{
    closing_quotes, is_emoji, is_letter, is_operator_char, is_word_char, DOUBLE_QUOTE_OPENERS,
};
use super::tokens::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Knobs for the scanner. The defaults give the standard token stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerOptions {
    /// Emit `MacroName` for a word directly followed by `:` (the colon is consumed).
    #[serde(default)]
    pub macro_names: bool,
}

/// Cursor-based scanner over a single passage body.
///
/// Yields tokens together with the byte range they were scanned from.
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    last_kind: Option<TokenKind>,
    options: TokenizerOptions,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            last_kind: None,
            options: TokenizerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TokenizerOptions) -> Self {
        self.options = options;
        self
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    /// The raw character just behind the cursor
    fn prev_char(&self) -> Option<char> {
        self.source[..self.pos].chars().next_back()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len());
        self.pos += len;
        &self.source[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        self.eat_while(char::is_whitespace);
    }

    fn scan(&mut self, current: char) -> Token {
        let next = self.peek_at(1);
        match current {
            '[' | '{' if next == Some('=') => {
                self.pos += 2;
                Token::Bracket(format!("{}=", current))
            }
            '=' if matches!(next, Some(']') | Some('}')) => {
                self.pos += 2;
                Token::Bracket(format!("={}", next.unwrap_or_default()))
            }
            '(' | ')' => {
                self.bump();
                Token::Paren(current)
            }
            '[' | ']' => {
                self.bump();
                Token::Bracket(current.to_string())
            }
            '{' | '}' => {
                self.bump();
                Token::Brace(current)
            }
            ':' => {
                self.bump();
                Token::Colon
            }
            ';' => {
                self.bump();
                Token::Semicolon
            }
            ',' => {
                self.bump();
                Token::Comma
            }
            '.' => {
                if next == Some('.') && self.peek_at(2) == Some('.') {
                    self.pos += 3;
                    Token::Text("...".to_string())
                } else {
                    self.bump();
                    Token::Text(".".to_string())
                }
            }
            '$' | '_' => self.variable(),
            '?' if self.last_kind == Some(TokenKind::Colon) && next.is_some_and(is_letter) => {
                self.variable()
            }
            '\'' => self.apostrophe(next),
            c if DOUBLE_QUOTE_OPENERS.contains(&c) => {
                self.bump();
                self.quoted(closing_quotes(c))
            }
            c if c.is_ascii_digit() => {
                Token::Number(self.eat_while(|c| c.is_ascii_digit()).to_string())
            }
            c if is_emoji(c) => {
                self.bump();
                Token::Emoji(c)
            }
            c if is_operator_char(c) => {
                self.bump();
                let mut op = c.to_string();
                if next == Some('=') {
                    self.bump();
                    op.push('=');
                }
                Token::Operator(op)
            }
            c if is_word_char(c) => self.word(),
            c => {
                self.bump();
                Token::Text(c.to_string())
            }
        }
    }

    /// Sigil followed by the longest run of name characters
    fn variable(&mut self) -> Token {
        let start = self.pos;
        self.bump();
        self.eat_while(is_word_char);
        Token::Variable(self.source[start..self.pos].to_string())
    }

    fn apostrophe(&mut self, next: Option<char>) -> Token {
        let possessive =
            self.last_kind == Some(TokenKind::Variable) && next.is_some_and(is_letter);
        let contraction = self.prev_char().is_some_and(|c| c.is_ascii_alphanumeric())
            && next.is_some_and(|c| c.is_ascii_alphanumeric());

        self.bump();
        if possessive || contraction {
            return Token::Text("'".to_string());
        }
        self.quoted(&['\''])
    }

    /// Scan a string body after its opening delimiter has been consumed
    fn quoted(&mut self, closers: &[char]) -> Token {
        let rest = self.rest();
        match rest.char_indices().find(|(_, c)| closers.contains(c)) {
            Some((offset, close)) => {
                self.pos += offset + close.len_utf8();
                Token::String {
                    value: rest[..offset].to_string(),
                    unterminated: false,
                }
            }
            None => {
                self.pos = self.source.len();
                Token::String {
                    value: rest.to_string(),
                    unterminated: true,
                }
            }
        }
    }

    fn word(&mut self) -> Token {
        let word = self.eat_while(is_word_char).to_string();
        if self.options.macro_names && self.rest().starts_with(':') {
            self.bump();
            return Token::MacroName(word);
        }
        Token::Text(word)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = (Token, Range<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let current = self.rest().chars().next()?;
        let start = self.pos;
        let token = self.scan(current);
        self.last_kind = Some(token.kind());
        Some((token, start..self.pos))
    }
}

/// Convenience function to tokenize a passage body and collect all tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).map(|(token, _)| token).collect()
}

/// Convenience function to tokenize a passage body and collect tokens with their spans
pub fn tokenize_with_spans(source: &str) -> Vec<(Token, Range<usize>)> {
    Tokenizer::new(source).collect()
}

/// Tokenize with explicit scanner options
pub fn tokenize_with_options(source: &str, options: TokenizerOptions) -> Vec<Token> {
    Tokenizer::new(source)
        .with_options(options)
        .map(|(token, _)| token)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    fn string(s: &str, unterminated: bool) -> Token {
        Token::String {
            value: s.to_string(),
            unterminated,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_whitespace_only() {
        assert!(tokenize("  \t\n  \r\n").is_empty());
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(tokenize("hello world"), vec![text("hello"), text("world")]);
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(
            tokenize("( ) [ ] { } : ; ,"),
            vec![
                Token::Paren('('),
                Token::Paren(')'),
                Token::Bracket("[".to_string()),
                Token::Bracket("]".to_string()),
                Token::Brace('{'),
                Token::Brace('}'),
                Token::Colon,
                Token::Semicolon,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_bracket_digraphs() {
        assert_eq!(
            tokenize("[=a=]{=b=}"),
            vec![
                Token::Bracket("[=".to_string()),
                text("a"),
                Token::Bracket("=]".to_string()),
                Token::Bracket("{=".to_string()),
                text("b"),
                Token::Bracket("=}".to_string()),
            ]
        );
    }

    #[test]
    fn test_ellipsis_and_period() {
        assert_eq!(
            tokenize("Wait... now. ."),
            vec![text("Wait"), text("..."), text("now"), text("."), text(".")]
        );
        assert_eq!(tokenize("...."), vec![text("..."), text(".")]);
    }

    #[test]
    fn test_variables() {
        assert_eq!(
            tokenize("$gold _temp-1 $a_b"),
            vec![
                Token::Variable("$gold".to_string()),
                Token::Variable("_temp-1".to_string()),
                Token::Variable("$a_b".to_string()),
            ]
        );
    }

    #[test]
    fn test_bare_sigil_is_a_variable() {
        assert_eq!(tokenize("$"), vec![Token::Variable("$".to_string())]);
    }

    #[test]
    fn test_question_variable_needs_colon() {
        assert_eq!(
            tokenize("(if: ?who)"),
            vec![
                Token::Paren('('),
                text("if"),
                Token::Colon,
                Token::Variable("?who".to_string()),
                Token::Paren(')'),
            ]
        );
        assert_eq!(tokenize("why?no"), vec![text("why"), text("?"), text("no")]);
        assert_eq!(tokenize(":?1"), vec![Token::Colon, text("?"), Token::Number("1".to_string())]);
    }

    #[test]
    fn test_possessive_apostrophe() {
        assert_eq!(
            tokenize("$hero's sword"),
            vec![
                Token::Variable("$hero".to_string()),
                text("'"),
                text("s"),
                text("sword"),
            ]
        );
    }

    #[test]
    fn test_contraction_apostrophe() {
        assert_eq!(
            tokenize("don't stop"),
            vec![text("don"), text("'"), text("t"), text("stop")]
        );
    }

    #[test]
    fn test_single_quoted_strings() {
        assert_eq!(tokenize("'hello'"), vec![string("hello", false)]);
        assert_eq!(tokenize("'hello"), vec![string("hello", true)]);
        assert_eq!(tokenize("''"), vec![string("", false)]);
        assert_eq!(tokenize("'"), vec![string("", true)]);
    }

    #[test]
    fn test_apostrophe_after_space_opens_string() {
        assert_eq!(
            tokenize("say 'hi there' now"),
            vec![text("say"), string("hi there", false), text("now")]
        );
    }

    #[test]
    fn test_double_quoted_strings() {
        assert_eq!(tokenize("\"a b\""), vec![string("a b", false)]);
        assert_eq!(tokenize("\u{201C}curly\u{201D}"), vec![string("curly", false)]);
        assert_eq!(tokenize("\u{201C}mixed\""), vec![string("mixed", false)]);
        assert_eq!(tokenize("\"mixed\u{201D}"), vec![string("mixed", false)]);
        assert_eq!(tokenize("\"open"), vec![string("open", true)]);
    }

    #[test]
    fn test_straight_quote_does_not_close_on_opening_curly() {
        assert_eq!(
            tokenize("\"a\u{201C}b\""),
            vec![string("a\u{201C}b", false)]
        );
    }

    #[test]
    fn test_single_quote_inside_double_quotes() {
        assert_eq!(tokenize("\"it's\""), vec![string("it's", false)]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokenize("42 3.14"),
            vec![
                Token::Number("42".to_string()),
                Token::Number("3".to_string()),
                text("."),
                Token::Number("14".to_string()),
            ]
        );
        assert_eq!(
            tokenize("12abc"),
            vec![Token::Number("12".to_string()), text("abc")]
        );
    }

    #[test]
    fn test_emoji_are_separate_tokens() {
        assert_eq!(
            tokenize("🐉🔥"),
            vec![Token::Emoji('🐉'), Token::Emoji('🔥')]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokenize(">= > == != + -"),
            vec![
                Token::Operator(">=".to_string()),
                Token::Operator(">".to_string()),
                Token::Operator("==".to_string()),
                Token::Operator("!=".to_string()),
                Token::Operator("+".to_string()),
                Token::Operator("-".to_string()),
            ]
        );
        assert_eq!(
            tokenize("==="),
            vec![Token::Operator("==".to_string()), Token::Operator("=".to_string())]
        );
    }

    #[test]
    fn test_word_runs_keep_inner_hyphens_and_underscores() {
        assert_eq!(tokenize("go-to snake_case"), vec![text("go-to"), text("snake_case")]);
    }

    #[test]
    fn test_word_before_colon_is_text_by_default() {
        assert_eq!(
            tokenize("(set: $x to 1)"),
            vec![
                Token::Paren('('),
                text("set"),
                Token::Colon,
                Token::Variable("$x".to_string()),
                text("to"),
                Token::Number("1".to_string()),
                Token::Paren(')'),
            ]
        );
    }

    #[test]
    fn test_macro_names_option() {
        let options = TokenizerOptions { macro_names: true };
        assert_eq!(
            tokenize_with_options("(set: $x)", options),
            vec![
                Token::Paren('('),
                Token::MacroName("set".to_string()),
                Token::Variable("$x".to_string()),
                Token::Paren(')'),
            ]
        );
    }

    #[test]
    fn test_fallback_characters() {
        assert_eq!(
            tokenize("@ ^ é ~"),
            vec![text("@"), text("^"), text("é"), text("~")]
        );
    }

    #[test]
    fn test_emoji_rule_wins_over_operators_for_star_and_hash() {
        assert_eq!(
            tokenize("$a * 2 #"),
            vec![
                Token::Variable("$a".to_string()),
                Token::Emoji('*'),
                Token::Number("2".to_string()),
                Token::Emoji('#'),
            ]
        );
        assert_eq!(
            tokenize("*="),
            vec![Token::Emoji('*'), Token::Operator("=".to_string())]
        );
    }

    #[test]
    fn test_closing_curly_quote_as_opener_runs_to_end() {
        assert_eq!(
            tokenize("\u{201D}hi\u{201D} there"),
            vec![string("hi\u{201D} there", true)]
        );
    }

    #[test]
    fn test_spans_cover_delimiters() {
        let tokens = tokenize_with_spans("'hi' [=x=]");
        let spans: Vec<_> = tokens.iter().map(|(_, span)| span.clone()).collect();
        assert_eq!(spans, vec![0..4, 5..7, 7..8, 8..10]);
    }

    #[test]
    fn test_spans_with_multibyte_characters() {
        let source = "\u{201C}é\u{201D}🐉";
        let tokens = tokenize_with_spans(source);
        assert_eq!(tokens.len(), 2);
        assert_eq!(&source[tokens[0].1.clone()], "\u{201C}é\u{201D}");
        assert_eq!(&source[tokens[1].1.clone()], "🐉");
    }
}
