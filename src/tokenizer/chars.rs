//! Character classes used by the scanner

use once_cell::sync::Lazy;
use regex::Regex;

/// Lazy-compiled matcher for the Unicode `Emoji` property on a single character
static EMOJI_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Emoji}$").unwrap());

const OPERATOR_CHARS: &[char] = &['+', '-', '*', '/', '=', '<', '>', '&', '!', '%', '|'];

/// Characters that open a double-quoted string
pub const DOUBLE_QUOTE_OPENERS: &[char] = &['"', '\u{201C}', '\u{201D}'];

pub fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Letters, digits, underscore and hyphen: the body of words and variable names
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(&c)
}

/// Characters carrying the Unicode `Emoji` property.
///
/// This includes `#`, `*` and the ASCII digits. Digits never reach this check because
/// the number rule claims them first.
pub fn is_emoji(c: char) -> bool {
    let mut buf = [0u8; 4];
    EMOJI_REGEX.is_match(c.encode_utf8(&mut buf))
}

/// Characters that close a string opened by `open`.
///
/// A closing curly quote used as an opener has no closer and runs to the end of input.
pub fn closing_quotes(open: char) -> &'static [char] {
    match open {
        '"' => &['"', '\u{201D}'],
        '\u{201C}' => &['\u{201D}', '"'],
        _ => &[],
    }
}
