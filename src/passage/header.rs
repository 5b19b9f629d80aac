//! Passage header parsing
//!
//! A header line is `::` followed by a title and up to two bracketed, space separated
//! lists: `:: Title [tag1 tag2] [config]`. The part after the marker is lexed with
//! logos into text and bracket tokens, then walked by a small state machine.
//!
//! Anything that does not fit the grammar (unbalanced or nested brackets, text after a
//! bracket group, a third group, an empty title) is tolerated: the trimmed remainder of
//! the line becomes the title and both lists stay empty.

use logos::Logos;

/// The `::` marker that starts a header line
pub const HEADER_MARKER: &str = "::";

/// Tokens of the header remainder (the text after `::`)
#[derive(Logos, Debug, PartialEq, Clone)]
enum HeaderToken {
    #[token("[")]
    Open,
    #[token("]")]
    Close,
    #[regex(r"[^\[\]]+")]
    Text,
}

/// Parsed header fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    pub title: String,
    pub tags: Vec<String>,
    pub config: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Title,
    BetweenGroups,
    InGroup,
}

/// Parse the text following the `::` marker of a header line.
pub fn parse_header(remainder: &str) -> Header {
    parse_well_formed(remainder).unwrap_or_else(|| Header {
        title: remainder.trim().to_string(),
        ..Header::default()
    })
}

fn parse_well_formed(remainder: &str) -> Option<Header> {
    let mut lexer = HeaderToken::lexer(remainder);
    let mut state = State::Title;
    let mut title = "";
    let mut group = "";
    let mut groups: Vec<&str> = Vec::new();

    while let Some(result) = lexer.next() {
        let token = result.ok()?;
        let slice = lexer.slice();
        state = match (state, token) {
            (State::Title, HeaderToken::Text) => {
                title = slice;
                State::BetweenGroups
            }
            (State::BetweenGroups, HeaderToken::Text) if slice.trim().is_empty() => {
                State::BetweenGroups
            }
            (State::Title | State::BetweenGroups, HeaderToken::Open) => {
                group = "";
                State::InGroup
            }
            (State::InGroup, HeaderToken::Text) => {
                group = slice;
                State::InGroup
            }
            (State::InGroup, HeaderToken::Close) => {
                groups.push(group);
                State::BetweenGroups
            }
            _ => return None,
        };
    }

    let title = title.trim();
    if state == State::InGroup || title.is_empty() || groups.len() > 2 {
        return None;
    }

    let mut lists = groups.into_iter().map(split_list);
    Some(Header {
        title: title.to_string(),
        tags: lists.next().unwrap_or_default(),
        config: lists.next().unwrap_or_default(),
    })
}

/// Split bracket contents on single spaces, dropping empty pieces
fn split_list(contents: &str) -> Vec<String> {
    contents
        .split(' ')
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
