//! # Lexer - Tokenizing Message Bodies
//!
//! This module provides the first stage of masking: breaking a message into
//! [`Marker`], [`Content`] and [`Split`] tokens. Raw scanning is done by the
//! [Logos] lexer generator; the token boundaries the matcher relies on are
//! then rebuilt from the raw classes.
//!
//! [Logos]: https://docs.rs/logos
//! [`Marker`]: TokenKind::Marker
//! [`Content`]: TokenKind::Content
//! [`Split`]: TokenKind::Split
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! so concatenating the token texts gives back the message:
//!
//! ```
//! use spoilermark_syntax::lexer::tokenize;
//!
//! let input = "look !!behind you!!\n";
//! let tokens = tokenize(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Raw Classes vs Tokens
//!
//! Logos sees four raw classes: a run of two or more `!`, a lone `!`, one
//! split delimiter, and a run of anything else. A lone `!` is plain text, so
//! it is folded into the pending content window together with the text runs
//! around it (`"hi!"` is one content token). A `!` run is cut into markers
//! two bytes at a time; an odd run leaves one `!` behind as its own content
//! token, which is never merged with the text that follows it:
//!
//! ```text
//! "!!!ab" → [MARKER("!!"), CONTENT("!"), CONTENT("ab")]
//! ```

use std::ops::Range;

use logos::Logos;

/// Characters that always become a [`TokenKind::Split`] token of their own.
pub const SPLIT_DELIMITERS: [char; 4] = [' ', '\u{3000}', '\r', '\n'];

/// The text of a single marker token.
pub const MARKER: &str = "!!";

/// Raw classes recognised by Logos before content windows are merged.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawKind {
    /// Two or more consecutive `!`
    #[regex("!!+")]
    Bangs,

    /// A single `!` that is not part of a run
    #[token("!")]
    Bang,

    /// One split delimiter
    #[token(" ")]
    #[token("\u{3000}")]
    #[token("\r")]
    #[token("\n")]
    Split,

    /// Anything else
    #[regex(r"[^! \r\n\u{3000}]+")]
    Text,
}

/// Kind of a token in a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Exactly two `!`, a candidate spoiler boundary
    Marker,
    /// Ordinary text, including lone `!`
    Content,
    /// A single whitespace delimiter (see [`SPLIT_DELIMITERS`])
    Split,
}

/// A token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl Token<'_> {
    /// Number of code points in the token text.
    pub fn rune_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_split(&self) -> bool {
        self.kind == TokenKind::Split
    }

    pub fn is_marker(&self) -> bool {
        self.kind == TokenKind::Marker
    }
}

/// Tokenize a message body.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    tokenize_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Tokenize and return tokens along with their byte spans.
pub fn tokenize_with_spans(input: &str) -> Vec<(Token<'_>, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = RawKind::lexer(input);
    let mut content_start = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(RawKind::Split) => {
                flush_content(&mut tokens, input, content_start..span.start);
                push(&mut tokens, input, TokenKind::Split, span.clone());
                content_start = span.end;
            }
            Ok(RawKind::Bangs) => {
                flush_content(&mut tokens, input, content_start..span.start);

                let mut pos = span.start;
                while span.end - pos >= MARKER.len() {
                    push(&mut tokens, input, TokenKind::Marker, pos..pos + MARKER.len());
                    pos += MARKER.len();
                }
                if pos < span.end {
                    push(&mut tokens, input, TokenKind::Content, pos..span.end);
                }
                content_start = span.end;
            }
            // Text runs and lone `!` grow the pending content window.
            // Logos errors cannot occur since every character has a class,
            // but they would be content too.
            Ok(RawKind::Text) | Ok(RawKind::Bang) | Err(_) => {}
        }
    }

    flush_content(&mut tokens, input, content_start..input.len());
    tokens
}

fn push<'a>(
    tokens: &mut Vec<(Token<'a>, Range<usize>)>,
    input: &'a str,
    kind: TokenKind,
    range: Range<usize>,
) {
    let text = &input[range.clone()];
    tokens.push((Token { kind, text }, range));
}

fn flush_content<'a>(
    tokens: &mut Vec<(Token<'a>, Range<usize>)>,
    input: &'a str,
    range: Range<usize>,
) {
    if range.end > range.start {
        push(tokens, input, TokenKind::Content, range);
    }
}
