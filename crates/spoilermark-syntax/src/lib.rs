//! # spoilermark-syntax
//!
//! Spoiler markup for chat messages: text wrapped in `!!` is hidden behind
//! mask characters before a message is stored or shown.
//!
//! ```
//! assert_eq!(spoilermark_syntax::mask("the butler !!did it!!"), "the butler ******");
//! ```
//!
//! ## Architecture Overview
//!
//! Masking is a pure function of the message body with three stages:
//!
//! ```text
//! Message → Lexer → Tokens → Matcher → Spans → Render → Masked message
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Splits the message into `Marker` (`!!`), `Split` (one whitespace
//! delimiter) and `Content` tokens. Every byte lands in exactly one token.
//!
//! ```text
//! "!!a!! b" → [MARKER, CONTENT("a"), MARKER, SPLIT(" "), CONTENT("b")]
//! ```
//!
//! ### 2. Matcher ([`matcher`] module)
//!
//! Pairs markers into [`Span`]s of token indices. Markers touching
//! whitespace on the inward side, or with nothing between them, do not pair.
//! Unbalanced markers are reconciled after the scan.
//!
//! ### 3. Render ([`render`] module)
//!
//! Drops the two boundary markers of every span and replaces each token in
//! between with as many mask characters as it had code points.
//!
//! ## Malformed Markup
//!
//! There is no error path. Any marker that cannot be paired is left in the
//! output as literal `!!`.

pub mod lexer;
pub mod matcher;
pub mod render;

use std::fmt;
use std::ops::Range;

use log::trace;

pub use lexer::{SPLIT_DELIMITERS, Token, TokenKind, tokenize, tokenize_with_spans};
pub use matcher::{Span, match_spans};
pub use render::{MASK_CHAR, render};

/// Mask every spoiler in `text` with [`MASK_CHAR`].
pub fn mask(text: &str) -> String {
    Masker::default().mask(text)
}

/// Masks spoilers using a chosen mask character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Masker {
    mask_char: char,
}

impl Default for Masker {
    fn default() -> Self {
        Self::new(MASK_CHAR)
    }
}

impl Masker {
    pub fn new(mask_char: char) -> Self {
        Self { mask_char }
    }

    pub fn mask_char(&self) -> char {
        self.mask_char
    }

    pub fn mask(&self, text: &str) -> String {
        if !text.contains('!') {
            return text.to_owned();
        }

        let tokens = tokenize(text);
        trace!("tokens {tokens:?}");
        let spans = match_spans(&tokens);
        render(&tokens, &spans, self.mask_char)
    }

    /// Mask `text` and keep the intermediate tokens and spans.
    pub fn trace<'a>(&self, text: &'a str) -> Trace<'a> {
        let tokens = tokenize_with_spans(text);
        let plain: Vec<Token<'a>> = tokens.iter().map(|(token, _)| token.clone()).collect();
        let spans = match_spans(&plain);
        let output = render(&plain, &spans, self.mask_char);

        Trace {
            tokens,
            spans,
            output,
        }
    }
}

/// Intermediate results of masking one message.
///
/// The `Display` form lists one token per line with its byte range, then the
/// resolved spans and the final output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace<'a> {
    pub tokens: Vec<(Token<'a>, Range<usize>)>,
    pub spans: Vec<Span>,
    pub output: String,
}

impl fmt::Display for Trace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (token, range)) in self.tokens.iter().enumerate() {
            writeln!(f, "{i}: {:?}@{:?} {:?}", token.kind, range, token.text)?;
        }
        for span in &self.spans {
            writeln!(f, "span {span}")?;
        }
        write!(f, "output {:?}", self.output)
    }
}
