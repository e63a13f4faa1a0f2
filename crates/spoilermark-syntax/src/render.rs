//! Renders a tokenized message with its spoiler spans masked.

use std::iter;

use crate::lexer::Token;
use crate::matcher::Span;

/// Character used to hide spoiler content.
pub const MASK_CHAR: char = '*';

/// What a token renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    /// The original text.
    Verbatim,
    /// Nothing (span boundary).
    Elided,
    /// A run of mask characters.
    Masked(usize),
}

impl Body {
    fn rune_len(self, token: &Token<'_>) -> usize {
        match self {
            Body::Verbatim => token.rune_len(),
            Body::Elided => 0,
            Body::Masked(len) => len,
        }
    }
}

/// Concatenate the tokens, eliding span boundaries and masking everything
/// between them.
///
/// Spans are applied in order against the current body of each token, so a
/// boundary elided by an earlier overlapping span stays empty. A span whose
/// start is not before its end only elides its two boundaries.
pub fn render(tokens: &[Token<'_>], spans: &[Span], mask: char) -> String {
    let mut bodies = vec![Body::Verbatim; tokens.len()];

    for span in spans {
        bodies[span.start] = Body::Elided;
        bodies[span.end] = Body::Elided;
        for k in span.start..span.end {
            bodies[k] = match bodies[k].rune_len(&tokens[k]) {
                0 => Body::Elided,
                len => Body::Masked(len),
            };
        }
    }

    let mut out = String::with_capacity(tokens.iter().map(|t| t.text.len()).sum());
    for (token, body) in tokens.iter().zip(bodies) {
        match body {
            Body::Verbatim => out.push_str(token.text),
            Body::Elided => {}
            Body::Masked(len) => out.extend(iter::repeat_n(mask, len)),
        }
    }
    out
}
