//! # Matcher - Pairing Markers Into Spans
//!
//! Walks the token sequence once and decides, marker by marker, whether it
//! opens a spoiler, closes one, or is dropped. Decisions only look at the
//! neighbouring tokens:
//!
//! - A marker may **open** when the token after it is not whitespace.
//! - A marker may **close** when the token before it is not whitespace and it
//!   is not directly after the start it would close (`!!!!` is not an empty
//!   spoiler).
//! - Inside a spoiler, a marker that cannot close but could open records a
//!   fresh start instead.
//!
//! The state is [`State::Inside`] for as long as more starts than ends have
//! been recorded, so after a restart one end does not leave the spoiler and a
//! later marker may record a second end. Those spans can overlap; the
//! renderer applies them in order.
//!
//! ## Reconciliation
//!
//! A forward pass cannot know whether an earlier start was abandoned. When
//! starts outnumber ends after the scan, starts are paired with ends from the
//! back, preferring the latest start that still precedes each end. Starts
//! left over are discarded and their markers render literally.

use std::fmt;

use log::debug;

use crate::lexer::Token;

/// A resolved pair of marker token indices. Both boundaries are elided and
/// everything between them is masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    /// As many ends as starts recorded so far.
    #[default]
    Outside,
    /// `open` more starts than ends recorded so far.
    Inside { open: usize },
}

#[derive(Debug, Default)]
struct SpanMatcher {
    state: State,
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl SpanMatcher {
    fn visit(&mut self, tokens: &[Token<'_>], i: usize) {
        let next = lookahead(tokens, i);

        match self.state {
            State::Outside => {
                if next.is_some_and(|t| !t.is_split()) {
                    self.record_start(i, 0);
                } else {
                    debug!("marker {i} dropped outside a spoiler");
                }
            }
            State::Inside { open } => {
                let prev = i.checked_sub(1).map(|p| &tokens[p]);
                let touches_start = self.starts.last().copied() == i.checked_sub(1);

                if prev.is_some_and(|t| !t.is_split()) && !touches_start {
                    self.record_end(i, open);
                } else if next.is_none_or(|t| !t.is_split()) {
                    self.record_start(i, open);
                } else {
                    debug!("marker {i} dropped inside a spoiler");
                }
            }
        }
    }

    fn record_start(&mut self, i: usize, open: usize) {
        debug!("marker {i} starts a spoiler");
        self.starts.push(i);
        self.state = State::Inside { open: open + 1 };
    }

    fn record_end(&mut self, i: usize, open: usize) {
        debug!("marker {i} ends a spoiler");
        self.ends.push(i);
        self.state = match open {
            1 => State::Outside,
            _ => State::Inside { open: open - 1 },
        };
    }

    fn finish(self) -> Vec<Span> {
        let Self { starts, ends, .. } = self;
        debug!("recorded starts {starts:?} ends {ends:?}");

        let starts = if starts.len() > ends.len() {
            reconcile(&starts, &ends)
        } else {
            starts
        };

        starts
            .into_iter()
            .zip(ends)
            .map(|(start, end)| Span { start, end })
            .collect()
    }
}

/// The token after `i`. The last token of the sequence is never returned.
fn lookahead<'t, 'a>(tokens: &'t [Token<'a>], i: usize) -> Option<&'t Token<'a>> {
    if i + 2 < tokens.len() {
        tokens.get(i + 1)
    } else {
        None
    }
}

/// Keep the starts that pair with an end, scanning both lists from the back.
fn reconcile(starts: &[usize], ends: &[usize]) -> Vec<usize> {
    let mut kept = Vec::with_capacity(ends.len());
    let mut remaining = ends.iter().rev().peekable();

    for &start in starts.iter().rev() {
        let Some(&&end) = remaining.peek() else {
            break;
        };
        if end < start {
            continue;
        }
        kept.push(start);
        remaining.next();
    }

    kept.reverse();
    kept
}

/// Pair the marker tokens of a message into spoiler spans.
pub fn match_spans(tokens: &[Token<'_>]) -> Vec<Span> {
    let mut matcher = SpanMatcher::default();
    for (i, token) in tokens.iter().enumerate() {
        if token.is_marker() {
            matcher.visit(tokens, i);
        }
    }

    let spans = matcher.finish();
    debug!("resolved spans {spans:?}");
    spans
}
