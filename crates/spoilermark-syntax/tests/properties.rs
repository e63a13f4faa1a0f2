//! Property-based tests for spoiler masking.
//!
//! Messages are generated from a small alphabet that is dense in `!` and
//! whitespace so that markers, splits and odd runs meet in every arrangement.

use proptest::prelude::*;
use spoilermark_syntax::{Masker, SPLIT_DELIMITERS, TokenKind, mask, match_spans, tokenize};

fn message_from(alphabet: Vec<char>) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(alphabet), 0..40)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Messages rich in markup.
fn message_strategy() -> impl Strategy<Value = String> {
    message_from(vec!['!', '!', '!', 'a', 'b', 'ネ', ' ', '\u{3000}', '\r', '\n', '\t'])
}

/// Messages that never contain `!`.
fn plain_message_strategy() -> impl Strategy<Value = String> {
    message_from(vec!['a', 'b', '*', 'ネ', ' ', '\u{3000}', '\r', '\n', '\t'])
}

proptest! {
    #[test]
    fn tokens_reconstruct_the_message(message in message_strategy()) {
        let reconstructed: String = tokenize(&message).iter().map(|t| t.text).collect();
        prop_assert_eq!(reconstructed, message);
    }

    #[test]
    fn tokens_respect_kind_shapes(message in message_strategy()) {
        for token in tokenize(&message) {
            match token.kind {
                TokenKind::Marker => {
                    prop_assert_eq!(token.text, "!!");
                }
                TokenKind::Split => {
                    prop_assert_eq!(token.rune_len(), 1);
                }
                TokenKind::Content => {
                    prop_assert!(!token.text.is_empty());
                    prop_assert!(!token.text.contains("!!"));
                    prop_assert!(!token.text.contains(SPLIT_DELIMITERS));
                }
            }
        }
    }

    #[test]
    fn spans_are_bounded_by_markers(message in message_strategy()) {
        let tokens = tokenize(&message);
        for span in match_spans(&tokens) {
            prop_assert!(span.start < span.end);
            prop_assert!(tokens[span.start].is_marker());
            prop_assert!(tokens[span.end].is_marker());
        }
    }

    #[test]
    fn messages_without_bangs_are_unchanged(message in plain_message_strategy()) {
        prop_assert_eq!(mask(&message), message);
    }

    #[test]
    fn masking_never_grows_the_message(message in message_strategy()) {
        let masked = mask(&message);
        prop_assert!(masked.chars().count() <= message.chars().count());
    }

    #[test]
    fn fully_masked_output_is_stable(message in message_strategy()) {
        let masked = mask(&message);
        if !masked.contains('!') {
            prop_assert_eq!(mask(&masked), masked);
        }
    }

    #[test]
    fn mask_char_only_changes_masked_positions(message in message_strategy()) {
        let stars = Masker::new('*').mask(&message);
        let hashes = Masker::new('#').mask(&message);
        prop_assert_eq!(stars.chars().count(), hashes.chars().count());
        for (s, h) in stars.chars().zip(hashes.chars()) {
            prop_assert!(s == h || (s == '*' && h == '#'));
        }
    }

    #[test]
    fn trace_agrees_with_mask(message in message_strategy()) {
        prop_assert_eq!(Masker::default().trace(&message).output, mask(&message));
    }
}
