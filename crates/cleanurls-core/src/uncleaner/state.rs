//! Parse state threaded through the uncleaner's node steps.

use std::collections::VecDeque;

use crate::url_model::decode_segment;

use super::node::Node;

/// One path segment, as received and decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    pub raw: String,
    pub decoded: String,
}

/// Remaining segments plus the node reached so far. Owned by one unclean call.
#[derive(Debug)]
pub(crate) struct ParseState {
    remaining: VecDeque<Segment>,
    consumed: usize,
    pub node: Node,
}

impl ParseState {
    pub fn new(path: &str) -> Self {
        let remaining = if path.is_empty() {
            VecDeque::new()
        } else {
            path.split('/')
                .map(|raw| Segment {
                    raw: raw.to_string(),
                    decoded: decode_segment(raw),
                })
                .collect()
        };
        Self {
            remaining,
            consumed: 0,
            node: Node::Root,
        }
    }

    pub fn is_done(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Only a trailing `/` is left.
    pub fn at_trailing_slash(&self) -> bool {
        self.remaining.len() == 1 && self.remaining[0].raw.is_empty()
    }

    /// Decoded value of the next segment.
    pub fn peek(&self) -> Option<&str> {
        self.remaining.front().map(|s| s.decoded.as_str())
    }

    /// Decoded values of the next `n` segments, if that many remain.
    pub fn peek_n(&self, n: usize) -> Option<Vec<&str>> {
        if self.remaining.len() < n {
            return None;
        }
        Some(
            self.remaining
                .iter()
                .take(n)
                .map(|s| s.decoded.as_str())
                .collect(),
        )
    }

    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.remaining.len());
        self.remaining.drain(..n);
        self.consumed += n;
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Unconsumed part of the path, as received.
    pub fn remaining_path(&self) -> String {
        self.remaining
            .iter()
            .map(|s| s.raw.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}
