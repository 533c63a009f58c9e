//! Building trees from raw text with placeable parsers.

use super::StringTree;
use super::text;
use super::types::{Node, Part};
use crate::error::Result;

/// A node recognized at the start of some input.
#[derive(Debug, Clone)]
pub struct Parsed {
    /// Number of input characters the node stands for.
    pub consumed: usize,
    pub node: Node,
}

/// Recognizes a placeable at the start of a string.
///
/// Returning `None` (or consuming nothing) declines the input.
pub trait Parser {
    fn parse(&self, text: &str) -> Option<Parsed>;
}

impl<F> Parser for F
where
    F: Fn(&str) -> Option<Parsed>,
{
    fn parse(&self, text: &str) -> Option<Parsed> {
        self(text)
    }
}

/// The base parser: accepts any non-empty input whole, as a plain node.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainParser;

impl Parser for PlainParser {
    fn parse(&self, text: &str) -> Option<Parsed> {
        if text.is_empty() {
            return None;
        }
        Some(Parsed {
            consumed: text::char_len(text),
            node: Node::text(text),
        })
    }
}

/// Parse `input` into a pruned tree.
///
/// At each position the remaining input is offered to `parsers` in order;
/// the first one to consume a prefix contributes its node. Characters no
/// parser claims are collected into plain text.
///
/// # Errors
///
/// Returns [`TreeError::InvalidChild`](crate::error::TreeError::InvalidChild)
/// if a parser produces content for a node that cannot hold any.
pub fn parse(input: &str, parsers: &[&dyn Parser]) -> Result<StringTree> {
    let mut parts = Vec::new();
    let mut pending = String::new();
    let mut rest = input;

    'scan: while !rest.is_empty() {
        for parser in parsers {
            if let Some(parsed) = parser.parse(rest)
                && parsed.consumed > 0
            {
                if !pending.is_empty() {
                    parts.push(Part::Text(std::mem::take(&mut pending)));
                }
                tracing::trace!(
                    target: "stringtree",
                    kind = parsed.node.kind.name(),
                    consumed = parsed.consumed,
                    "parsed placeable"
                );
                parts.push(Part::Node(parsed.node));
                rest = &rest[text::byte_index(rest, parsed.consumed)..];
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            pending.push(ch);
        }
        rest = chars.as_str();
    }
    if !pending.is_empty() {
        parts.push(Part::Text(pending));
    }

    let mut tree = StringTree::build(Node::plain().with_children(parts))?;
    tree.prune();
    Ok(tree)
}
