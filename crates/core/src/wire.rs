//! Nested list wire encoding
//!
//! Sequences travel as a single wire string in the Slim list format:
//!
//! ```text
//! list  := '[' count ':' { len ':' item ':' } ']'
//! count := decimal, zero padded to at least 6 digits
//! len   := decimal char count of item, zero padded to at least 6 digits
//! ```
//!
//! `["hello", "world"]` encodes as `[000002:000005:hello:000005:world:]`.
//!
//! ## Properties
//!
//! - Every item is length-prefixed, so item content is never escaped and may
//!   contain `:`, `[` or `]`.
//! - A nested list is just an item whose content is itself an encoded list,
//!   carrying its own count.
//! - Lengths count Unicode scalar values (`char`s), not bytes.
//!
//! Decoding is strict: the declared count must match the items present and
//! nothing may follow the closing `]`.

use crate::error::{Error, Result};

/// Minimum width of the count and length fields
pub const FIELD_WIDTH: usize = 6;

const LIST_TYPE: &str = "list";

/// Encode already-converted items as a wire list
pub fn encode_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<S> = items.into_iter().collect();
    let mut out = String::new();
    out.push('[');
    push_field(&mut out, items.len());
    for item in &items {
        let item = item.as_ref();
        push_field(&mut out, item.chars().count());
        out.push_str(item);
        out.push(':');
    }
    out.push(']');
    out
}

fn push_field(out: &mut String, n: usize) {
    out.push_str(&format!("{:0width$}", n, width = FIELD_WIDTH));
    out.push(':');
}

/// Decode one level of a wire list into its raw item strings
///
/// Nested lists are returned as their encoded form; decode them again to
/// descend.
pub fn decode_list(wire: &str) -> Result<Vec<String>> {
    let mut cursor = Cursor::new(wire);
    cursor.expect('[')?;
    let count = cursor.read_field()?;
    // Each item needs at least "0:" + ":" so cap preallocation by input size
    let mut items = Vec::with_capacity(count.min(wire.len() / 3));
    for index in 0..count {
        let len = cursor
            .read_field()
            .map_err(|_| cursor.error(format!("expected item {} of {}", index + 1, count)))?;
        let item = cursor.take_chars(len)?;
        cursor.expect(':')?;
        items.push(item.to_string());
    }
    cursor.expect(']')?;
    if !cursor.is_at_end() {
        return Err(cursor.error(format!(
            "trailing data after list of {} items",
            count
        )));
    }
    Ok(items)
}

/// Whether the string is a well-formed wire list
pub fn is_list(wire: &str) -> bool {
    wire.starts_with('[') && decode_list(wire).is_ok()
}

/// A decoded wire value with its list structure recovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireNode {
    /// A leaf wire string
    Item(String),
    /// A nested list
    List(Vec<WireNode>),
}

impl WireNode {
    /// Re-encode this node
    pub fn encode(&self) -> String {
        match self {
            WireNode::Item(s) => s.clone(),
            WireNode::List(items) => encode_list(items.iter().map(WireNode::encode)),
        }
    }

    /// Leaf string, if this node is a leaf
    pub fn as_item(&self) -> Option<&str> {
        match self {
            WireNode::Item(s) => Some(s),
            WireNode::List(_) => None,
        }
    }

    /// Child nodes, if this node is a list
    pub fn as_list(&self) -> Option<&[WireNode]> {
        match self {
            WireNode::Item(_) => None,
            WireNode::List(items) => Some(items),
        }
    }
}

/// Decode a wire list recursively
///
/// Any item that is itself a well-formed list is decoded as a nested list;
/// all other items stay leaves. Fails if the outer string is not a list or if
/// nesting exceeds `max_depth` levels.
pub fn decode_nested(wire: &str, max_depth: usize) -> Result<WireNode> {
    decode_nested_at(wire, max_depth, 1)
}

fn decode_nested_at(wire: &str, max_depth: usize, depth: usize) -> Result<WireNode> {
    if depth > max_depth {
        return Err(Error::conversion(
            LIST_TYPE,
            wire,
            format!("nesting deeper than {} levels", max_depth),
        ));
    }
    let items = decode_list(wire)?;
    let mut nodes = Vec::with_capacity(items.len());
    for item in items {
        if is_list(&item) {
            nodes.push(decode_nested_at(&item, max_depth, depth + 1)?);
        } else {
            nodes.push(WireNode::Item(item));
        }
    }
    Ok(WireNode::List(nodes))
}

/// Position-tracking reader over a wire string
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::conversion(
            LIST_TYPE,
            self.input,
            format!("{} at offset {}", reason.into(), self.pos),
        )
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }

    /// Read a decimal field terminated by ':'
    fn read_field(&mut self) -> Result<usize> {
        let rest = self.rest();
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(self.error("expected a decimal field"));
        }
        let n = rest[..digits]
            .parse::<usize>()
            .map_err(|e| self.error(format!("bad decimal field: {}", e)))?;
        self.pos += digits;
        self.expect(':')?;
        Ok(n)
    }

    /// Take exactly `n` chars
    fn take_chars(&mut self, n: usize) -> Result<&'a str> {
        let rest = self.rest();
        let end = if n == 0 {
            0
        } else {
            match rest.char_indices().nth(n - 1) {
                Some((i, c)) => i + c.len_utf8(),
                None => return Err(self.error(format!("item shorter than declared {} chars", n))),
            }
        };
        self.pos += end;
        Ok(&rest[..end])
    }
}
