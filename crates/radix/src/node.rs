//! The shared radix tree itself: literal edges sorted for binary search,
//! typed parser edges tried in registration order, and the two-pass
//! complete/partial matcher described in the component spec.

use crate::errors::RadixError;
use crate::parsers::ParserNode;
use crate::pattern::{Segment, parse_pattern};

/// One field captured during a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// `None` for an anonymous `@KIND@` spec (no `:name` given).
    pub name: Option<Box<str>>,
    /// Offset into the original `find()` input.
    pub offset: usize,
    pub length: usize,
    /// Present only when the parser produced a transformed copy (quotes
    /// stripped, terminator dropped, ...); `None` means "read
    /// `input[offset..offset + length]` verbatim".
    pub value: Option<Vec<u8>>,
}

enum CompiledSegment {
    Literal(Vec<u8>),
    Parser(ParserNode),
}

struct ParserChild<V> {
    parser: ParserNode,
    child: RNode<V>,
}

/// A node of the shared prefix tree. The root is an `RNode` with an empty
/// label; every other node owns the literal bytes of the edge leading to
/// it, exactly like a classic radix/PATRICIA trie, generalized with a
/// second array of typed parser edges tried in insertion order.
pub struct RNode<V> {
    label: Vec<u8>,
    value: Option<V>,
    literal_children: Vec<RNode<V>>,
    parser_children: Vec<ParserChild<V>>,
}

impl<V> Default for RNode<V> {
    fn default() -> Self {
        RNode::new()
    }
}

impl<V> RNode<V> {
    pub fn new() -> Self {
        RNode { label: Vec::new(), value: None, literal_children: Vec::new(), parser_children: Vec::new() }
    }

    fn leaf(label: Vec<u8>) -> Self {
        RNode { label, value: None, literal_children: Vec::new(), parser_children: Vec::new() }
    }

    /// Compiles `pattern` and inserts `value` at the terminal node. Parser
    /// specs are compiled once, up front, so a malformed spec is reported
    /// with the whole pattern string in scope rather than threaded through
    /// every recursive call.
    pub fn insert(&mut self, pattern: &str, value: V) -> Result<(), RadixError> {
        let segments = parse_pattern(pattern)?;
        let mut compiled = Vec::with_capacity(segments.len());
        for segment in segments {
            compiled.push(match segment {
                Segment::Literal(bytes) => CompiledSegment::Literal(bytes),
                Segment::Parser { kind, name, param } => {
                    CompiledSegment::Parser(ParserNode::compile(&kind, name.as_deref(), param.as_deref(), pattern)?)
                }
            });
        }
        self.insert_segments(&compiled, value);
        Ok(())
    }

    fn insert_segments(&mut self, segments: &[CompiledSegment], value: V) {
        match segments.split_first() {
            None => {
                if self.value.is_none() {
                    self.value = Some(value);
                } else {
                    log::warn!("duplicate radix pattern; keeping the first-registered value (first-wins)");
                }
            }
            Some((CompiledSegment::Literal(bytes), rest)) => self.insert_literal(bytes, rest, value),
            Some((CompiledSegment::Parser(parser), rest)) => {
                let existing = self.parser_children.iter_mut().find(|pc| pc.parser.same_spec(parser));
                match existing {
                    Some(pc) => pc.child.insert_segments(rest, value),
                    None => {
                        let mut child = RNode::new();
                        child.insert_segments(rest, value);
                        self.parser_children.push(ParserChild { parser: parser.clone(), child });
                    }
                }
            }
        }
    }

    fn insert_literal(&mut self, bytes: &[u8], rest: &[CompiledSegment], value: V) {
        if bytes.is_empty() {
            return self.insert_segments(rest, value);
        }
        let first = bytes[0];
        match self.literal_children.binary_search_by(|c| c.label[0].cmp(&first)) {
            Err(idx) => {
                let mut child = RNode::leaf(bytes.to_vec());
                child.insert_segments(rest, value);
                self.literal_children.insert(idx, child);
            }
            Ok(idx) => {
                let cp = common_prefix_len(&self.literal_children[idx].label, bytes);
                let label_len = self.literal_children[idx].label.len();
                if cp == label_len {
                    self.literal_children[idx].insert_literal(&bytes[cp..], rest, value);
                } else {
                    self.split_literal_child(idx, cp);
                    self.literal_children[idx].insert_literal(&bytes[cp..], rest, value);
                }
            }
        }
    }

    /// Splits `literal_children[idx]` at byte offset `cp` of its label,
    /// inserting a new mid-node that owns the shared prefix and demoting
    /// the original node (with its value and children intact) to be that
    /// mid-node's sole child for the remaining suffix.
    fn split_literal_child(&mut self, idx: usize, cp: usize) {
        let child = &mut self.literal_children[idx];
        let old_label = std::mem::replace(&mut child.label, Vec::new());
        let mid_label = old_label[..cp].to_vec();
        let suffix_label = old_label[cp..].to_vec();

        let suffix_node = RNode {
            label: suffix_label,
            value: child.value.take(),
            literal_children: std::mem::take(&mut child.literal_children),
            parser_children: std::mem::take(&mut child.parser_children),
        };

        child.label = mid_label;
        child.literal_children = vec![suffix_node];
    }

    /// Looks up `input` against the tree, requiring the input to be fully
    /// consumed by the matched pattern.
    pub fn find<'v>(&'v self, input: &[u8]) -> Option<(&'v V, Vec<Capture>)> {
        let mut captures = Vec::new();
        self.match_from(input, 0, &mut captures, true).map(|value| (value, captures))
    }

    /// Like [`find`](Self::find), but when no complete match exists, opts
    /// into a second, independent traversal (starting from an empty
    /// capture list, so nothing from the failed complete-match pass leaks
    /// through) that accepts the longest partial match terminating on a
    /// node with a value. The returned `bool` is `true` when the result
    /// came from the partial pass.
    pub fn find_with_partial<'v>(&'v self, input: &[u8]) -> Option<(&'v V, Vec<Capture>, bool)> {
        let mut captures = Vec::new();
        if let Some(value) = self.match_from(input, 0, &mut captures, true) {
            return Some((value, captures, false));
        }
        captures.clear();
        self.match_from(input, 0, &mut captures, false).map(|value| (value, captures, true))
    }

    fn match_from<'v>(
        &'v self,
        input: &[u8],
        base_offset: usize,
        captures: &mut Vec<Capture>,
        require_complete: bool,
    ) -> Option<&'v V> {
        let (ip, lp) = common_prefix_crlf(input, &self.label);
        if lp < self.label.len() {
            return None;
        }
        let rest = &input[ip..];
        let pos = base_offset + ip;

        if rest.is_empty() {
            return self.value.as_ref();
        }

        if let Some(first) = effective_first_byte(rest) {
            if let Ok(idx) = self.literal_children.binary_search_by(|c| c.label[0].cmp(&first)) {
                if let Some(value) = self.literal_children[idx].match_from(rest, pos, captures, require_complete) {
                    return Some(value);
                }
            }
        }

        for pc in &self.parser_children {
            if !pc.parser.in_range(rest[0]) {
                continue;
            }
            let Some((consumed, transformed)) = pc.parser.try_match(rest) else {
                continue;
            };
            if consumed == 0 {
                continue;
            }
            let mark = captures.len();
            captures.push(Capture { name: pc.parser.name.clone(), offset: pos, length: consumed, value: transformed });
            let after = &rest[consumed..];
            if let Some(value) = pc.child.match_from(after, pos + consumed, captures, require_complete) {
                return Some(value);
            }
            captures.truncate(mark);
        }

        if !require_complete {
            if let Some(value) = self.value.as_ref() {
                return Some(value);
            }
        }
        None
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Like `common_prefix_len`, but a `\r\n` in `input` is treated as matching
/// a lone `\n` at the same position in `label`. Returns `(input_consumed,
/// label_consumed)`, which can differ by one when the CRLF fold fires.
fn common_prefix_crlf(input: &[u8], label: &[u8]) -> (usize, usize) {
    let mut ip = 0;
    let mut lp = 0;
    while ip < input.len() && lp < label.len() {
        if input[ip] == label[lp] {
            ip += 1;
            lp += 1;
        } else if input[ip] == b'\r' && input.get(ip + 1) == Some(&b'\n') && label[lp] == b'\n' {
            ip += 2;
            lp += 1;
        } else {
            break;
        }
    }
    (ip, lp)
}

/// A leading `\r\n` collapses to `\n` for the purpose of picking which
/// literal child to descend into.
fn effective_first_byte(input: &[u8]) -> Option<u8> {
    if input.first() == Some(&b'\r') && input.get(1) == Some(&b'\n') {
        Some(b'\n')
    } else {
        input.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(patterns: &[(&str, &str)]) -> RNode<String> {
        let mut root = RNode::new();
        for (pattern, value) in patterns {
            root.insert(pattern, (*value).to_string()).unwrap();
        }
        root
    }

    #[test]
    fn radix_completeness_literal_only() {
        let root = tree_with(&[("foo", "FOO"), ("foobar", "FOOBAR"), ("baz", "BAZ")]);
        assert_eq!(root.find(b"foo").unwrap().0, "FOO");
        assert_eq!(root.find(b"foobar").unwrap().0, "FOOBAR");
        assert_eq!(root.find(b"baz").unwrap().0, "BAZ");
        assert!(root.find(b"qux").is_none());
    }

    #[test]
    fn s3_ipv4_pattern() {
        let root = tree_with(&[("@IPv4:ip@", "MATCHED")]);
        let (value, captures) = root.find(b"192.168.1.1").unwrap();
        assert_eq!(value, "MATCHED");
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].name.as_deref(), Some("ip"));
        assert_eq!(&b"192.168.1.1"[captures[0].offset..captures[0].offset + captures[0].length], b"192.168.1.1");

        assert!(root.find(b"192.168.1").is_none());
    }

    #[test]
    fn s4_qstring_pattern() {
        let root = tree_with(&[("@QSTRING:qstring:'@", "MATCHED")]);
        let (value, captures) = root.find(b"'quoted string'").unwrap();
        assert_eq!(value, "MATCHED");
        assert_eq!(captures[0].value.as_deref(), Some(&b"quoted string"[..]));
    }

    #[test]
    fn literal_child_wins_over_parser_child() {
        let mut root = RNode::new();
        root.insert("src=@NUMBER:n@", "NUM").unwrap();
        root.insert("src=123literal", "LIT").unwrap();

        let (value, _) = root.find(b"src=123literal").unwrap();
        assert_eq!(value, "LIT", "literal child must be preferred over a parser child at the same byte");

        let (value, _) = root.find(b"src=999").unwrap();
        assert_eq!(value, "NUM");
    }

    #[test]
    fn crlf_equivalence() {
        let root = tree_with(&[("line1\nline2", "JOINED")]);
        assert_eq!(root.find(b"line1\nline2").unwrap().0, "JOINED");
        assert_eq!(root.find(b"line1\r\nline2").unwrap().0, "JOINED");
    }

    #[test]
    fn duplicate_insert_keeps_first_value() {
        let mut root = RNode::new();
        root.insert("dup", "FIRST").unwrap();
        root.insert("dup", "SECOND").unwrap();
        assert_eq!(root.find(b"dup").unwrap().0, "FIRST");
    }

    #[test]
    fn partial_match_is_opt_in() {
        let root = tree_with(&[("abc", "ABC")]);
        assert!(root.find(b"abcdef").is_none(), "complete-match pass must fail on trailing garbage");

        let (value, captures, partial) = root.find_with_partial(b"abcdef").unwrap();
        assert_eq!(value, "ABC");
        assert!(captures.is_empty());
        assert!(partial);
    }

    #[test]
    fn splitting_a_literal_node_preserves_both_branches() {
        let root = tree_with(&[("application/json", "JSON"), ("application/xml", "XML"), ("application", "APP")]);
        assert_eq!(root.find(b"application/json").unwrap().0, "JSON");
        assert_eq!(root.find(b"application/xml").unwrap().0, "XML");
        assert_eq!(root.find(b"application").unwrap().0, "APP");
    }

    #[test]
    fn captures_are_rolled_back_on_backtrack() {
        // Two NUMBER alternatives at the same node; only the second leads
        // to a terminal. The first parser's capture must not leak through.
        let mut first = RNode::new();
        first.insert("@NUMBER:a@-ok", "OK").unwrap();
        let (value, captures) = first.find(b"42-ok").unwrap();
        assert_eq!(value, "OK");
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].name.as_deref(), Some("a"));
    }
}
