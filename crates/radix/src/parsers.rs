//! The closed set of typed "parser children" a radix node may branch on.
//!
//! Each kind is a small struct implementing [`MatchParser`]; [`ParserKind`]
//! ties them together as a sum type and `#[enum_dispatch]` generates the
//! dispatch `match` so call sites never need a trait object (this mirrors
//! how the parser tree's `Matchable` wraps its grammar-element enum rather
//! than boxing `dyn Matchable`).

use enum_dispatch::enum_dispatch;
use fancy_regex::Regex;

use crate::errors::RadixError;

/// Implemented by every parser kind. `try_match` is handed the remaining
/// input (never empty) and returns the number of bytes it consumed plus,
/// when it produced a transformed copy (quotes stripped, terminator
/// dropped, ...), that copy. Returning `Some((0, _))` is never valid; the
/// matcher treats zero bytes consumed as failure regardless.
#[enum_dispatch]
pub trait MatchParser {
    fn accepts_first(&self, byte: u8) -> bool;
    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)>;
}

#[enum_dispatch(MatchParser)]
#[derive(Debug, Clone)]
pub enum ParserKind {
    Literal(LiteralParser),
    String(StringParser),
    EString(EStringParser),
    NlString(NlStringParser),
    QString(QStringParser),
    AnyString(AnyStringParser),
    Set(SetParser),
    Number(NumberParser),
    Float(FloatParser),
    Ipv4(Ipv4Parser),
    Ipv6(Ipv6Parser),
    IpAny(IpAnyParser),
    MacAddr(MacAddrParser),
    LlAddr(LlAddrParser),
    Email(EmailParser),
    Hostname(HostnameParser),
    Pcre(PcreParser),
}

impl ParserKind {
    pub(crate) fn build(kind: &str, param: Option<&str>, pattern: &str) -> Result<ParserKind, RadixError> {
        let upper = kind.to_ascii_uppercase();
        Ok(match upper.as_str() {
            "LITERAL" => ParserKind::Literal(LiteralParser::new(param.unwrap_or_default())),
            "STRING" => ParserKind::String(StringParser::new(param)),
            "ESTRING" => ParserKind::EString(EStringParser::new(param.unwrap_or_default())),
            "NLSTRING" => ParserKind::NlString(NlStringParser),
            "QSTRING" => ParserKind::QString(QStringParser::new(param, kind, pattern)?),
            "ANYSTRING" => ParserKind::AnyString(AnyStringParser),
            "SET" => ParserKind::Set(SetParser::new(param.unwrap_or_default())),
            "NUMBER" => ParserKind::Number(NumberParser),
            "FLOAT" => ParserKind::Float(FloatParser),
            "IPV4" => ParserKind::Ipv4(Ipv4Parser),
            "IPV6" => ParserKind::Ipv6(Ipv6Parser),
            "IP" | "IPANY" => ParserKind::IpAny(IpAnyParser),
            "MACADDR" => ParserKind::MacAddr(MacAddrParser),
            "LLADDR" => ParserKind::LlAddr(LlAddrParser::new(param)),
            "EMAIL" => ParserKind::Email(EmailParser::new(param)),
            "HOSTNAME" => ParserKind::Hostname(HostnameParser),
            "PCRE" => {
                ParserKind::Pcre(PcreParser::new(param.ok_or_else(|| RadixError::InvalidParam {
                    kind: kind.to_string(),
                    param: String::new(),
                    pattern: pattern.to_string(),
                })?)?)
            }
            other => {
                return Err(RadixError::UnknownKind { kind: other.to_string(), pattern: pattern.to_string() });
            }
        })
    }
}

/// Scans the whole byte range once to find the inclusive `[first, last]`
/// range a parser might start a match on. Computed once per compiled rule,
/// not on the matching hot path.
fn first_byte_range(accepts: impl Fn(u8) -> bool) -> (u8, u8) {
    let mut first = None;
    let mut last = 0u8;
    for b in 0u16..=255 {
        let b = b as u8;
        if accepts(b) {
            first.get_or_insert(b);
            last = b;
        }
    }
    match first {
        Some(f) => (f, last),
        None => (0, 255),
    }
}

fn is_hex(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// `@LITERAL:name:text@` — matches `text` verbatim. Rarely used directly
/// (the tree's own literal-edge children already cover the common case);
/// kept because it is one of the named parser kinds.
#[derive(Debug, Clone)]
pub struct LiteralParser {
    bytes: Vec<u8>,
}

impl LiteralParser {
    fn new(param: &str) -> Self {
        LiteralParser { bytes: param.as_bytes().to_vec() }
    }
}

impl MatchParser for LiteralParser {
    fn accepts_first(&self, byte: u8) -> bool {
        self.bytes.first().is_some_and(|&b| b == byte)
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        if !self.bytes.is_empty() && input.starts_with(&self.bytes) {
            Some((self.bytes.len(), None))
        } else {
            None
        }
    }
}

/// Bitset over the 256 byte values, used by `STRING` (alnum + extra chars)
/// and `SET` (fully user-specified class, with `a-z` range syntax).
#[derive(Debug, Clone)]
struct ByteSet([bool; 256]);

impl ByteSet {
    fn empty() -> Self {
        ByteSet([false; 256])
    }

    fn parse(spec: &str) -> Self {
        let mut set = ByteSet::empty();
        let chars: Vec<char> = spec.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if i + 2 < chars.len() && chars[i + 1] == '-' && (chars[i] as u32) < (chars[i + 2] as u32) {
                for c in (chars[i] as u32)..=(chars[i + 2] as u32) {
                    if let Some(ch) = char::from_u32(c) {
                        if ch.is_ascii() {
                            set.0[ch as usize] = true;
                        }
                    }
                }
                i += 3;
            } else {
                if chars[i].is_ascii() {
                    set.0[chars[i] as usize] = true;
                }
                i += 1;
            }
        }
        set
    }

    fn contains(&self, b: u8) -> bool {
        self.0[b as usize]
    }
}

/// `@STRING:name[:extra]@` — longest run of ASCII alnum plus the bytes
/// listed in `extra` (e.g. `_-` for identifier-like tokens).
#[derive(Debug, Clone)]
pub struct StringParser {
    extra: ByteSet,
}

impl StringParser {
    fn new(param: Option<&str>) -> Self {
        StringParser { extra: ByteSet::parse(param.unwrap_or_default()) }
    }

    fn accepts(&self, b: u8) -> bool {
        b.is_ascii_alphanumeric() || self.extra.contains(b)
    }
}

impl MatchParser for StringParser {
    fn accepts_first(&self, byte: u8) -> bool {
        self.accepts(byte)
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        let len = input.iter().take_while(|&&b| self.accepts(b)).count();
        (len > 0).then_some((len, None))
    }
}

/// `@ESTRING:name:terminator@` — bytes up to (and consuming) `terminator`;
/// the capture excludes it, which is why this always returns a transformed
/// copy rather than a raw sub-slice.
#[derive(Debug, Clone)]
pub struct EStringParser {
    terminator: Vec<u8>,
}

impl EStringParser {
    fn new(param: &str) -> Self {
        EStringParser { terminator: param.as_bytes().to_vec() }
    }
}

impl MatchParser for EStringParser {
    fn accepts_first(&self, _byte: u8) -> bool {
        !self.terminator.is_empty()
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        if self.terminator.is_empty() {
            return None;
        }
        let idx = input
            .windows(self.terminator.len())
            .position(|w| w == self.terminator.as_slice())?;
        let consumed = idx + self.terminator.len();
        Some((consumed, Some(input[..idx].to_vec())))
    }
}

/// `@NLSTRING:name@` — bytes up to the next `\n`; a `\r` immediately before
/// it is stripped from the capture. Consumes the rest of the input when no
/// `\n` is present (the common case for a trailing free-text message field).
#[derive(Debug, Clone, Copy)]
pub struct NlStringParser;

impl MatchParser for NlStringParser {
    fn accepts_first(&self, _byte: u8) -> bool {
        true
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        let (content_end, consumed) = match input.iter().position(|&b| b == b'\n') {
            Some(idx) => (idx, idx + 1),
            None => (input.len(), input.len()),
        };
        if consumed == 0 {
            return None;
        }
        let mut content = &input[..content_end];
        if content.last() == Some(&b'\r') {
            content = &content[..content.len() - 1];
        }
        Some((consumed, Some(content.to_vec())))
    }
}

/// `@QSTRING:name:<quotes>@` — `quotes` is one char (same open/close) or
/// two (distinct open/close, e.g. `<>`). No escape handling, matching the
/// original's simple quote-balance scan.
#[derive(Debug, Clone)]
pub struct QStringParser {
    open: u8,
    close: u8,
}

impl QStringParser {
    fn new(param: Option<&str>, kind: &str, pattern: &str) -> Result<Self, RadixError> {
        let param = param.ok_or_else(|| RadixError::InvalidParam {
            kind: kind.to_string(),
            param: String::new(),
            pattern: pattern.to_string(),
        })?;
        let bytes = param.as_bytes();
        match bytes.len() {
            1 => Ok(QStringParser { open: bytes[0], close: bytes[0] }),
            2 => Ok(QStringParser { open: bytes[0], close: bytes[1] }),
            _ => Err(RadixError::InvalidParam {
                kind: kind.to_string(),
                param: param.to_string(),
                pattern: pattern.to_string(),
            }),
        }
    }
}

impl MatchParser for QStringParser {
    fn accepts_first(&self, byte: u8) -> bool {
        byte == self.open
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        if input.first() != Some(&self.open) {
            return None;
        }
        let close_idx = input[1..].iter().position(|&b| b == self.close)? + 1;
        Some((close_idx + 1, Some(input[1..close_idx].to_vec())))
    }
}

/// `@ANYSTRING:name@` — the entire remainder of the input.
#[derive(Debug, Clone, Copy)]
pub struct AnyStringParser;

impl MatchParser for AnyStringParser {
    fn accepts_first(&self, _byte: u8) -> bool {
        true
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        (!input.is_empty()).then_some((input.len(), None))
    }
}

/// `@SET:name:chars@` — longest run over a user-supplied character class
/// (`a-z`, explicit lists, or a mix of both).
#[derive(Debug, Clone)]
pub struct SetParser {
    set: ByteSet,
}

impl SetParser {
    fn new(param: &str) -> Self {
        SetParser { set: ByteSet::parse(param) }
    }
}

impl MatchParser for SetParser {
    fn accepts_first(&self, byte: u8) -> bool {
        self.set.contains(byte)
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        let len = input.iter().take_while(|&&b| self.set.contains(b)).count();
        (len > 0).then_some((len, None))
    }
}

/// `@NUMBER:name@` — optional `-` then decimal digits, or a `0x`/`0X`
/// prefix plus at least one hex digit.
#[derive(Debug, Clone, Copy)]
pub struct NumberParser;

impl MatchParser for NumberParser {
    fn accepts_first(&self, byte: u8) -> bool {
        byte == b'-' || byte.is_ascii_digit()
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        let mut i = 0;
        if input.first() == Some(&b'-') {
            i = 1;
        }
        if input.len() >= i + 2 && input[i] == b'0' && (input[i + 1] == b'x' || input[i + 1] == b'X') {
            let start = i + 2;
            let mut j = start;
            while j < input.len() && is_hex(input[j]) {
                j += 1;
            }
            return (j > start).then_some((j, None));
        }
        let start = i;
        let mut j = start;
        while j < input.len() && input[j].is_ascii_digit() {
            j += 1;
        }
        (j > start).then_some((j, None))
    }
}

/// `@FLOAT:name@` — optional `-`, decimal digits with at most one `.`,
/// optional `e[+-]?digits` exponent.
#[derive(Debug, Clone, Copy)]
pub struct FloatParser;

impl MatchParser for FloatParser {
    fn accepts_first(&self, byte: u8) -> bool {
        byte == b'-' || byte.is_ascii_digit() || byte == b'.'
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        let mut i = 0;
        if input.first() == Some(&b'-') {
            i += 1;
        }
        let digits_start = i;
        while i < input.len() && input[i].is_ascii_digit() {
            i += 1;
        }
        let mut saw_digits = i > digits_start;
        if input.get(i) == Some(&b'.') {
            let frac_start = i + 1;
            let mut j = frac_start;
            while j < input.len() && input[j].is_ascii_digit() {
                j += 1;
            }
            if j > frac_start {
                saw_digits = true;
                i = j;
            }
        }
        if !saw_digits {
            return None;
        }
        if matches!(input.get(i), Some(b'e') | Some(b'E')) {
            let mut j = i + 1;
            if matches!(input.get(j), Some(b'+') | Some(b'-')) {
                j += 1;
            }
            let exp_start = j;
            while j < input.len() && input[j].is_ascii_digit() {
                j += 1;
            }
            if j > exp_start {
                i = j;
            }
        }
        Some((i, None))
    }
}

fn scan_ipv4(input: &[u8]) -> Option<usize> {
    let mut pos = 0;
    for octet in 0..4 {
        if octet > 0 {
            if input.get(pos) != Some(&b'.') {
                return None;
            }
            pos += 1;
        }
        let start = pos;
        let mut value: u32 = 0;
        let mut digits = 0;
        while pos < input.len() && input[pos].is_ascii_digit() && digits < 3 {
            value = value * 10 + u32::from(input[pos] - b'0');
            pos += 1;
            digits += 1;
        }
        if digits == 0 || value > 255 {
            return None;
        }
        let _ = start;
    }
    Some(pos)
}

/// `@IPv4:name@` — four `0..=255` decimal octets separated by `.`.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Parser;

impl MatchParser for Ipv4Parser {
    fn accepts_first(&self, byte: u8) -> bool {
        byte.is_ascii_digit()
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        scan_ipv4(input).map(|len| (len, None))
    }
}

/// Scans a textual IPv6 address (RFC 4291), including `::` compression and
/// an optional trailing IPv4 "dotted quad" group. Returns the number of
/// bytes consumed.
fn scan_ipv6(input: &[u8]) -> Option<usize> {
    let mut pos = 0;
    let mut groups = 0usize;
    let mut saw_double_colon = false;

    if input.starts_with(b"::") {
        saw_double_colon = true;
        pos = 2;
        if pos == input.len() {
            return Some(pos);
        }
    }

    loop {
        // Trailing embedded IPv4, only legal as the last group.
        if let Some(v4_len) = scan_ipv4(&input[pos..]) {
            if input[pos..pos + v4_len].contains(&b'.') {
                pos += v4_len;
                groups += 2;
                break;
            }
        }

        let hex_start = pos;
        let mut hex_len = 0;
        while pos < input.len() && is_hex(input[pos]) && hex_len < 4 {
            pos += 1;
            hex_len += 1;
        }
        if hex_len == 0 {
            if hex_start == pos && groups == 0 && !saw_double_colon {
                return None;
            }
            break;
        }
        groups += 1;

        if input.get(pos) == Some(&b':') && input.get(pos + 1) == Some(&b':') && !saw_double_colon {
            saw_double_colon = true;
            pos += 2;
            if pos == input.len() || !is_hex(*input.get(pos).unwrap_or(&b'?')) {
                break;
            }
            continue;
        }
        if input.get(pos) == Some(&b':') && matches!(input.get(pos + 1), Some(b) if is_hex(*b)) {
            pos += 1;
            continue;
        }
        break;
    }

    if groups == 0 {
        return None;
    }
    if !saw_double_colon && groups != 8 {
        return None;
    }
    Some(pos)
}

/// `@IPv6:name@`.
#[derive(Debug, Clone, Copy)]
pub struct Ipv6Parser;

impl MatchParser for Ipv6Parser {
    fn accepts_first(&self, byte: u8) -> bool {
        is_hex(byte) || byte == b':'
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        scan_ipv6(input).map(|len| (len, None))
    }
}

/// `@IP:name@` / `@IPvANY:name@` — IPv4 first, IPv6 fallback.
#[derive(Debug, Clone, Copy)]
pub struct IpAnyParser;

impl MatchParser for IpAnyParser {
    fn accepts_first(&self, byte: u8) -> bool {
        Ipv4Parser.accepts_first(byte) || Ipv6Parser.accepts_first(byte)
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        Ipv4Parser.try_match(input).or_else(|| Ipv6Parser.try_match(input))
    }
}

fn scan_hex_groups(input: &[u8], group_width: usize, max_groups: usize) -> Option<(usize, usize)> {
    let mut pos = 0;
    let mut groups = 0;
    loop {
        let start = pos;
        let mut len = 0;
        while pos < input.len() && is_hex(input[pos]) && len < group_width {
            pos += 1;
            len += 1;
        }
        if len != group_width {
            pos = start;
            break;
        }
        groups += 1;
        if groups >= max_groups {
            break;
        }
        if input.get(pos) == Some(&b':') {
            pos += 1;
        } else {
            break;
        }
    }
    (groups > 0).then_some((pos, groups))
}

/// `@MACADDR:name@` — exactly six colon-separated 2-hex-digit groups.
#[derive(Debug, Clone, Copy)]
pub struct MacAddrParser;

impl MatchParser for MacAddrParser {
    fn accepts_first(&self, byte: u8) -> bool {
        is_hex(byte)
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        let (len, groups) = scan_hex_groups(input, 2, 6)?;
        (groups == 6 && input.get(len - 1).copied() != Some(b':')).then_some((len, None))
    }
}

/// `@LLADDR:name[:N]@` — up to `N` (default 6, capped at 20) colon-separated
/// 2-hex-digit groups.
#[derive(Debug, Clone, Copy)]
pub struct LlAddrParser {
    max_groups: usize,
}

impl LlAddrParser {
    fn new(param: Option<&str>) -> Self {
        let requested = param.and_then(|p| p.parse::<usize>().ok()).unwrap_or(6);
        LlAddrParser { max_groups: requested.clamp(1, 20) }
    }
}

impl MatchParser for LlAddrParser {
    fn accepts_first(&self, byte: u8) -> bool {
        is_hex(byte)
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        scan_hex_groups(input, 2, self.max_groups).map(|(len, _)| (len, None))
    }
}

fn is_hostname_label_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

fn scan_hostname(input: &[u8]) -> Option<usize> {
    let mut pos = 0;
    let mut labels = 0;
    loop {
        let start = pos;
        while pos < input.len() && is_hostname_label_char(input[pos]) {
            pos += 1;
        }
        if pos == start {
            break;
        }
        labels += 1;
        if input.get(pos) == Some(&b'.') {
            pos += 1;
        } else {
            break;
        }
    }
    // Trailing `.` with no following label was consumed speculatively; back
    // off one byte so the dot isn't swallowed by an incomplete address.
    if input.get(pos.wrapping_sub(1)) == Some(&b'.') && pos > 0 {
        pos -= 1;
    }
    (labels >= 2).then_some(pos)
}

/// `@HOSTNAME:name@` — dot-separated labels of alnum + `-`, at least two.
#[derive(Debug, Clone, Copy)]
pub struct HostnameParser;

impl MatchParser for HostnameParser {
    fn accepts_first(&self, byte: u8) -> bool {
        is_hostname_label_char(byte)
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        scan_hostname(input).map(|len| (len, None))
    }
}

fn is_email_local_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-/=?^_`{|}~.".contains(&b)
}

/// `@EMAIL:name[:surround]@` — `local@domain`; `surround` (e.g. `<>`) is a
/// pair of characters consumed around the address if present, mirroring
/// the angle brackets common in `Received:` headers.
#[derive(Debug, Clone)]
pub struct EmailParser {
    prefix: Option<u8>,
    suffix: Option<u8>,
}

impl EmailParser {
    fn new(param: Option<&str>) -> Self {
        let bytes = param.unwrap_or_default().as_bytes();
        match bytes.len() {
            2 => EmailParser { prefix: Some(bytes[0]), suffix: Some(bytes[1]) },
            _ => EmailParser { prefix: None, suffix: None },
        }
    }
}

impl MatchParser for EmailParser {
    fn accepts_first(&self, byte: u8) -> bool {
        self.prefix.map_or_else(|| is_email_local_char(byte), |p| p == byte)
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        let mut pos = 0;
        if let Some(prefix) = self.prefix {
            if input.first() != Some(&prefix) {
                return None;
            }
            pos = 1;
        }

        let local_start = pos;
        while pos < input.len() && is_email_local_char(input[pos]) {
            pos += 1;
        }
        if pos == local_start {
            return None;
        }
        if input[local_start] == b'.' || input[pos - 1] == b'.' {
            return None;
        }
        if input.get(pos) != Some(&b'@') {
            return None;
        }
        pos += 1;

        let domain_start = pos;
        let domain_len = scan_hostname(&input[domain_start..])?;
        pos += domain_len;

        if let Some(suffix) = self.suffix {
            if input.get(pos) != Some(&suffix) {
                return None;
            }
            pos += 1;
        }
        Some((pos, None))
    }
}

/// `@PCRE:name:regex@` — anchored regex, must consume at least one byte.
#[derive(Debug, Clone)]
pub struct PcreParser {
    regex: Regex,
}

impl PcreParser {
    fn new(pattern: &str) -> Result<Self, RadixError> {
        let anchored = format!("^(?:{pattern})");
        Ok(PcreParser { regex: Regex::new(&anchored)? })
    }
}

impl MatchParser for PcreParser {
    fn accepts_first(&self, _byte: u8) -> bool {
        true
    }

    fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        let text = String::from_utf8_lossy(input);
        let m = self.regex.find(&text).ok().flatten()?;
        (m.start() == 0 && m.end() > 0).then_some((m.end(), None))
    }
}

/// A compiled parser child: the typed matcher plus the capture metadata
/// the tree attaches to a successful match.
#[derive(Debug, Clone)]
pub struct ParserNode {
    pub(crate) kind: ParserKind,
    pub name: Option<Box<str>>,
    kind_name: Box<str>,
    param: Option<Box<str>>,
    first: u8,
    last: u8,
}

impl ParserNode {
    pub(crate) fn compile(
        kind: &str,
        name: Option<&str>,
        param: Option<&str>,
        pattern: &str,
    ) -> Result<ParserNode, RadixError> {
        let built = ParserKind::build(kind, param, pattern)?;
        let (first, last) = first_byte_range(|b| built.accepts_first(b));
        Ok(ParserNode {
            kind: built,
            name: name.map(Into::into),
            kind_name: kind.to_ascii_uppercase().into(),
            param: param.map(Into::into),
            first,
            last,
        })
    }

    pub(crate) fn same_spec(&self, other: &ParserNode) -> bool {
        self.kind_name == other.kind_name && self.name == other.name && self.param == other.param
    }

    pub(crate) fn in_range(&self, byte: u8) -> bool {
        self.first <= byte && byte <= self.last
    }

    pub(crate) fn try_match(&self, input: &[u8]) -> Option<(usize, Option<Vec<u8>>)> {
        self.kind.try_match(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_accepts_hex_and_decimal() {
        let p = NumberParser;
        assert_eq!(p.try_match(b"1234abc"), Some((4, None)));
        assert_eq!(p.try_match(b"-42;"), Some((3, None)));
        assert_eq!(p.try_match(b"0x1F "), Some((4, None)));
        assert_eq!(p.try_match(b"0x "), None);
    }

    #[test]
    fn float_accepts_exponent() {
        let p = FloatParser;
        assert_eq!(p.try_match(b"-3.14e-2x"), Some((8, None)));
        assert_eq!(p.try_match(b"12"), Some((2, None)));
    }

    #[test]
    fn s3_ipv4_rejects_three_octets() {
        let p = Ipv4Parser;
        assert_eq!(p.try_match(b"192.168.1.1 huhuhu"), Some((11, None)));
        assert_eq!(scan_ipv4(b"192.168.1 huhuhu"), None);
    }

    #[test]
    fn ipv6_handles_double_colon_compression() {
        assert_eq!(scan_ipv6(b"::1"), Some(3));
        assert_eq!(scan_ipv6(b"2001:db8::1"), Some(11));
        assert_eq!(scan_ipv6(b"fe80::1%eth0"), Some(7));
    }

    #[test]
    fn macaddr_requires_all_six_groups() {
        let p = MacAddrParser;
        assert_eq!(p.try_match(b"00:11:22:33:44:55 tail"), Some((17, None)));
        assert_eq!(p.try_match(b"00:11:22"), None);
    }

    #[test]
    fn s4_qstring_strips_quotes() {
        let p = QStringParser { open: b'\'', close: b'\'' };
        let (consumed, captured) = p.try_match(b"'quoted string' hehehe").unwrap();
        assert_eq!(consumed, 15);
        assert_eq!(captured.unwrap(), b"quoted string");
    }

    #[test]
    fn estring_excludes_terminator() {
        let p = EStringParser::new(";;");
        let (consumed, captured) = p.try_match(b"abc;;rest").unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(captured.unwrap(), b"abc");
    }

    #[test]
    fn email_requires_two_domain_labels() {
        let p = EmailParser::new(None);
        assert_eq!(p.try_match(b"a.b@example.com tail"), Some((15, None)));
        assert_eq!(p.try_match(b".bad@example.com"), None);
        assert_eq!(p.try_match(b"user@singlelabel"), None);
    }

    #[test]
    fn hostname_requires_two_labels() {
        assert_eq!(scan_hostname(b"example.com more"), Some(11));
        assert_eq!(scan_hostname(b"nodomain"), None);
    }
}
