use std::hash::{Hash, Hasher};
use std::sync::Arc;

use logline_core::ValueType;
use logline_nv::{LogMessage, NvRegistry};

use crate::errors::TemplateError;
use crate::timestamp::format_iso8601;

const MACROS: &[&str] = &["HOST", "MSG", "PROGRAM", "ISODATE", "UNIXTIME", "SEQNUM"];

#[derive(Debug, Clone, PartialEq)]
enum Element {
    Literal(String),
    Value(String),
    Macro(String),
    Call { name: String, args: Vec<LogTemplate> },
}

#[derive(Debug)]
struct TemplateData {
    elements: Vec<Element>,
    trivial: bool,
}

/// A compiled, immutable, reference-counted string template: an ordered
/// list of literal text, `$NAME`/`${NAME}` value references, fixed macros
/// (`$HOST`, `$MSG`, ...) and `$(func args...)` calls. Cloning bumps an
/// `Arc`, matching the "templates are reference-counted and cheap to
/// clone" contract.
#[derive(Debug, Clone, PartialEq)]
pub struct LogTemplate(Arc<TemplateData>);

impl PartialEq for TemplateData {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

/// Options threaded through evaluation: a fixed UTC offset for `$ISODATE`,
/// a sequence number for `$SEQNUM`, an optional correlation context id,
/// and an escape callback applied to every resolved (non-literal) value.
#[derive(Default)]
pub struct EvalOptions<'a> {
    pub timezone_offset_minutes: i32,
    pub seq_num: u64,
    pub context_id: Option<&'a str>,
    pub escape: Option<&'a dyn Fn(&str) -> String>,
}

impl LogTemplate {
    pub fn compile(src: &str) -> Result<LogTemplate, TemplateError> {
        let elements = lex(src)?;
        let trivial = structural_trivial(&elements);
        Ok(LogTemplate(Arc::new(TemplateData { elements, trivial })))
    }

    /// A template is trivial when it is a single value-reference or the
    /// `$MSG`/`$HOST` macro; callers with no escape callback may fast-path
    /// such templates straight to an `NvTable` lookup instead of going
    /// through the general evaluator.
    pub fn is_trivial(&self) -> bool {
        self.0.trivial
    }

    pub fn evaluate(&self, message: &LogMessage, registry: &NvRegistry, opts: &EvalOptions<'_>) -> (String, ValueType) {
        if let [single] = self.0.elements.as_slice() {
            return eval_element(single, message, registry, opts);
        }
        let mut out = String::new();
        for element in &self.0.elements {
            match element {
                Element::Literal(text) => out.push_str(text),
                other => {
                    let (value, _) = eval_element(other, message, registry, opts);
                    match opts.escape {
                        Some(escape) => out.push_str(&escape(&value)),
                        None => out.push_str(&value),
                    }
                }
            }
        }
        (out, ValueType::String)
    }
}

fn eval_element(element: &Element, message: &LogMessage, registry: &NvRegistry, opts: &EvalOptions<'_>) -> (String, ValueType) {
    match element {
        Element::Literal(text) => (text.clone(), ValueType::String),
        Element::Value(name) => match registry.find_handle(name) {
            Some(handle) => {
                let (bytes, ty) = message.table().get(handle);
                (String::from_utf8_lossy(&bytes).into_owned(), ty)
            }
            None => (String::new(), ValueType::None),
        },
        Element::Macro(name) => eval_macro(name, message, opts),
        Element::Call { name, args } => eval_call(name, args, message, registry, opts),
    }
}

fn eval_macro(name: &str, message: &LogMessage, opts: &EvalOptions<'_>) -> (String, ValueType) {
    match name {
        "HOST" => (message.host().to_string(), ValueType::String),
        "PROGRAM" => (message.program().to_string(), ValueType::String),
        "MSG" => (message.message().to_string(), ValueType::String),
        "ISODATE" => (format_iso8601(message.timestamp(), opts.timezone_offset_minutes), ValueType::Datetime),
        "UNIXTIME" => (message.timestamp().to_string(), ValueType::Int64),
        "SEQNUM" => (opts.seq_num.to_string(), ValueType::Int64),
        _ => (String::new(), ValueType::None),
    }
}

fn eval_call(
    name: &str,
    args: &[LogTemplate],
    message: &LogMessage,
    registry: &NvRegistry,
    opts: &EvalOptions<'_>,
) -> (String, ValueType) {
    let evaluated: Vec<String> = args.iter().map(|arg| arg.evaluate(message, registry, opts).0).collect();
    let joined = evaluated.join(" ");
    match name {
        "upper" => (joined.to_uppercase(), ValueType::String),
        "lower" => (joined.to_lowercase(), ValueType::String),
        "len" => (joined.chars().count().to_string(), ValueType::Int64),
        _ => (joined, ValueType::String),
    }
}

fn structural_trivial(elements: &[Element]) -> bool {
    match elements {
        [Element::Value(_)] => true,
        [Element::Macro(name)] => name == "MSG" || name == "HOST",
        _ => false,
    }
}

fn flush_literal(elements: &mut Vec<Element>, literal: &mut String) {
    if !literal.is_empty() {
        elements.push(Element::Literal(std::mem::take(literal)));
    }
}

fn classify(name: &str) -> Element {
    if MACROS.contains(&name) {
        Element::Macro(name.to_string())
    } else {
        Element::Value(name.to_string())
    }
}

fn lex(src: &str) -> Result<Vec<Element>, TemplateError> {
    let mut elements = Vec::new();
    let mut literal = String::new();
    let mut rest = src;

    while let Some(ch) = rest.chars().next() {
        if ch != '$' {
            literal.push(ch);
            rest = &rest[ch.len_utf8()..];
            continue;
        }
        rest = &rest[1..];
        match rest.chars().next() {
            None => literal.push('$'),
            Some('$') => {
                literal.push('$');
                rest = &rest[1..];
            }
            Some('{') => {
                flush_literal(&mut elements, &mut literal);
                rest = &rest[1..];
                let end =
                    rest.find('}').ok_or_else(|| TemplateError::UnterminatedBrace { template: src.to_string() })?;
                let name = &rest[..end];
                if name.is_empty() {
                    return Err(TemplateError::EmptyName { template: src.to_string() });
                }
                elements.push(classify(name));
                rest = &rest[end + 1..];
            }
            Some('(') => {
                flush_literal(&mut elements, &mut literal);
                rest = &rest[1..];
                let (call, remainder) = parse_call(rest, src)?;
                elements.push(call);
                rest = remainder;
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                flush_literal(&mut elements, &mut literal);
                let end = rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(rest.len());
                elements.push(classify(&rest[..end]));
                rest = &rest[end..];
            }
            Some(_) => literal.push('$'),
        }
    }
    flush_literal(&mut elements, &mut literal);
    Ok(elements)
}

fn parse_call<'a>(rest: &'a str, whole: &str) -> Result<(Element, &'a str), TemplateError> {
    let mut depth = 1;
    let mut end = None;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let end = end.ok_or_else(|| TemplateError::UnterminatedCall { template: whole.to_string() })?;
    let inner = &rest[..end];
    let mut parts = inner.split_whitespace();
    let name = parts.next().ok_or_else(|| TemplateError::EmptyName { template: whole.to_string() })?.to_string();
    let mut args = Vec::new();
    for part in parts {
        args.push(LogTemplate::compile(part)?);
    }
    Ok((Element::Call { name, args }, &rest[end + 1..]))
}

/// Non-cryptographic hash of the evaluated template, used by the
/// scheduler's hash-partitioning mode. Reuses `ahash`, already a workspace
/// dependency, rather than pulling in a dedicated hashing crate.
pub fn log_template_hash(template: &LogTemplate, message: &LogMessage, registry: &NvRegistry, opts: &EvalOptions<'_>) -> u32 {
    let (text, _) = template.evaluate(message, registry, opts);
    let mut hasher = ahash::AHasher::default();
    text.hash(&mut hasher);
    hasher.finish() as u32
}

#[cfg(test)]
mod tests {
    use logline_nv::NvTable;

    use super::*;

    fn message(host: &str) -> LogMessage {
        LogMessage::new(NvTable::new(4, 4, 128), host, "myprog", "something happened", 1_700_000_000)
    }

    #[test]
    fn literal_only_template_needs_no_registry() {
        let tpl = LogTemplate::compile("hello world").unwrap();
        let registry = NvRegistry::new(&[], 8);
        let (text, ty) = tpl.evaluate(&message("h"), &registry, &EvalOptions::default());
        assert_eq!(text, "hello world");
        assert_eq!(ty, ValueType::String);
    }

    #[test]
    fn host_macro_is_trivial_and_resolves() {
        let tpl = LogTemplate::compile("$HOST").unwrap();
        assert!(tpl.is_trivial());
        let registry = NvRegistry::new(&[], 8);
        let (text, _) = tpl.evaluate(&message("web-01"), &registry, &EvalOptions::default());
        assert_eq!(text, "web-01");
    }

    #[test]
    fn value_reference_resolves_from_table() {
        let registry = NvRegistry::new(&["PID"], 8);
        let handle = registry.find_handle("PID").unwrap();
        let mut msg = message("h");
        msg.table_mut().set_direct(handle, "PID", b"4242", ValueType::String);

        let tpl = LogTemplate::compile("pid=${PID}").unwrap();
        let (text, ty) = tpl.evaluate(&msg, &registry, &EvalOptions::default());
        assert_eq!(text, "pid=4242");
        assert_eq!(ty, ValueType::String);
    }

    #[test]
    fn unknown_reference_resolves_empty() {
        let registry = NvRegistry::new(&[], 8);
        let tpl = LogTemplate::compile("x=$NOPE;").unwrap();
        let (text, _) = tpl.evaluate(&message("h"), &registry, &EvalOptions::default());
        assert_eq!(text, "x=;");
    }

    #[test]
    fn msg_and_program_macros_are_distinct() {
        let registry = NvRegistry::new(&[], 8);
        let msg_tpl = LogTemplate::compile("$MSG").unwrap();
        let program_tpl = LogTemplate::compile("$PROGRAM").unwrap();
        let msg = message("h");
        let (msg_text, _) = msg_tpl.evaluate(&msg, &registry, &EvalOptions::default());
        let (program_text, _) = program_tpl.evaluate(&msg, &registry, &EvalOptions::default());
        assert_eq!(msg_text, "something happened");
        assert_eq!(program_text, "myprog");
        assert_ne!(msg_text, program_text);
    }

    #[test]
    fn function_call_applies_builtin() {
        let registry = NvRegistry::new(&[], 8);
        let tpl = LogTemplate::compile("$(upper $HOST)").unwrap();
        let (text, _) = tpl.evaluate(&message("web-01"), &registry, &EvalOptions::default());
        assert_eq!(text, "WEB-01");
    }

    #[test]
    fn unterminated_brace_is_a_compile_error() {
        assert!(LogTemplate::compile("${HOST").is_err());
    }

    #[test]
    fn hash_is_stable_for_equal_evaluations() {
        let registry = NvRegistry::new(&[], 8);
        let tpl = LogTemplate::compile("$HOST").unwrap();
        let opts = EvalOptions::default();
        let a = log_template_hash(&tpl, &message("same"), &registry, &opts);
        let b = log_template_hash(&tpl, &message("same"), &registry, &opts);
        assert_eq!(a, b);
    }

    #[test]
    fn s6_same_host_hashes_equal() {
        let registry = NvRegistry::new(&[], 8);
        let tpl = LogTemplate::compile("$HOST").unwrap();
        let opts = EvalOptions::default();
        let h_a1 = log_template_hash(&tpl, &message("a"), &registry, &opts);
        let h_a2 = log_template_hash(&tpl, &message("a"), &registry, &opts);
        let h_b = log_template_hash(&tpl, &message("b"), &registry, &opts);
        assert_eq!(h_a1, h_a2);
        assert_ne!(h_a1, h_b, "different hosts should not collide in this small smoke test");
    }
}
