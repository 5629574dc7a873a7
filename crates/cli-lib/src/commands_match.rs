use logline_radix::RNode;

use crate::commands::MatchArgs;
use crate::stdin::read_path_or_stdin;

pub fn run(args: MatchArgs) -> i32 {
    let mut tree = RNode::new();
    for spec in &args.patterns {
        let (name, pattern) = match spec.split_once('=') {
            Some((name, pattern)) => (name, pattern),
            None => (spec.as_str(), spec.as_str()),
        };
        if let Err(e) = tree.insert(pattern, name.to_string()) {
            eprintln!("skipping pattern {pattern:?}: {e}");
        }
    }

    let input = match read_path_or_stdin(&args.input) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("failed to read input: {e}");
            return 1;
        }
    };

    for line in input.lines() {
        report_line(&tree, line, args.allow_partial);
    }
    0
}

fn report_line(tree: &RNode<String>, line: &str, allow_partial: bool) {
    if let Some((rule, captures)) = tree.find(line.as_bytes()) {
        println!("MATCH {rule} {line:?} {}", describe_captures(line.as_bytes(), &captures));
        return;
    }
    if allow_partial {
        if let Some((rule, captures, _partial)) = tree.find_with_partial(line.as_bytes()) {
            println!("PARTIAL {rule} {line:?} {}", describe_captures(line.as_bytes(), &captures));
            return;
        }
    }
    println!("NOMATCH {line:?}");
}

fn describe_captures(input: &[u8], captures: &[logline_radix::Capture]) -> String {
    let parts: Vec<String> = captures
        .iter()
        .map(|c| {
            let name = c.name.as_deref().unwrap_or("_");
            let bytes: &[u8] = match &c.value {
                Some(transformed) => transformed,
                None => &input[c.offset..c.offset + c.length],
            };
            format!("{name}={:?}", String::from_utf8_lossy(bytes))
        })
        .collect();
    parts.join(" ")
}
