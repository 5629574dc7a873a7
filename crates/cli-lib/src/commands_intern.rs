use logline_nv::NvRegistry;

use crate::commands::{Format, InternArgs};
use crate::stdin::read_path_or_stdin;

pub fn run(args: InternArgs) -> i32 {
    let contents = match read_path_or_stdin(&args.words) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("failed to read word list: {e}");
            return 1;
        }
    };

    let registry = NvRegistry::new(&[], args.max_handles);
    let mut interned = Vec::new();
    for word in contents.lines().map(str::trim).filter(|w| !w.is_empty()) {
        let handle = registry.alloc_handle(word);
        interned.push((word.to_string(), handle));
    }

    match args.format {
        Format::Human => {
            for (word, handle) in &interned {
                if handle.is_none() {
                    println!("{word} -> <ceiling reached>");
                } else {
                    println!("{word} -> {}", handle.as_u32());
                }
            }
        }
        Format::Json => {
            let entries: Vec<String> = interned
                .iter()
                .map(|(word, handle)| format!(r#"{{"name":{word:?},"handle":{}}}"#, handle.as_u32()))
                .collect();
            println!("[{}]", entries.join(","));
        }
    }
    0
}
