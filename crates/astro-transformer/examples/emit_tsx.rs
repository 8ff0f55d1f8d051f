use astro_parser::parse;
use astro_transformer::{transform, TransformOptions};
use std::fs;

fn main() {
    let path = std::env::args()
        .nth(1)
        .expect("Usage: emit_tsx <file.astro>");
    let source = fs::read_to_string(&path).expect("Failed to read file");
    let parsed = parse(&source);
    for error in &parsed.errors {
        eprintln!("warning: {error}");
    }

    let result = transform(
        &parsed.document,
        TransformOptions {
            filename: Some(path.clone()),
        },
    );
    eprintln!(
        "props: {} ({} mappings)",
        result.props.source.kind_name(),
        result.source_map.len()
    );
    println!("{}", result.tsx_code);
}
