//! Component naming.

/// Filename used for components read from standard input.
pub const STDIN_FILENAME: &str = "<stdin>";

/// Derives the component name prefix from a file path.
///
/// Given `/path/to/card.astro`, returns `"Card"`: the basename up to its
/// first `.`, with the first character upper-cased. Names that are not valid
/// identifiers are converted to PascalCase. Returns an empty string when no
/// name can be derived, which leaves the function name unprefixed.
pub fn component_name_from_path(path: &str) -> String {
    if path.is_empty() || path == STDIN_FILENAME {
        return String::new();
    }

    let basename = path
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path);
    let stem = basename.split('.').next().unwrap_or(basename);

    let mut chars = stem.chars();
    let name: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => return String::new(),
    };

    if is_identifier(&name) {
        name
    } else {
        sanitize_component_name(stem)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Converts a name to a PascalCase identifier.
/// - Removes leading characters that cannot start a name (like `[` in `[slug]`)
/// - Capitalizes after `-`, `.`, `_` and spaces
/// - Drops anything else that cannot appear in an identifier
fn sanitize_component_name(name: &str) -> String {
    let name = name.trim_start_matches(|c: char| !c.is_alphabetic());

    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = true;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if capitalize_next {
                result.extend(c.to_uppercase());
                capitalize_next = false;
            } else {
                result.push(c);
            }
        } else if matches!(c, '-' | '.' | '_' | ' ') {
            capitalize_next = true;
        }
    }

    result
}
