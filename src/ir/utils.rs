//! Naming utilities shared across normalization and binding synthesis.

/// Sanitize a name into an identifier usable in any generation target:
/// splits on `-`, `.`, and spaces into camelCase, prepends `_` when the
/// result would start with a digit.
pub fn sanitize_ident(name: &str) -> String {
    if name.is_empty() {
        return "_empty".to_string();
    }

    let parts: Vec<&str> = name.split(['-', '.', ' ', '_']).collect();

    let mut result = String::new();
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 || result.is_empty() {
            result.push_str(part);
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                result.extend(first.to_uppercase());
                result.extend(chars);
            }
        }
    }

    if result.is_empty() {
        return "_empty".to_string();
    }

    if result
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
    {
        result = format!("_{result}");
    }

    result
}

/// Normalize an operation id to the PascalCase prefix used for its generated
/// type names. Separator-delimited ids (`get_user_by_id`, `get-user-by-id`)
/// and camelCase ids (`getUserById`) normalize to the same prefix, which is
/// exactly the collision the duplicate-operation check runs on.
pub fn pascal_case(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let has_separators = name.contains(['_', '-', '.', ' ']);

    if has_separators {
        let mut result = String::new();
        for part in name.split(|c: char| !c.is_ascii_alphanumeric()) {
            if part.is_empty() {
                continue;
            }
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                result.extend(first.to_uppercase());
                result.push_str(&chars.as_str().to_lowercase());
            }
        }
        return result;
    }

    // camelCase: capitalize the first letter, keep interior capitalization.
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
