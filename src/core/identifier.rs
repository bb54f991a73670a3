/// Renders a name as a quoted CQL identifier so it is matched literally.
///
/// Quoted identifiers keep their case, and a `"` inside the name is written
/// twice, e.g. `My"Table` becomes `"My""Table"`.
pub fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for ch in name.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Inverse of [`quote_identifier`]. Unquoted input is returned as is.
pub fn unquote_identifier(name: &str) -> String {
    match name
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => name.to_string(),
    }
}

/// Resolves an identifier the way CQL does: quoted names match exactly,
/// unquoted names are folded to lower case.
pub fn normalize_identifier(name: &str) -> String {
    if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
        unquote_identifier(name)
    } else {
        name.to_lowercase()
    }
}

/// Writes a name for CQL text, quoting only when an unquoted name would not
/// round-trip (upper case, leading digit, punctuation).
pub fn escape_identifier(name: &str) -> String {
    let mut chars = name.chars();
    let plain = matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if plain {
        name.to_string()
    } else {
        quote_identifier(name)
    }
}
