/// Lower-cases and trims a user-supplied name.
pub(crate) fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `%needle%` with SQL LIKE wildcards in the needle escaped by `\`.
pub(crate) fn contains_pattern(needle: &str) -> String {
    format!("%{}%", escape_like(needle))
}

pub(crate) fn prefix_pattern(needle: &str) -> String {
    format!("{}%", escape_like(needle))
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Snapshot list columns are JSON arrays; anything else is kept verbatim.
pub(crate) fn parse_json_list(raw: Option<&str>) -> Vec<String> {
    match raw.map(str::trim) {
        None | Some("") => Vec::new(),
        Some(value) => {
            serde_json::from_str::<Vec<String>>(value).unwrap_or_else(|_| vec![value.to_string()])
        }
    }
}

/// Preserves first-seen order.
pub(crate) fn dedup_in_order(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if value.is_empty() || out.contains(&value) {
            continue;
        }
        out.push(value);
    }
    out
}
