use kbgraph_core::catalog::FieldKind;
use kbgraph_core::metapath::PathKind;

pub(super) fn parse_min_one_usize(raw: &str) -> std::result::Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("invalid integer value '{raw}'"))?;
    if value == 0 {
        return Err("value must be >= 1".to_string());
    }
    Ok(value)
}

pub(super) fn parse_field_kind(raw: &str) -> std::result::Result<FieldKind, String> {
    raw.parse::<FieldKind>().map_err(|err| err.to_string())
}

pub(super) fn parse_path_kind(raw: &str) -> std::result::Result<PathKind, String> {
    raw.parse::<PathKind>().map_err(|err| err.to_string())
}
