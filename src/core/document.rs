use crate::{err, error::ShelfError};
use regex::Regex;
use std::sync::OnceLock;

pub mod store;

/// Matches anything that is not allowed in a stored file name.
fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid regex"))
}

/// Produce a file name safe to use as a single path component.
///
/// Only the base name of `name` is kept, whitespace is collapsed to `_`,
/// anything outside `[A-Za-z0-9_.-]` is dropped, and leading dots or
/// underscores are stripped so the result can never be hidden or point
/// upwards.
///
/// * `name`: The original file name, as sent by the client.
pub fn sanitize_file_name(name: &str) -> Result<String, ShelfError> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let joined = base.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = unsafe_chars().replace_all(&joined, "");
    let cleaned = cleaned.trim_start_matches(['.', '_']);

    if cleaned.is_empty() {
        return err!(InvalidFile, "file name '{name}' is empty after sanitizing");
    }

    Ok(cleaned.to_string())
}
