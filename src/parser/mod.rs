pub mod perks;
pub mod recipe;
pub mod slot;
pub mod tier;

/// Collapse non-breaking spaces to ordinary spaces and trim.
pub fn clean_string(s: &str) -> String {
    s.replace('\u{a0}', " ").trim().to_string()
}

/// Like [`clean_string`], but an empty result becomes `None`.
pub fn clean_opt(s: Option<&str>) -> Option<String> {
    s.map(clean_string).filter(|s| !s.is_empty())
}
