//! Canonicalization of free-form LLM output fields.

use std::collections::HashSet;

/// Trims `s`; an empty result becomes `None`.
pub fn norm_str(s: Option<&str>) -> Option<String> {
    let trimmed = s.unwrap_or_default().trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trims every entry, drops blanks and repeats, keeps first-seen order.
pub fn norm_list<I, S>(xs: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for x in xs {
        let x = x.as_ref().trim();
        if !x.is_empty() && seen.insert(x.to_string()) {
            out.push(x.to_string());
        }
    }
    out
}
