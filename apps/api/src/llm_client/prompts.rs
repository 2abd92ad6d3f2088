// Shared prompt fragments.
// Each flow that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Grounding rule shared by every prompt: the model may only restate what it was given.
pub const NO_FABRICATION: &str = "\
    Use ONLY facts present in the material provided below. \
    Do NOT invent employers, dates, degrees, skills, contact details or achievements. \
    If something is not stated, leave it out.";

/// Output rule for prompts that expect a bare JSON object.
pub const JSON_OBJECT_ONLY: &str = "\
    Respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT add keys that are not in the schema.";

/// Fills `{name}` placeholders in a single pass, so substituted values are never
/// re-scanned. Braces that don't name a known variable are copied as-is.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substitution = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match substitution {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
