// Profile extraction prompt templates.

/// System prompt for résumé field extraction. Fill `{no_fabrication}` and `{json_only}`.
pub const PROFILE_EXTRACT_SYSTEM_TEMPLATE: &str = "\
You extract application-form fields from a résumé. {no_fabrication} \
If a field is not present in the résumé, use null for strings or an empty list [] for lists. \
Never guess. \
Return a JSON object with EXACTLY this schema: \
{\"name\": string|null, \"email\": string|null, \"phone\": string|null, \
\"skills\": string[], \"experience\": string[], \"education\": string[]}. \
{json_only}";

/// User prompt. Fill `{language}` and `{cv_text}` before sending.
pub const PROFILE_EXTRACT_PROMPT_TEMPLATE: &str = "\
Target language: {language}. If you rephrase items (experience/education), write them in {language}.

RÉSUMÉ TEXT:

{cv_text}";
