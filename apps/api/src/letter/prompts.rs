// Cover letter prompt templates.

/// System prompt for letter generation. Fill `{no_fabrication}`.
pub const LETTER_SYSTEM_TEMPLATE: &str = "\
You are a career assistant. Write a cover letter for the job posting below, \
relying ONLY on the candidate profile (JSON) and the job posting text. \
{no_fabrication} \
Never claim skills or experience the profile does not list.";

/// User prompt. Fill `{language}`, `{tone}`, `{length}`, `{profile_json}`
/// and `{job_text}` with `llm_client::prompts::render`.
pub const LETTER_PROMPT_TEMPLATE: &str = "\
Letter language: {language}. Tone: {tone}. Length: {length}.

CANDIDATE PROFILE (JSON):
{profile_json}

JOB POSTING (text extracted from the page):
{job_text}

Return ONLY the body of the letter: no JSON, no markdown fences, no commentary.";
