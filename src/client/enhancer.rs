/// Keywords whose presence marks a prompt as already quality-tuned.
const QUALITY_KEYWORDS: [&str; 5] = [
    "8k",
    "highly detailed",
    "photorealistic",
    "cinematic lighting",
    "masterpiece",
];

/// Suffix appended to prompts that carry none of the quality keywords.
const ENHANCEMENT_SUFFIX: &str =
    ", highly detailed, 8k resolution, cinematic lighting, professional photography, aesthetic masterpiece";

/// Append quality-boosting keywords to a prompt unless it already contains
/// any of them (case-insensitive). Pure and idempotent: a second application
/// is a no-op because the suffix itself carries the keywords.
pub fn enhance(prompt: &str) -> String {
    let lowered = prompt.to_lowercase();
    let has_quality_keywords = QUALITY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword));

    if has_quality_keywords {
        prompt.to_string()
    } else {
        format!("{}{}", prompt, ENHANCEMENT_SUFFIX)
    }
}
