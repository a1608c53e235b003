/**
 * Prompt Builder
 *
 * Pure functions that render generation parameters into the instruction
 * strings sent to the text-generation provider, plus the post-processing
 * applied to meta descriptions and slugs coming back from it.
 *
 * Nothing in here performs I/O or fails; input validation happens before
 * a prompt is rendered.
 */

use crate::shared::GenerationParameters;

/// Longest meta description kept, in characters
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;

/// Longest slug kept, in bytes (slugs are ASCII)
pub const SLUG_MAX_LEN: usize = 80;

const BLOG_FORMAT_INSTRUCTION: &str =
    "Format the blog post with proper headings, paragraphs, and a conclusion.";

/// Render the prompt for a full blog post body
///
/// The keyword sentence is only present when keywords were supplied.
pub fn blog_post_prompt(params: &GenerationParameters) -> String {
    let mut prompt = format!(
        "Write a blog post about {}.\nTone: {}\nTarget Length: {}\nTarget Audience: {}\n",
        params.topic,
        params.tone,
        params.length.word_guide(),
        params.target_audience,
    );

    if !params.keywords.is_empty() {
        prompt.push_str("Include these keywords naturally: ");
        prompt.push_str(&params.keywords.join(", "));
        prompt.push('\n');
    }

    prompt.push_str(BLOG_FORMAT_INSTRUCTION);
    prompt
}

/// Render the prompt for a meta description of `content`
pub fn meta_description_prompt(content: &str) -> String {
    format!(
        "Generate a compelling meta description (max {} characters) for this blog post. \
         Respond with the description only.\n\n{}",
        META_DESCRIPTION_MAX_CHARS, content
    )
}

/// Render the prompt for a URL slug derived from `title`
pub fn slug_prompt(title: &str) -> String {
    format!(
        "Convert this blog post title into a URL-friendly slug.\n\n\
         Title: {}\n\n\
         Rules:\n\
         1. Use lowercase\n\
         2. Replace spaces with hyphens\n\
         3. Remove special characters\n\
         4. Keep it concise\n\
         5. Make it SEO-friendly\n\n\
         Respond with the slug only.",
        title
    )
}

/// Reduce arbitrary text to a URL slug
///
/// Keeps lowercase ASCII alphanumerics and collapses every other run of
/// characters into one hyphen. Never starts or ends with a hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len().min(SLUG_MAX_LEN));
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > SLUG_MAX_LEN {
        slug.truncate(SLUG_MAX_LEN);
        let trimmed = slug.trim_end_matches('-').len();
        slug.truncate(trimmed);
    }
    slug
}

/// Turn raw model output into a slug, falling back to the title
///
/// Only the first non-empty line of the output is used. Returns `None` when
/// neither the output nor the title contain any usable characters.
pub fn normalize_slug(raw: &str, title: &str) -> Option<String> {
    let first_line = raw.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or("");
    let slug = slugify(first_line);
    if !slug.is_empty() {
        return Some(slug);
    }

    let fallback = slugify(title);
    (!fallback.is_empty()).then_some(fallback)
}

/// Trim quotes and whitespace and cap the description length
pub fn clean_meta_description(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('"').trim();
    match trimmed.char_indices().nth(META_DESCRIPTION_MAX_CHARS) {
        Some((cut, _)) => trimmed[..cut].trim_end().to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::BlogLength;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_blog_prompt_contains_parameters() {
        let params = GenerationParameters::new("Test Topic")
            .with_tone("professional")
            .with_length(BlogLength::Medium)
            .with_audience("technical")
            .with_keywords(["test", "blog"]);

        let prompt = blog_post_prompt(&params);

        assert!(prompt.contains("Test Topic"));
        assert!(prompt.contains("Tone: professional"));
        assert!(prompt.contains("1000-1500 words"));
        assert!(prompt.contains("Target Audience: technical"));
        assert!(prompt.contains("Include these keywords naturally: test, blog"));
        assert!(prompt.ends_with(BLOG_FORMAT_INSTRUCTION));
    }

    #[test]
    fn test_blog_prompt_length_guides() {
        for (length, guide) in [
            (BlogLength::Short, "500-800 words"),
            (BlogLength::Medium, "1000-1500 words"),
            (BlogLength::Long, "2000-2500 words"),
        ] {
            let prompt = blog_post_prompt(&GenerationParameters::new("x").with_length(length));
            assert!(prompt.contains(&format!("Target Length: {}", guide)));
        }

        let params: GenerationParameters =
            serde_json::from_str(r#"{"topic": "x", "length": "gigantic"}"#).unwrap();
        assert!(blog_post_prompt(&params).contains("1000-1500 words"));
    }

    #[test]
    fn test_blog_prompt_without_keywords() {
        let prompt = blog_post_prompt(&GenerationParameters::new("Gardening"));
        assert!(!prompt.contains("keywords"));
        assert!(prompt.ends_with(BLOG_FORMAT_INSTRUCTION));
    }

    #[test]
    fn test_keywords_keep_input_order() {
        let params = GenerationParameters::new("x").with_keywords(["zeta", "alpha", "mu"]);
        assert!(blog_post_prompt(&params).contains("zeta, alpha, mu"));
    }

    #[test]
    fn test_slug_prompt_lists_rules() {
        let prompt = slug_prompt("My Title");
        assert!(prompt.contains("Title: My Title"));
        assert!(prompt.contains("Use lowercase"));
        assert!(prompt.contains("Replace spaces with hyphens"));
        assert!(prompt.contains("Remove special characters"));
        assert!(prompt.contains("Keep it concise"));
    }

    #[test]
    fn test_meta_prompt_includes_content() {
        let prompt = meta_description_prompt("A body of text");
        assert!(prompt.contains("max 160 characters"));
        assert!(prompt.ends_with("A body of text"));
    }

    #[test]
    fn test_slugify_examples() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  --Rust   & Tokio: A Guide--  "), "rust-tokio-a-guide");
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_caps_length() {
        let long = "word ".repeat(40);
        let slug = slugify(&long);
        assert!(slug.len() <= SLUG_MAX_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_normalize_slug_uses_first_line_then_title() {
        assert_eq!(
            normalize_slug("\n  my-great-post \nexplanation", "ignored"),
            Some("my-great-post".to_string())
        );
        assert_eq!(normalize_slug("***", "Fallback Title"), Some("fallback-title".to_string()));
        assert_eq!(normalize_slug("", "???"), None);
    }

    #[test]
    fn test_clean_meta_description() {
        assert_eq!(clean_meta_description("  \"Short and sweet.\"  "), "Short and sweet.");

        let long = "é".repeat(200);
        let cleaned = clean_meta_description(&long);
        assert_eq!(cleaned.chars().count(), META_DESCRIPTION_MAX_CHARS);
    }

    proptest! {
        #[test]
        fn prop_slugify_output_is_url_safe(input in any::<String>()) {
            let slug = slugify(&input);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn prop_normalized_slug_is_url_safe(raw in ".*", title in "[ -~]{0,60}") {
            if let Some(slug) = normalize_slug(&raw, &title) {
                prop_assert!(!slug.is_empty());
                prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
                prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
                prop_assert!(!slug.contains("--"));
            }
        }
    }
}
