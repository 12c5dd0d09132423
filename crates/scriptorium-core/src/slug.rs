use std::collections::HashSet;

/// Synthetic slug base used when a title normalizes to nothing
/// (empty, whitespace-only, or punctuation-only titles).
pub const FALLBACK_SLUG: &str = "article";

/// Normalize text into a URL-safe slug: lowercase, hyphen-separated,
/// punctuation stripped, consecutive separators collapsed.
///
/// Whitespace, hyphens and underscores act as separators; any other
/// non-alphanumeric character is dropped without producing a hyphen, so
/// `"Rust & Tokio"` becomes `"rust-tokio"` and `"don't"` becomes `"dont"`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_separator = true;
        }
    }
    out
}

/// Compute a slug for `title` that does not collide with any slug in `taken`.
///
/// The base is `slugify(title)` (or [`FALLBACK_SLUG`] when that is empty).
/// On collision the first free of `base-1`, `base-2`, … is returned.
///
/// Callers invoke this exactly once per article, at first persistence;
/// later title edits never regenerate the slug.
pub fn unique_slug(title: &str, taken: &HashSet<String>) -> String {
    let base = {
        let slug = slugify(title);
        if slug.is_empty() {
            FALLBACK_SLUG.to_string()
        } else {
            slug
        }
    };
    unique_from_base(&base, taken)
}

/// Disambiguate an already-normalized base against `taken`. Exposed for
/// callers that substitute their own fallback base (topics, for example).
pub fn unique_from_base(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut suffix = 1u64;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("My Awesome Article", "my-awesome-article")]
    #[case("Article with @#$% Special Chars!", "article-with-special-chars")]
    #[case("  Leading and trailing  ", "leading-and-trailing")]
    #[case("snake_case_title", "snake-case-title")]
    #[case("Already-Hyphenated --- Title", "already-hyphenated-title")]
    #[case("don't panic", "dont-panic")]
    #[case("UPPER lower 123", "upper-lower-123")]
    #[case("", "")]
    #[case("!!!", "")]
    fn slugify_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn unique_slug_returns_base_when_free() {
        let taken = HashSet::new();
        assert_eq!(unique_slug("Same Title", &taken), "same-title");
    }

    #[test]
    fn unique_slug_appends_counter_on_collision() {
        let mut taken = HashSet::new();
        taken.insert("same-title".to_string());
        assert_eq!(unique_slug("Same Title", &taken), "same-title-1");
        taken.insert("same-title-1".to_string());
        assert_eq!(unique_slug("Same Title", &taken), "same-title-2");
    }

    #[test]
    fn unique_slug_skips_holes_to_first_free_candidate() {
        let taken: HashSet<String> = ["post", "post-1", "post-3"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(unique_slug("Post", &taken), "post-2");
    }

    #[test]
    fn empty_title_falls_back_to_synthetic_base() {
        let taken = HashSet::new();
        assert_eq!(unique_slug("", &taken), FALLBACK_SLUG);

        let taken: HashSet<String> = [FALLBACK_SLUG.to_string()].into_iter().collect();
        assert_eq!(unique_slug("?!", &taken), "article-1");
    }
}
