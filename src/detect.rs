use std::sync::OnceLock;

use regex::Regex;

fn quick_syntax() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{.+?\}\}|#if \{\{.+?\}\}").expect("detector pattern is valid")
    })
}

/// Whether `template` uses any template syntax worth compiling: a non-empty
/// single-line `{{...}}` or an `#if {{...}}` block.
pub fn detect(template: &str) -> bool {
    quick_syntax().is_match(template)
}
