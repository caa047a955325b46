//! Post-processing of raw model output.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::guardrail;
use crate::reading::ReadingOutcome;

// Trailing cat vocalizations, optionally followed by tilde decorations.
static MEOW_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"喵+[～~]*$").unwrap());
static TILDE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"~+$").unwrap());

/// Strips the playful suffix the model tends to append despite instructions.
pub fn sanitize(reading: &str) -> String {
    let without_meow = MEOW_SUFFIX.replace(reading, "");
    let without_tilde = TILDE_SUFFIX.replace(&without_meow, "");
    without_tilde.trim().to_string()
}

/// Turns raw backend text into an outcome: the second guardrail layer, then
/// the cosmetic sanitizer.
pub fn finalize_reading(raw: &str) -> ReadingOutcome {
    if guardrail::is_sentinel(raw) {
        return ReadingOutcome::filtered();
    }
    ReadingOutcome::Success {
        text: sanitize(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrail::SENTINEL;

    #[test]
    fn test_strips_trailing_meow() {
        assert_eq!(sanitize("一切都會好轉的喵～"), "一切都會好轉的");
        assert_eq!(sanitize("一切都會好轉的喵喵~~"), "一切都會好轉的");
        assert_eq!(sanitize("一切都會好轉的~~~"), "一切都會好轉的");
    }

    #[test]
    fn test_leaves_clean_text_alone() {
        assert_eq!(sanitize("一切都會好轉的"), "一切都會好轉的");
        // only a trailing suffix is removed
        assert_eq!(sanitize("喵～星光指引你。"), "喵～星光指引你。");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(sanitize("  星光指引你。喵\n"), "星光指引你。喵");
        assert_eq!(sanitize("  星光指引你。喵"), "星光指引你。");
    }

    #[test]
    fn test_finalize_detects_sentinel() {
        assert!(finalize_reading(&format!(" {SENTINEL}\n")).is_filtered());
        assert_eq!(
            finalize_reading("高塔崩落之後是重建喵～"),
            ReadingOutcome::Success {
                text: "高塔崩落之後是重建".into()
            }
        );
    }
}
