//! Keyword guardrail deciding whether a question may be answered.
//!
//! Matching is plain case-insensitive substring search with no tokenization,
//! so adjacent phrasing ("死" inside "死線") is filtered too.

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Fixed reading returned for every filtered question.
///
/// Both guardrail layers compare and emit this string byte-for-byte.
pub const SENTINEL: &str = "天機不可洩漏";

/// Category of a forbidden topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TopicCategory {
    Financial,
    LifeDeath,
    Irrelevant,
}

impl TopicCategory {
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Financial => FINANCIAL_KEYWORDS,
            Self::LifeDeath => LIFE_DEATH_KEYWORDS,
            Self::Irrelevant => IRRELEVANT_KEYWORDS,
        }
    }

    /// Instruction line listing the category for the model prompt.
    pub fn prompt_description(self) -> &'static str {
        match self {
            Self::Financial => {
                "Financial investments (stocks, crypto, real estate prices, gambling, specific investment advice)"
            }
            Self::LifeDeath => {
                "Life/death matters (suicide, self-harm, terminal illness, lifespan predictions, serious medical conditions)"
            }
            Self::Irrelevant => {
                "Completely irrelevant requests (coding, math homework, translations, general chitchat)"
            }
        }
    }
}

const FINANCIAL_KEYWORDS: &[&str] = &[
    "股票", "股市", "投資", "炒股", "加密貨幣", "比特幣", "以太坊", "房價", "買房", "賭博", "賭",
    "彩票", "基金", "期貨", "匯率",
];

const LIFE_DEATH_KEYWORDS: &[&str] = &[
    "自殺", "自殘", "死", "壽命", "活多久", "幾歲死", "癌症", "重症", "絕症", "生病", "病情",
    "醫療",
];

const IRRELEVANT_KEYWORDS: &[&str] = &[
    "寫程式", "代碼", "code", "python", "javascript", "function", "數學", "算式", "方程式",
    "翻譯", "translate", "英文",
];

/// Result of classifying a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Clear,
    Sensitive {
        category: TopicCategory,
        keyword: &'static str,
    },
}

impl Verdict {
    pub fn is_sensitive(&self) -> bool {
        matches!(self, Self::Sensitive { .. })
    }
}

/// Classifies a question against every forbidden keyword set.
pub fn classify(question: &str) -> Verdict {
    let lower = question.to_lowercase();
    for category in TopicCategory::iter() {
        if let Some(keyword) = category
            .keywords()
            .iter()
            .find(|keyword| lower.contains(&keyword.to_lowercase()))
        {
            tracing::debug!(category = %category, "question matched a sensitive keyword");
            return Verdict::Sensitive {
                category,
                keyword: *keyword,
            };
        }
    }
    Verdict::Clear
}

pub fn is_sensitive(question: &str) -> bool {
    classify(question).is_sensitive()
}

/// Post-response check: the backend self-censored with the sentinel.
pub fn is_sentinel(reading: &str) -> bool {
    reading.trim() == SENTINEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keyword_is_filtered_in_any_casing() {
        for category in TopicCategory::iter() {
            for keyword in category.keywords() {
                for question in [
                    format!("請問{keyword}的事"),
                    format!("about {} today", keyword.to_uppercase()),
                    format!("{}?", capitalize(keyword)),
                ] {
                    assert!(
                        is_sensitive(&question),
                        "expected '{question}' to be filtered"
                    );
                }
            }
        }
    }

    #[test]
    fn test_reports_first_matching_category() {
        assert_eq!(
            classify("我該買比特幣嗎"),
            Verdict::Sensitive {
                category: TopicCategory::Financial,
                keyword: "比特幣"
            }
        );
        assert!(matches!(
            classify("Can you fix my Python script"),
            Verdict::Sensitive {
                category: TopicCategory::Irrelevant,
                ..
            }
        ));
    }

    #[test]
    fn test_substring_match_prefers_false_positives() {
        // "死線" (deadline) contains the life/death keyword "死"
        assert!(is_sensitive("這週的死線趕得上嗎"));
    }

    #[test]
    fn test_clear_questions_pass() {
        assert_eq!(classify("我和他的感情會順利嗎"), Verdict::Clear);
        assert_eq!(classify("新工作適合我嗎？"), Verdict::Clear);
        assert_eq!(classify(""), Verdict::Clear);
    }

    #[test]
    fn test_sentinel_is_exact_after_trim() {
        assert!(is_sentinel("天機不可洩漏"));
        assert!(is_sentinel("  天機不可洩漏\n"));
        assert!(!is_sentinel("天機不可洩漏。"));
        assert!(!is_sentinel("這是天機不可洩漏的事"));
    }

    fn capitalize(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
