//! Reading prompt composition.
//!
//! The prompt carries its own copy of the guardrail so the model can refuse
//! phrasing the keyword lists miss, answering with [`SENTINEL`] verbatim.

use minijinja::{Environment, context};
use strum::IntoEnumIterator;

use crate::card::{Card, Orientation, card_by_name};
use crate::error::{PassportError, Result};
use crate::guardrail::{SENTINEL, TopicCategory};

/// Upper bound on reading length requested from the model.
pub const MAX_READING_WORDS: u32 = 150;

/// Language every reading must be written in.
pub const TARGET_LANGUAGE: &str = "Traditional Chinese (繁體中文)";

const TEMPLATE_NAME: &str = "reading";

const READING_TEMPLATE: &str = r#"You are Ori, a wise and mystical Tarot Reader with decades of experience. You speak with calm authority and penetrating insight.

CRITICAL GUARDRAIL RULES (Execute First):
Analyze the user's question: "{{ question }}"

If the question involves ANY of the following topics, respond with ONLY these exact 4 Chinese characters and NOTHING else:
{{ sentinel }}

Forbidden topics:
{% for topic in forbidden_topics -%}
- {{ topic }}
{% endfor %}
If the question passes the guardrails, proceed with the reading below.

---

TAROT READING INSTRUCTIONS:
Card Drawn: {{ card_name }} ({{ card_name_ch }}) - {{ orientation_label }}

Visual Imagery to Reference:
{{ imagery }}

Key Themes:
{{ keywords }}

Your Reading Must Include:
1. **Specific Visual Metaphor**: Directly reference ONE concrete visual element from the card imagery and connect it to the user's question.

2. **Definitive Answer**: Be specific and direct. Avoid phrases like "maybe" or "possibly." Say exactly what you see.

3. **{{ energy_title }}**:
   - {{ energy_focus }}

4. **Actionable Insight**: Tell the user ONE specific thing they should do or consider based on this card.

5. **Tone**:
   - Mystical yet grounded
   - Insightful and penetrating
   - NO cute cat sounds (喵) or playful language
   - Write like a seasoned oracle who sees deeply but speaks kindly
   - Do not be condescending or overly motherly. Treat the user as an equal seeking guidance.

6. **Length**: Maximum {{ max_words }} words. Be concise and impactful.

7. **Language**: Write entirely in {{ language }}.

Begin your reading now."#;

/// Looks up the reference entry the prompt is built from.
///
/// Callers on the request path use this to fail with
/// [`PassportError::MissingReferenceData`] before any network attempt.
pub fn resolve_card(card_name: &str) -> Result<&'static Card> {
    card_by_name(card_name).ok_or_else(|| PassportError::missing_reference(card_name))
}

/// Composes the model prompt for a question and drawn card.
pub fn build_prompt(
    question: &str,
    card_name: &str,
    card_name_ch: &str,
    is_reversed: bool,
) -> Result<String> {
    let card = resolve_card(card_name)?;
    let orientation = Orientation::from_reversed(is_reversed);

    let (orientation_label, energy_title, energy_focus) = match orientation {
        Orientation::Upright => (
            "Upright (正位)",
            "Upright Energy",
            "Emphasize FLOW, MANIFESTATION, and EXTERNAL ACTION. The energy is moving forward and supporting growth.",
        ),
        Orientation::Reversed => (
            "Reversed (逆位)",
            "Reversed Energy",
            "Emphasize BLOCKAGE, INTERNAL REFLECTION, or REVERSED FLOW of energy. The lesson is often about what needs to be released or reconsidered.",
        ),
    };

    let forbidden_topics: Vec<&str> = TopicCategory::iter()
        .map(TopicCategory::prompt_description)
        .collect();

    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, READING_TEMPLATE)?;
    let prompt = env.get_template(TEMPLATE_NAME)?.render(context! {
        question => question,
        sentinel => SENTINEL,
        forbidden_topics => forbidden_topics,
        card_name => card.name,
        card_name_ch => card_name_ch,
        orientation_label => orientation_label,
        imagery => card.imagery,
        keywords => card.keywords(orientation),
        energy_title => energy_title,
        energy_focus => energy_focus,
        max_words => MAX_READING_WORDS,
        language => TARGET_LANGUAGE,
    })?;

    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::MAJOR_ARCANA;

    #[test]
    fn test_prompt_embeds_reference_data_for_every_card() {
        for card in MAJOR_ARCANA.iter() {
            for reversed in [false, true] {
                let prompt = build_prompt("我的新工作會順利嗎", card.name, card.name_ch, reversed)
                    .expect("prompt should build");

                assert!(prompt.contains(card.imagery), "imagery missing for {}", card.name);
                let (wanted, other) = if reversed {
                    (card.reversed_keywords, card.upright_keywords)
                } else {
                    (card.upright_keywords, card.reversed_keywords)
                };
                assert!(prompt.contains(wanted));
                assert!(!prompt.contains(other));
            }
        }
    }

    #[test]
    fn test_prompt_embeds_guardrail_contract() {
        let prompt = build_prompt("感情運勢", "The Star", "星星", false).unwrap();

        assert!(prompt.contains("Analyze the user's question: \"感情運勢\""));
        assert!(prompt.contains(SENTINEL));
        for category in TopicCategory::iter() {
            assert!(prompt.contains(category.prompt_description()));
        }
        assert!(prompt.contains("Card Drawn: The Star (星星) - Upright (正位)"));
        assert!(prompt.contains("Upright Energy"));
        assert!(prompt.contains("Maximum 150 words"));
        assert!(prompt.contains(TARGET_LANGUAGE));
        assert!(prompt.contains("ONE specific thing"));
    }

    #[test]
    fn test_reversed_prompt_frames_blockage() {
        let prompt = build_prompt("感情運勢", "The Tower", "高塔", true).unwrap();
        assert!(prompt.contains("Reversed (逆位)"));
        assert!(prompt.contains("BLOCKAGE"));
        assert!(!prompt.contains("Upright Energy"));
    }

    #[test]
    fn test_unknown_card_is_missing_reference_data() {
        let err = build_prompt("感情運勢", "The Jester", "小丑", false).unwrap_err();
        assert!(err.is_missing_reference());
    }
}
