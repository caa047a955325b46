//! Text the guide character shows around a reading.

use serde::Serialize;
use strum::Display;

use super::state::FlowStep;

/// Placeholder summary before a reading arrives.
pub const PENDING_CORE_MESSAGE: &str = "星象正在為你指引方向...";
/// Characters kept in the summary printed on the export card.
pub const CORE_MESSAGE_CHARS: usize = 80;

/// Expression the guide character wears for a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mood {
    Calm,
    Excited,
    Happy,
    Confused,
    Pet,
}

// Checked in order; the first group with a hit wins.
const MOOD_RULES: &[(Mood, &[&str])] = &[
    (Mood::Excited, &["成功", "好運", "喜悅", "順利", "美好"]),
    (Mood::Happy, &["愛", "溫暖", "療癒", "陪伴"]),
    (Mood::Confused, &["迷茫", "困惑", "不確定", "等待", "思考"]),
    (Mood::Pet, &["挑戰", "困難", "阻礙", "需要"]),
];

/// Picks the guide's expression from the words used in a reading.
pub fn mood_for(reading: &str) -> Mood {
    let lower = reading.to_lowercase();
    MOOD_RULES
        .iter()
        .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
        .map(|(mood, _)| *mood)
        .unwrap_or(Mood::Calm)
}

/// Short summary of a reading for the export card.
pub fn core_message(reading: &str) -> String {
    if reading.trim().is_empty() {
        return PENDING_CORE_MESSAGE.to_string();
    }
    if reading.chars().count() > CORE_MESSAGE_CHARS {
        let head: String = reading.chars().take(CORE_MESSAGE_CHARS).collect();
        format!("{head}...")
    } else {
        reading.to_string()
    }
}

/// Line the guide says at each step. `result_message` overrides the result line.
pub fn guide_line(step: FlowStep, result_message: Option<&str>) -> &str {
    match step {
        FlowStep::Welcome => "今天有什麼疑惑呢？",
        FlowStep::Input => "告訴我你的問題，我會幫你找到答案喵～",
        FlowStep::Draw => "選一張牌，開啟今日旅行吧～",
        FlowStep::Loading => "讓我看看星圖怎麼說...",
        FlowStep::Result => result_message.unwrap_or("這張牌的能量很適合你喵！"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_priority() {
        assert_eq!(mood_for(""), Mood::Calm);
        assert_eq!(mood_for("你會迎來成功，但也需要耐心"), Mood::Excited);
        assert_eq!(mood_for("溫暖的陪伴就在身邊"), Mood::Happy);
        assert_eq!(mood_for("此刻請先等待"), Mood::Confused);
        assert_eq!(mood_for("眼前的阻礙是試煉"), Mood::Pet);
        assert_eq!(mood_for("星光靜靜地照耀"), Mood::Calm);
    }

    #[test]
    fn test_core_message_truncates_by_chars() {
        assert_eq!(core_message(""), PENDING_CORE_MESSAGE);
        assert_eq!(core_message(" \n\t "), PENDING_CORE_MESSAGE);
        assert_eq!(core_message("短訊息"), "短訊息");

        let long = "星".repeat(CORE_MESSAGE_CHARS + 5);
        let summary = core_message(&long);
        assert_eq!(summary.chars().count(), CORE_MESSAGE_CHARS + 3);
        assert!(summary.ends_with("..."));

        let exact = "星".repeat(CORE_MESSAGE_CHARS);
        assert_eq!(core_message(&exact), exact);
    }

    #[test]
    fn test_guide_line_override() {
        assert_eq!(guide_line(FlowStep::Welcome, Some("ignored")), "今天有什麼疑惑呢？");
        assert_eq!(guide_line(FlowStep::Result, Some("好好休息")), "好好休息");
        assert_eq!(guide_line(FlowStep::Result, None), "這張牌的能量很適合你喵！");
    }
}
