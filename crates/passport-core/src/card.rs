//! Major arcana reference data and drawn cards.
//!
//! The 22 cards are compiled into the binary and never change at runtime,
//! so lookups hand out `&'static Card` references that any number of sessions
//! can share without locking.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Suffix appended to display names of reversed cards.
pub const REVERSED_MARK: &str = " (逆位)";

/// One of the 22 major arcana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u8,
    pub name: &'static str,
    pub name_ch: &'static str,
    /// Concrete visual elements printed on the card face
    pub imagery: &'static str,
    pub upright_keywords: &'static str,
    pub reversed_keywords: &'static str,
}

impl Card {
    /// Keyword set matching the given orientation.
    pub fn keywords(&self, orientation: Orientation) -> &'static str {
        match orientation {
            Orientation::Upright => self.upright_keywords,
            Orientation::Reversed => self.reversed_keywords,
        }
    }

    /// Path of the card face image served to the UI.
    pub fn image_path(&self) -> String {
        format!("/tarot/card-{}.png", self.id)
    }
}

/// Upright or reversed state of a drawn card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Orientation {
    Upright,
    Reversed,
}

impl Orientation {
    pub fn from_reversed(is_reversed: bool) -> Self {
        if is_reversed {
            Self::Reversed
        } else {
            Self::Upright
        }
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, Self::Reversed)
    }

    /// Samples an orientation with equal probability.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_reversed(rng.gen_bool(0.5))
    }
}

/// A card pulled for the current flow, with its sampled orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnCard {
    pub card: &'static Card,
    pub orientation: Orientation,
    pub display_name: String,
    pub display_name_ch: String,
}

impl DrawnCard {
    pub fn new(card: &'static Card, orientation: Orientation) -> Self {
        let mark = if orientation.is_reversed() {
            REVERSED_MARK
        } else {
            ""
        };
        Self {
            card,
            orientation,
            display_name: format!("{}{}", card.name, mark),
            display_name_ch: format!("{}{}", card.name_ch, mark),
        }
    }

    /// Draws a uniformly random card with a uniformly random orientation.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let card = &MAJOR_ARCANA[rng.gen_range(0..MAJOR_ARCANA.len())];
        Self::new(card, Orientation::sample(rng))
    }

    pub fn is_reversed(&self) -> bool {
        self.orientation.is_reversed()
    }
}

/// Looks a card up by its identifier (0–21).
pub fn card_by_id(id: u8) -> Option<&'static Card> {
    MAJOR_ARCANA.get(id as usize)
}

/// Looks a card up by its canonical English name (exact match).
pub fn card_by_name(name: &str) -> Option<&'static Card> {
    MAJOR_ARCANA.iter().find(|card| card.name == name)
}

macro_rules! card {
    ($id:expr, $name:expr, $name_ch:expr, $imagery:expr, $upright:expr, $reversed:expr) => {
        Card {
            id: $id,
            name: $name,
            name_ch: $name_ch,
            imagery: $imagery,
            upright_keywords: $upright,
            reversed_keywords: $reversed,
        }
    };
}

pub static MAJOR_ARCANA: [Card; 22] = [
    card!(0, "The Fool", "愚者",
        "懸崖邊緣的年輕旅人、白色的小狗、背後的太陽、手中的白玫瑰",
        "新開始、冒險精神、純真信任、無限可能",
        "魯莽行動、缺乏計畫、逃避現實、恐懼未知"),
    card!(1, "The Magician", "魔術師",
        "桌上的四元素象徵（杯劍錢幣權杖）、無限符號、一手指天一手指地",
        "顯化能力、創造力、資源整合、行動力",
        "操縱欺騙、能力浪費、缺乏方向、自我懷疑"),
    card!(2, "The High Priestess", "女祭司",
        "黑白兩柱、月亮冠冕、手中的律法書卷、石榴圖騰簾幕",
        "直覺智慧、神祕知識、內在聲音、潛意識",
        "忽視直覺、秘密曝光、情緒壓抑、資訊不足"),
    card!(3, "The Empress", "皇后",
        "豐饒的麥田、流動的河水、十二星冠冕、柔軟的坐墊",
        "創造豐盛、母性能量、感官享受、自然連結",
        "過度依賴、創意受阻、忽略自我、物質匱乏"),
    card!(4, "The Emperor", "皇帝",
        "石製王座、公羊頭雕飾、權杖與寶球、堅固的山脈背景",
        "建立秩序、領導權威、理性決策、穩定結構",
        "控制過度、缺乏彈性、權威濫用、結構崩解"),
    card!(5, "The Hierophant", "教皇",
        "兩位跪拜的信徒、交叉的鑰匙、三層冠冕、祝福的手勢",
        "傳統智慧、精神導師、群體歸屬、道德規範",
        "打破傳統、質疑權威、獨立思考、規則束縛"),
    card!(6, "The Lovers", "戀人",
        "伊甸園中的亞當夏娃、天使拉斐爾、知識之樹與生命之樹",
        "愛的選擇、和諧連結、價值對齊、神聖結合",
        "關係失衡、價值衝突、錯誤選擇、內在分裂"),
    card!(7, "The Chariot", "戰車",
        "黑白雙獅、星冠戰士、城市背景、方形護甲",
        "意志勝利、方向明確、克服障礙、自律前進",
        "失去控制、方向迷失、內在衝突、缺乏動力"),
    card!(8, "Strength", "力量",
        "溫柔馴服獅子的女性、無限符號、白袍與花環、山脈遠景",
        "內在力量、溫柔勇氣、情緒掌控、耐心堅持",
        "自我懷疑、恐懼主導、失去耐心、力量濫用"),
    card!(9, "The Hermit", "隱者",
        "雪山頂峰的老者、照亮道路的提燈、六芒星光芒、拐杖",
        "內在探索、孤獨智慧、精神指引、深度反思",
        "過度孤立、拒絕指引、迷失方向、逃避現實"),
    card!(10, "Wheel of Fortune", "命運之輪",
        "旋轉的命運之輪、四元素生物、埃及神祇、蛇與阿努比斯",
        "命運轉機、循環規律、好運來臨、業力回報",
        "壞運循環、抗拒改變、失去控制、業力清算"),
    card!(11, "Justice", "正義",
        "天秤與劍、紅袍法官、兩根灰柱、公正的凝視",
        "公平裁決、因果法則、真相顯現、平衡恢復",
        "不公對待、逃避責任、內疚自責、判斷失誤"),
    card!(12, "The Hanged Man", "倒吊人",
        "倒吊於T型木架、光環、平靜表情、自願犧牲的姿態",
        "暫停等待、換位思考、靈性覺醒、自願放下",
        "無謂犧牲、拒絕放手、停滯不前、殉道心態"),
    card!(13, "Death", "死神",
        "白馬上的骷髏騎士、黑色旗幟的白玫瑰、落日與船隻、跪拜的國王",
        "轉化結束、必然改變、舊我死亡、新生開始",
        "抗拒結束、恐懼改變、停滯腐朽、無法放下"),
    card!(14, "Temperance", "節制",
        "天使在兩杯間倒水、一腳踏水一腳踏地、彩虹光環、遠方山道",
        "平衡調和、耐心等待、中庸之道、煉金轉化",
        "失去平衡、極端行為、缺乏耐心、過度放縱"),
    card!(15, "The Devil", "惡魔",
        "鎖鏈下的男女、山羊惡魔、倒五芒星、物質慾望的象徵",
        "物質束縛、慾望沉迷、陰影面對、權力遊戲",
        "掙脫枷鎖、覺察成癮、釋放恐懼、重獲自由"),
    card!(16, "The Tower", "高塔",
        "被雷擊的高塔、墜落的人影、王冠飛落、燃燒的火焰",
        "突然崩解、信念破碎、真相揭露、必要破壞",
        "災難延遲、拒絕面對、內在崩解、恐懼改變"),
    card!(17, "The Star", "星星",
        "裸身女子倒水、八顆星星、遠方的鳥、大地與水的滋養",
        "希望重生、靈性療癒、純淨連結、宇宙祝福",
        "失去信心、靈性枯竭、絕望感、無法看見光"),
    card!(18, "The Moon", "月亮",
        "月光下的道路、一對狼犬嚎叫、池中的龍蝦、遠方的雙塔",
        "潛意識浮現、直覺迷霧、恐懼幻象、夢境訊息",
        "恐懼消散、真相清晰、走出迷霧、釋放焦慮"),
    card!(19, "The Sun", "太陽",
        "燦爛的太陽、騎白馬的孩童、向日葵牆、純真的笑容",
        "喜悅成功、生命力、真實自我、純真快樂",
        "過度樂觀、虛假快樂、延遲成功、內在陰影"),
    card!(20, "Judgement", "審判",
        "天使加百列吹響號角、從墓中復活的人們、十字旗幟、靈性覺醒",
        "覺醒召喚、重生轉化、業力完成、更高使命",
        "逃避審判、自我批判、無法原諒、拒絕成長"),
    card!(21, "The World", "世界",
        "花環中的舞者、四元素生物守護、完整的循環、宇宙的擁抱",
        "圓滿完成、世界歸屬、整合成就、新旅程開啟",
        "未竟之事、缺乏閉環、完美主義、害怕結束"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_ids_match_positions() {
        for (index, card) in MAJOR_ARCANA.iter().enumerate() {
            assert_eq!(card.id as usize, index);
            assert_eq!(card_by_id(card.id), Some(card));
            assert_eq!(card_by_name(card.name), Some(card));
        }
        assert!(card_by_id(22).is_none());
        assert!(card_by_name("the fool").is_none());
    }

    #[test]
    fn test_reversed_display_names() {
        let fool = card_by_id(0).unwrap();
        let upright = DrawnCard::new(fool, Orientation::Upright);
        assert_eq!(upright.display_name, "The Fool");
        assert_eq!(upright.display_name_ch, "愚者");

        let reversed = DrawnCard::new(fool, Orientation::Reversed);
        assert_eq!(reversed.display_name, "The Fool (逆位)");
        assert_eq!(reversed.display_name_ch, "愚者 (逆位)");
        assert!(reversed.is_reversed());
    }

    #[test]
    fn test_draw_covers_both_orientations() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<DrawnCard> = (0..200).map(|_| DrawnCard::draw(&mut rng)).collect();

        assert!(draws.iter().any(|d| d.is_reversed()));
        assert!(draws.iter().any(|d| !d.is_reversed()));
        assert!(draws.iter().all(|d| (d.card.id as usize) < MAJOR_ARCANA.len()));
    }

    #[test]
    fn test_keywords_follow_orientation() {
        let sun = card_by_name("The Sun").unwrap();
        assert_eq!(sun.keywords(Orientation::Upright), sun.upright_keywords);
        assert_eq!(sun.keywords(Orientation::Reversed), sun.reversed_keywords);
        assert_eq!(sun.image_path(), "/tarot/card-19.png");
    }
}
