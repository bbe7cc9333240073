//! 腰带等级目录与比较器
//!
//! 腰带等级构成一个严格全序：White → … → Black。
//! 所有比较都基于等级在目录中的序号，未知名称一律视为"未定级"。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 未定级腰带的哨兵序号
pub const UNRANKED: i32 = -1;

// 腰带等级（声明顺序即晋级顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/belt.ts")]
pub enum BeltLevel {
    White,
    Yellow,
    Orange,
    Green,
    Blue,
    Purple,
    #[serde(rename = "Brown 3")]
    Brown3,
    #[serde(rename = "Brown 2")]
    Brown2,
    #[serde(rename = "Brown 1")]
    Brown1,
    Black,
}

// 腰带目录条目（仅用于展示）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/belt.ts")]
pub struct BeltInfo {
    pub belt: BeltLevel,
    pub rank: i32,
    pub display_name: String,
    pub color: String,
    pub kyu: String,
}

const BELT_SEQUENCE: [BeltLevel; 10] = [
    BeltLevel::White,
    BeltLevel::Yellow,
    BeltLevel::Orange,
    BeltLevel::Green,
    BeltLevel::Blue,
    BeltLevel::Purple,
    BeltLevel::Brown3,
    BeltLevel::Brown2,
    BeltLevel::Brown1,
    BeltLevel::Black,
];

impl BeltLevel {
    /// 按晋级顺序返回全部腰带
    pub fn all() -> &'static [BeltLevel] {
        &BELT_SEQUENCE
    }

    /// 在标准序列中的位置（从 0 开始）
    pub fn index(self) -> usize {
        self as usize
    }

    /// 标准名称，也是存储和接口中使用的形式
    pub fn name(self) -> &'static str {
        match self {
            BeltLevel::White => "White",
            BeltLevel::Yellow => "Yellow",
            BeltLevel::Orange => "Orange",
            BeltLevel::Green => "Green",
            BeltLevel::Blue => "Blue",
            BeltLevel::Purple => "Purple",
            BeltLevel::Brown3 => "Brown 3",
            BeltLevel::Brown2 => "Brown 2",
            BeltLevel::Brown1 => "Brown 1",
            BeltLevel::Black => "Black",
        }
    }

    fn wire_name(self) -> &'static str {
        match self {
            BeltLevel::White => "white",
            BeltLevel::Yellow => "yellow",
            BeltLevel::Orange => "orange",
            BeltLevel::Green => "green",
            BeltLevel::Blue => "blue",
            BeltLevel::Purple => "purple",
            BeltLevel::Brown3 => "brown_3",
            BeltLevel::Brown2 => "brown_2",
            BeltLevel::Brown1 => "brown_1",
            BeltLevel::Black => "black",
        }
    }

    /// 解析腰带名称，接受标准名称（"Brown 3"）或下划线形式（"brown_3"）
    pub fn parse(name: &str) -> Option<BeltLevel> {
        BELT_SEQUENCE
            .iter()
            .copied()
            .find(|belt| belt.name() == name || belt.wire_name() == name)
    }

    pub fn info(self) -> BeltInfo {
        let (display_name, color, kyu) = match self {
            BeltLevel::White => ("White Belt", "#FFFFFF", "9th Kyu"),
            BeltLevel::Yellow => ("Yellow Belt", "#FFD700", "8th Kyu"),
            BeltLevel::Orange => ("Orange Belt", "#FF8C00", "7th Kyu"),
            BeltLevel::Green => ("Green Belt", "#228B22", "6th Kyu"),
            BeltLevel::Blue => ("Blue Belt", "#1E90FF", "5th Kyu"),
            BeltLevel::Purple => ("Purple Belt", "#800080", "4th Kyu"),
            BeltLevel::Brown3 => ("Brown Belt (3rd)", "#8B4513", "3rd Kyu"),
            BeltLevel::Brown2 => ("Brown Belt (2nd)", "#8B4513", "2nd Kyu"),
            BeltLevel::Brown1 => ("Brown Belt (1st)", "#8B4513", "1st Kyu"),
            BeltLevel::Black => ("Black Belt", "#000000", "1st Dan"),
        };
        BeltInfo {
            belt: self,
            rank: self.index() as i32,
            display_name: display_name.to_string(),
            color: color.to_string(),
            kyu: kyu.to_string(),
        }
    }

    /// 完整的腰带目录
    pub fn catalog() -> Vec<BeltInfo> {
        BELT_SEQUENCE.iter().map(|belt| belt.info()).collect()
    }
}

impl std::fmt::Display for BeltLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for BeltLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BeltLevel::parse(s).ok_or_else(|| format!("Invalid belt level: {s}"))
    }
}

impl<'de> Deserialize<'de> for BeltLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BeltLevel::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "无效的腰带等级: '{s}'. 支持: White, Yellow, Orange, Green, Blue, Purple, Brown 3, Brown 2, Brown 1, Black"
            ))
        })
    }
}

/// 腰带在标准序列中的序号；未知名称返回 [`UNRANKED`]
pub fn index_of(belt: &str) -> i32 {
    BeltLevel::parse(belt)
        .map(|b| b.index() as i32)
        .unwrap_or(UNRANKED)
}

/// `candidate` 是否严格高于 `reference`
///
/// 任一方未定级时返回 false，不允许对未知等级做晋级。
pub fn is_higher(candidate: &str, reference: &str) -> bool {
    let candidate = index_of(candidate);
    let reference = index_of(reference);
    if candidate == UNRANKED || reference == UNRANKED {
        return false;
    }
    candidate > reference
}

/// 从 `from` 出发可以晋升到的全部腰带（严格更高者，按顺序）
pub fn promotion_options(from: &str) -> Vec<BeltLevel> {
    BELT_SEQUENCE
        .iter()
        .copied()
        .filter(|belt| is_higher(belt.name(), from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_strictly_ordered() {
        for (i, belt) in BeltLevel::all().iter().enumerate() {
            assert_eq!(belt.index(), i);
            assert_eq!(index_of(belt.name()), i as i32);
        }
        assert!(BeltLevel::White < BeltLevel::Brown3);
        assert!(BeltLevel::Brown3 < BeltLevel::Brown1);
    }

    #[test]
    fn test_is_higher_matches_index_order() {
        for a in BeltLevel::all() {
            for b in BeltLevel::all() {
                assert_eq!(
                    is_higher(b.name(), a.name()),
                    index_of(b.name()) > index_of(a.name()),
                    "is_higher({b}, {a})"
                );
            }
        }
    }

    #[test]
    fn test_no_self_promotion() {
        for belt in BeltLevel::all() {
            assert!(!is_higher(belt.name(), belt.name()));
        }
    }

    #[test]
    fn test_unranked_fails_closed() {
        assert_eq!(index_of("Rainbow"), UNRANKED);
        assert_eq!(index_of(""), UNRANKED);
        for belt in BeltLevel::all() {
            assert!(!is_higher("Rainbow", belt.name()));
            assert!(!is_higher(belt.name(), "Rainbow"));
        }
        assert!(promotion_options("Rainbow").is_empty());
    }

    #[test]
    fn test_promotion_options_from_green() {
        let options = promotion_options("Green");
        assert_eq!(
            options,
            vec![
                BeltLevel::Blue,
                BeltLevel::Purple,
                BeltLevel::Brown3,
                BeltLevel::Brown2,
                BeltLevel::Brown1,
                BeltLevel::Black,
            ]
        );
        assert!(promotion_options("Black").is_empty());
    }

    #[test]
    fn test_parse_accepts_both_forms() {
        assert_eq!(BeltLevel::parse("Brown 3"), Some(BeltLevel::Brown3));
        assert_eq!(BeltLevel::parse("brown_3"), Some(BeltLevel::Brown3));
        assert_eq!(BeltLevel::parse("Black"), Some(BeltLevel::Black));
        assert_eq!(BeltLevel::parse("black belt"), None);
        assert_eq!(index_of("brown_1"), index_of("Brown 1"));
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&BeltLevel::Brown2).unwrap();
        assert_eq!(json, "\"Brown 2\"");
        let belt: BeltLevel = serde_json::from_str("\"brown_2\"").unwrap();
        assert_eq!(belt, BeltLevel::Brown2);
        assert!(serde_json::from_str::<BeltLevel>("\"Grey\"").is_err());
    }

    #[test]
    fn test_catalog_labels() {
        let catalog = BeltLevel::catalog();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog[0].kyu, "9th Kyu");
        assert_eq!(catalog[9].kyu, "1st Dan");
        assert_eq!(catalog[6].belt, BeltLevel::Brown3);

        // 有色腰带的级位连续，从 9 级到 1 级
        let kyu: Vec<&str> = catalog[..9].iter().map(|info| info.kyu.as_str()).collect();
        assert_eq!(
            kyu,
            [
                "9th Kyu", "8th Kyu", "7th Kyu", "6th Kyu", "5th Kyu", "4th Kyu", "3rd Kyu",
                "2nd Kyu", "1st Kyu"
            ]
        );
    }
}
