use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::grading::BeltLevel;

// 费用类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../app/src/types/generated/fee.ts")]
pub enum FeeType {
    Monthly, // 月费
    Grading, // 考核费
}

impl FeeType {
    pub const MONTHLY: &'static str = "monthly";
    pub const GRADING: &'static str = "grading";
}

impl<'de> Deserialize<'de> for FeeType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<FeeType>().map_err(|_| {
            serde::de::Error::custom(format!("无效的费用类型: '{s}'. 支持: monthly, grading"))
        })
    }
}

impl std::fmt::Display for FeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeType::Monthly => write!(f, "{}", FeeType::MONTHLY),
            FeeType::Grading => write!(f, "{}", FeeType::GRADING),
        }
    }
}

impl std::str::FromStr for FeeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            FeeType::MONTHLY => Ok(FeeType::Monthly),
            FeeType::GRADING => Ok(FeeType::Grading),
            _ => Err(format!("Invalid fee type: {s}")),
        }
    }
}

// 费用状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../app/src/types/generated/fee.ts")]
pub enum FeeStatus {
    Pending, // 待缴
    Paid,    // 已缴
    Waived,  // 已减免
}

impl<'de> Deserialize<'de> for FeeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<FeeStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的费用状态: '{s}'. 支持: pending, paid, waived"
            ))
        })
    }
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeStatus::Pending => write!(f, "pending"),
            FeeStatus::Paid => write!(f, "paid"),
            FeeStatus::Waived => write!(f, "waived"),
        }
    }
}

impl std::str::FromStr for FeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FeeStatus::Pending),
            "paid" => Ok(FeeStatus::Paid),
            "waived" => Ok(FeeStatus::Waived),
            _ => Err(format!("Invalid fee status: {s}")),
        }
    }
}

// 学员费用
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/fee.ts")]
pub struct Fee {
    pub id: i64,
    pub student_id: i64,
    pub fee_type: FeeType,
    // 金额，单位为分
    pub amount: i64,
    pub belt_level: Option<BeltLevel>,
    pub grading_id: Option<i64>,
    // 截止日期 YYYY-MM-DD
    pub due_date: String,
    pub status: FeeStatus,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Fee {
    /// 金额的展示形式，如 `30.00`
    pub fn display_amount(&self) -> String {
        format_amount(self.amount)
    }
}

// 费用配置：月费一条，考核费每个目标腰带一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/fee.ts")]
pub struct FeeConfig {
    pub id: i64,
    pub fee_type: FeeType,
    pub belt_level: Option<BeltLevel>,
    pub amount: i64,
    pub due_days: i32,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub fn format_amount(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3000), "30.00");
        assert_eq!(format_amount(12005), "120.05");
        assert_eq!(format_amount(7), "0.07");
        assert_eq!(format_amount(-150), "-1.50");
    }

    #[test]
    fn test_fee_type_and_status_parse() {
        assert_eq!("grading".parse::<FeeType>(), Ok(FeeType::Grading));
        assert!("annual".parse::<FeeType>().is_err());
        assert_eq!("waived".parse::<FeeStatus>(), Ok(FeeStatus::Waived));
        assert_eq!(FeeStatus::Pending.to_string(), "pending");
    }
}
