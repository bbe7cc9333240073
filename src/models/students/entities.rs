use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::grading::{BeltLevel, GradingStudent};

// 学员状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../app/src/types/generated/student.ts")]
pub enum StudentStatus {
    Active,   // 在训
    Inactive, // 停训
}

impl<'de> Deserialize<'de> for StudentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<StudentStatus>().map_err(|_| {
            serde::de::Error::custom(format!("无效的学员状态: '{s}'. 支持: active, inactive"))
        })
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentStatus::Active => write!(f, "active"),
            StudentStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(StudentStatus::Active),
            "inactive" => Ok(StudentStatus::Inactive),
            _ => Err(format!("Invalid student status: {s}")),
        }
    }
}

// 学员实体
//
// current_belt 保留数据库中的原始字符串，历史数据可能不在标准腰带序列中
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub branch_id: i64,
    pub user_id: Option<i64>,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub current_belt: String,
    pub status: StudentStatus,
    // 入馆日期 YYYY-MM-DD
    pub joined_at: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn belt_level(&self) -> Option<BeltLevel> {
        BeltLevel::parse(&self.current_belt)
    }

    /// 考核表单需要的学员信息
    pub fn grading_target(&self) -> GradingStudent {
        GradingStudent {
            id: self.id,
            current_belt: self.current_belt.clone(),
        }
    }
}
