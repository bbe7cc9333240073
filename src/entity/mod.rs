//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod belt_gradings;
pub mod branches;
pub mod fee_configs;
pub mod fees;
pub mod notifications;
pub mod students;
pub mod users;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::grading::BeltLevel;

// 数据库中的时间统一存储为 Unix 秒
pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

// 库中的腰带名只会由已校验的写入产生；读到无法识别的值时告警并按白带返回
pub(crate) fn stored_belt(table: &str, id: i64, value: &str) -> BeltLevel {
    BeltLevel::parse(value).unwrap_or_else(|| {
        warn!("Unknown belt '{}' in {} row {}, reading it as White", value, table, id);
        BeltLevel::White
    })
}

pub(crate) fn stored_optional_belt(table: &str, id: i64, value: Option<&str>) -> Option<BeltLevel> {
    value.map(|belt| stored_belt(table, id, belt))
}
