use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学员、费用、考核记录等列表接口共用的翻页参数
///
/// 查询串里的值都是字符串，`page` 从 1 开始，缺省每页 10 条。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

/// 列表响应中的翻页信息，`total_pages` 由存储层按总条数算出
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 查询串中的 "2" 和 JSON 中的 2 都接受
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

/// 列表筛选条件里的可选 id（如 `branch_id`、`student_id`），与翻页参数一起 flatten 时使用
pub fn deserialize_optional_string_to_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_string_to_i64")] i64);

    Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(v)| v))
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl PaginationInfo {
    pub fn from_counts(page: i64, page_size: i64, total: i64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: if page_size > 0 {
                (total + page_size - 1) / page_size
            } else {
                0
            },
        }
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Params {
        #[serde(flatten)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
        branch_id: Option<i64>,
    }

    #[test]
    fn test_flattened_query_accepts_strings() {
        let params: Params = serde_json::from_str(r#"{"page":"2","branch_id":"5"}"#).unwrap();
        assert_eq!(params.pagination.page, 2);
        assert_eq!(params.pagination.size, 10);
        assert_eq!(params.branch_id, Some(5));

        let params: Params = serde_json::from_str("{}").unwrap();
        assert_eq!(params.branch_id, None);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let info = PaginationInfo::from_counts(1, 10, 21);
        assert_eq!(info.total_pages, 3);
        assert_eq!(PaginationInfo::from_counts(1, 10, 0).total_pages, 0);
        assert_eq!(PaginationInfo::from_counts(2, 10, 20).total_pages, 2);
    }
}
