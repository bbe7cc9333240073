//! 道馆后端的错误类型
//!
//! 存储层、考核流程和配置加载都返回 [`DojoError`]；
//! 考核记录器再把它收窄为 `RecorderError` 交给表单。

use std::fmt;

/// 生成 [`DojoError`]：每个变体带错误代码（`E0xx`）和展示用的类型名，
/// 并生成 snake_case 构造函数，例如 `DojoError::not_found("Student 7 not found")`。
macro_rules! define_dojo_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum DojoError {
            $($variant(String),)*
        }

        impl DojoError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(DojoError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(DojoError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(DojoError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl DojoError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        DojoError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_dojo_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E006", "Validation Error"),
    NotFound("E007", "Resource Not Found"),
    Serialization("E008", "Serialization Error"),
    DateParse("E009", "Date Parse Error"),
    Grading("E010", "Grading Error"),
}

impl DojoError {
    /// 日志和响应消息中使用的 "类型: 详情" 形式
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for DojoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for DojoError {}

// 数据库、JSON 与日期解析错误可以直接用 `?` 向上传播
impl From<sea_orm::DbErr> for DojoError {
    fn from(err: sea_orm::DbErr) -> Self {
        DojoError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for DojoError {
    fn from(err: serde_json::Error) -> Self {
        DojoError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for DojoError {
    fn from(err: chrono::ParseError) -> Self {
        DojoError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DojoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DojoError::cache_connection("test").code(), "E001");
        assert_eq!(DojoError::database_config("test").code(), "E003");
        assert_eq!(DojoError::validation("test").code(), "E006");
        assert_eq!(DojoError::not_found("test").code(), "E007");
        assert_eq!(DojoError::grading("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            DojoError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            DojoError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = DojoError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_db_error_conversion() {
        let err: DojoError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }

    #[test]
    fn test_date_parse_conversion() {
        let parse_err = chrono::NaiveDate::parse_from_str("2024-13-01", "%Y-%m-%d").unwrap_err();
        let err: DojoError = parse_err.into();
        assert_eq!(err.error_type(), "Date Parse Error");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<i64>("not a number").unwrap_err();
        let err: DojoError = json_err.into();
        assert_eq!(err.code(), "E008");
    }

    #[test]
    fn test_format_simple() {
        let err = DojoError::validation("Invalid grading date");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid grading date"));
    }
}
