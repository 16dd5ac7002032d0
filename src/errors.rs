//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_regrade_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum RegradeSystemError {
            $($variant(String),)*
        }

        impl RegradeSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(RegradeSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(RegradeSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(RegradeSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl RegradeSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        RegradeSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_regrade_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E002", "Database Configuration Error"),
    DatabaseConnection("E003", "Database Connection Error"),
    DatabaseOperation("E004", "Database Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Serialization("E007", "Serialization Error"),
    DateParse("E008", "Date Parse Error"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
    NotificationPersist("E011", "Notification Persist Error"),
}

impl RegradeSystemError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RegradeSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RegradeSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for RegradeSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        RegradeSystemError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for RegradeSystemError {
    fn from(err: std::io::Error) -> Self {
        RegradeSystemError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for RegradeSystemError {
    fn from(err: serde_json::Error) -> Self {
        RegradeSystemError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for RegradeSystemError {
    fn from(err: chrono::ParseError) -> Self {
        RegradeSystemError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RegradeSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RegradeSystemError::cache_connection("test").code(), "E001");
        assert_eq!(RegradeSystemError::database_config("test").code(), "E002");
        assert_eq!(RegradeSystemError::validation("test").code(), "E005");
        assert_eq!(
            RegradeSystemError::notification_persist("test").code(),
            "E011"
        );
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            RegradeSystemError::database_operation("test").error_type(),
            "Database Operation Error"
        );
        assert_eq!(
            RegradeSystemError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = RegradeSystemError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = RegradeSystemError::authorization("Access denied");
        let formatted = err.format_simple();
        assert!(formatted.contains("Authorization Error"));
        assert!(formatted.contains("Access denied"));
    }
}
