//! 强类型标识符
//!
//! 业务逻辑中所有实体引用都使用这些 newtype，避免裸 i64/字符串比较；
//! 与原始类型的转换只发生在存储层和 JWT 边界。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 定义 i64 newtype 标识符的宏
macro_rules! define_id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
        )]
        #[ts(export, export_to = "../frontend/src/types/generated/id.ts")]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }
    };
}

define_id_type! {
    /// 用户标识（学生、教师、管理员）
    UserId
}

define_id_type! {
    /// 科目标识
    SubjectId
}

define_id_type! {
    /// 复核申请标识
    RequestId
}

define_id_type! {
    /// 通知标识
    NotificationId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = UserId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(UserId::from(42), id);
    }

    #[test]
    fn test_id_display_and_parse() {
        let id = RequestId::new(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!("7".parse::<RequestId>().unwrap(), id);
        assert!("abc".parse::<RequestId>().is_err());
    }

    #[test]
    fn test_distinct_id_types_do_not_mix() {
        // UserId 与 SubjectId 是不同类型，相同数值也不可互换；
        // 这里只验证数值语义，类型混用由编译器拒绝。
        assert_eq!(UserId::new(1).as_i64(), SubjectId::new(1).as_i64());
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = SubjectId::new(5);
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
        let back: SubjectId = serde_json::from_str("5").unwrap();
        assert_eq!(back, id);
    }
}
