//! 双盲展示用的匿名化名生成
//!
//! 化名在申请创建时计算一次并持久化，整个生命周期内保持稳定，
//! 任何读取路径都不会重算。算法：对角色前缀 + 用户ID + 创建时间戳
//! 做 FNV-1a 64 位散列，取低 16 位渲染为 4 位十六进制后缀。
//! 同一用户在不同申请中会得到不同化名，避免跨申请关联身份。

use crate::models::UserId;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// 生成形如 `学生-7F3A` 的稳定化名
pub fn anonymous_label(prefix: &str, user_id: UserId, created_at_ts: i64) -> String {
    let mut input = Vec::with_capacity(prefix.len() + 16);
    input.extend_from_slice(prefix.as_bytes());
    input.extend_from_slice(&user_id.as_i64().to_le_bytes());
    input.extend_from_slice(&created_at_ts.to_le_bytes());

    let hash = fnv1a64(&input);
    format!("{}-{:04X}", prefix, (hash & 0xFFFF) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_deterministic() {
        let a = anonymous_label("学生", UserId::new(42), 1700000000);
        let b = anonymous_label("学生", UserId::new(42), 1700000000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_label_format() {
        let label = anonymous_label("教师", UserId::new(7), 1700000000);
        assert!(label.starts_with("教师-"));
        let suffix = label.strip_prefix("教师-").unwrap();
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_inputs_usually_differ() {
        // 16 位空间有碰撞可能，但固定样例应当可区分
        let a = anonymous_label("学生", UserId::new(1), 1700000000);
        let b = anonymous_label("学生", UserId::new(2), 1700000000);
        let c = anonymous_label("学生", UserId::new(1), 1700000001);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
