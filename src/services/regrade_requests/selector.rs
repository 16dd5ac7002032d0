//! 复核教师选择器
//!
//! 把随机选择隔离在 trait 之后，生命周期引擎不直接依赖随机源，
//! 测试可以换成确定性实现。

use crate::models::users::entities::User;

/// 从合格教师集合中选出一名复核教师
pub trait ReviewerSelector: Send + Sync {
    /// 空集合返回 None，由调用方映射为"无可用复核教师"错误
    fn select<'a>(&self, eligible: &'a [User]) -> Option<&'a User>;
}

/// 均匀随机选择器（生产实现）：每位合格教师被选中的概率相同
pub struct RandomSelector;

impl ReviewerSelector for RandomSelector {
    fn select<'a>(&self, eligible: &'a [User]) -> Option<&'a User> {
        use rand::seq::IndexedRandom;
        eligible.choose(&mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};
    use crate::models::{SubjectId, UserId};
    use std::collections::HashMap;

    fn teacher(id: i64) -> User {
        User {
            id: UserId::new(id),
            username: format!("teacher{id}"),
            email: format!("teacher{id}@uni.edu"),
            password_hash: String::new(),
            role: UserRole::Teacher,
            status: UserStatus::Active,
            full_name: None,
            department: None,
            assigned_subjects: vec![SubjectId::new(1)],
            assigned_groups: vec![],
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_empty_set_yields_none() {
        assert!(RandomSelector.select(&[]).is_none());
    }

    #[test]
    fn test_single_candidate_always_selected() {
        let eligible = vec![teacher(1)];
        for _ in 0..10 {
            assert_eq!(
                RandomSelector.select(&eligible).unwrap().id,
                UserId::new(1)
            );
        }
    }

    #[test]
    fn test_selection_is_uniform() {
        // N=3、3000 次采样的卡方检验：自由度 2，阈值取 20（p < 1e-4），
        // 偏差到这个程度基本只能是实现错了
        let eligible = vec![teacher(1), teacher(2), teacher(3)];
        let trials = 3000usize;
        let mut counts: HashMap<i64, usize> = HashMap::new();

        for _ in 0..trials {
            let picked = RandomSelector.select(&eligible).unwrap();
            *counts.entry(picked.id.as_i64()).or_default() += 1;
        }

        assert_eq!(counts.len(), 3, "每位教师都应被选中过: {counts:?}");

        let expected = trials as f64 / 3.0;
        let chi_square: f64 = counts
            .values()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        assert!(
            chi_square < 20.0,
            "选择分布偏离均匀分布: chi_square = {chi_square}, counts = {counts:?}"
        );
    }
}
