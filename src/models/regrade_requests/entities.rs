use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{RequestId, SubjectId, UserId};

// 复核申请状态
//
// 状态图：
//   pending --approve(auto)--> in_review
//   pending --approve(manual)--> approved --assign--> in_review
//   pending --reject--> rejected
//
// rejected 与 in_review 为终态（复核完成流程不在本系统范围内），
// 任何状态都不会回到 pending。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/regrade_request.ts")]
pub enum RequestStatus {
    Pending,  // 待审批
    Approved, // 已通过，等待手动指派复核教师
    InReview, // 复核中（已指派）
    Rejected, // 已驳回
}

impl RequestStatus {
    pub const PENDING: &'static str = "pending";
    pub const APPROVED: &'static str = "approved";
    pub const IN_REVIEW: &'static str = "in_review";
    pub const REJECTED: &'static str = "rejected";

    /// 状态机合法边集
    pub fn can_transition_to(&self, target: RequestStatus) -> bool {
        matches!(
            (self, target),
            (
                RequestStatus::Pending,
                RequestStatus::Approved | RequestStatus::InReview | RequestStatus::Rejected,
            ) | (RequestStatus::Approved, RequestStatus::InReview)
        )
    }

    /// 是否终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::InReview | RequestStatus::Rejected)
    }
}

impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的申请状态: '{s}'. 支持的状态: pending, approved, in_review, rejected"
            ))
        })
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "{}", RequestStatus::PENDING),
            RequestStatus::Approved => write!(f, "{}", RequestStatus::APPROVED),
            RequestStatus::InReview => write!(f, "{}", RequestStatus::IN_REVIEW),
            RequestStatus::Rejected => write!(f, "{}", RequestStatus::REJECTED),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "in_review" => Ok(RequestStatus::InReview),
            "rejected" => Ok(RequestStatus::Rejected),
            _ => Err(format!("Invalid request status: {s}")),
        }
    }
}

// 复核申请实体
//
// status / reviewer_id / rejection_reason / assigned_at / updated_at
// 只由生命周期引擎写入；其余字段创建后不可变。申请从不物理删除。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/regrade_request.ts")]
pub struct RegradeRequest {
    pub id: RequestId,
    pub student_id: UserId,
    pub subject_id: SubjectId,
    /// 原评分教师，永远不得复核自己的评分
    pub teacher_id: UserId,
    /// 被指派的复核教师（指派后才有值）
    pub reviewer_id: Option<UserId>,
    pub group_name: String,
    /// 争议的评分项（aporte）
    pub assessment: String,
    pub current_grade: f64,
    pub justification: String,
    pub rejection_reason: Option<String>,
    pub status: RequestStatus,
    /// 双盲展示用的稳定化名，创建时计算一次，之后不再重算
    pub student_alias: String,
    pub teacher_alias: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub assigned_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip() {
        for status in ["pending", "approved", "in_review", "rejected"] {
            let parsed: RequestStatus = status.parse().unwrap();
            assert_eq!(parsed.to_string(), status);
        }
        assert!("aprobada".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_legal_transitions() {
        use RequestStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(InReview));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(InReview));
    }

    #[test]
    fn test_no_transition_returns_to_pending() {
        use RequestStatus::*;
        for from in [Pending, Approved, InReview, Rejected] {
            assert!(!from.can_transition_to(Pending));
        }
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_edges() {
        use RequestStatus::*;
        for from in [InReview, Rejected] {
            assert!(from.is_terminal());
            for to in [Pending, Approved, InReview, Rejected] {
                assert!(!from.can_transition_to(to));
            }
        }
    }
}
