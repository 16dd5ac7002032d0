use serde::Deserialize;
use ts_rs::TS;

use super::entities::RequestStatus;
use crate::models::{SubjectId, UserId};

/// 审批结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/regrade_request.ts")]
pub enum DecisionOutcome {
    Approve,
    Reject,
}

/// 学生提交复核申请
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/regrade_request.ts")]
pub struct CreateRegradeRequestRequest {
    pub subject_id: SubjectId,
    /// 原评分教师
    pub teacher_id: UserId,
    pub group_name: String,
    /// 争议的评分项（aporte）
    pub assessment: String,
    pub current_grade: f64,
    pub justification: String,
}

/// 管理员审批申请
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/regrade_request.ts")]
pub struct DecideRequest {
    pub outcome: DecisionOutcome,
    pub rejection_reason: Option<String>,
}

/// 管理员手动指派复核教师
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/regrade_request.ts")]
pub struct AssignReviewerRequest {
    pub reviewer_id: UserId,
}

/// 存储层创建申请的数据（别名已由服务层计算好）
#[derive(Debug, Clone)]
pub struct NewRegradeRequest {
    pub student_id: UserId,
    pub subject_id: SubjectId,
    pub teacher_id: UserId,
    pub group_name: String,
    pub assessment: String,
    pub current_grade: f64,
    pub justification: String,
    pub student_alias: String,
    pub teacher_alias: String,
}

/// 生命周期状态变更的写入内容
///
/// 与期望的当前状态一起交给存储层做条件更新，保证并发下同一申请
/// 只有一个变更者成功。
#[derive(Debug, Clone)]
pub struct RequestTransition {
    pub status: RequestStatus,
    pub reviewer_id: Option<UserId>,
    pub rejection_reason: Option<String>,
    /// 是否同时记录指派时间（只在指派复核教师时为 true）
    pub set_assigned_at: bool,
}

impl RequestTransition {
    /// pending -> approved（手动指派部署模式下的审批通过）
    pub fn approve() -> Self {
        Self {
            status: RequestStatus::Approved,
            reviewer_id: None,
            rejection_reason: None,
            set_assigned_at: false,
        }
    }

    /// -> in_review，同时记录复核教师与指派时间
    pub fn assign(reviewer_id: UserId) -> Self {
        Self {
            status: RequestStatus::InReview,
            reviewer_id: Some(reviewer_id),
            rejection_reason: None,
            set_assigned_at: true,
        }
    }

    /// pending -> rejected，保存驳回原因
    pub fn reject(reason: String) -> Self {
        Self {
            status: RequestStatus::Rejected,
            reviewer_id: None,
            rejection_reason: Some(reason),
            set_assigned_at: false,
        }
    }
}
