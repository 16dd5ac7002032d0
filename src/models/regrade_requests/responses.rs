use serde::Serialize;
use ts_rs::TS;

use super::entities::{RegradeRequest, RequestStatus};
use crate::models::users::responses::TeacherSummary;
use crate::models::{RequestId, SubjectId, UserId};

/// 复核申请的匿名化视图
///
/// 管理员列表与复核教师队列都使用该视图：真实身份以创建时固化的
/// 化名展示（双盲），科目名称已联表填充。
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/regrade_request.ts")]
pub struct RegradeRequestView {
    pub id: RequestId,
    pub student_id: UserId,
    pub student_alias: String,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub teacher_id: UserId,
    pub teacher_alias: String,
    pub reviewer_id: Option<UserId>,
    pub group_name: String,
    pub assessment: String,
    pub current_grade: f64,
    pub justification: String,
    pub rejection_reason: Option<String>,
    pub status: RequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub assigned_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl RegradeRequestView {
    pub fn from_request(request: RegradeRequest, subject_name: String) -> Self {
        Self {
            id: request.id,
            student_id: request.student_id,
            student_alias: request.student_alias,
            subject_id: request.subject_id,
            subject_name,
            teacher_id: request.teacher_id,
            teacher_alias: request.teacher_alias,
            reviewer_id: request.reviewer_id,
            group_name: request.group_name,
            assessment: request.assessment,
            current_grade: request.current_grade,
            justification: request.justification,
            rejection_reason: request.rejection_reason,
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
            assigned_at: request.assigned_at,
        }
    }
}

/// 单个申请响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/regrade_request.ts")]
pub struct RegradeRequestResponse {
    pub request: RegradeRequestView,
}

/// 申请列表响应（按创建时间倒序）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/regrade_request.ts")]
pub struct RegradeRequestListResponse {
    pub items: Vec<RegradeRequestView>,
}

/// 合格复核教师列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/regrade_request.ts")]
pub struct EligibleReviewersResponse {
    pub items: Vec<TeacherSummary>,
}
