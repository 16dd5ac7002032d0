use serde::Serialize;
use ts_rs::TS;

use super::entities::User;
use crate::models::UserId;
use crate::models::common::pagination::PaginationInfo;

/// 单个用户响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserResponse {
    pub user: User,
}

/// 用户列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}

/// 合格复核教师摘要
///
/// 管理员查看可指派教师列表时返回；只暴露指派决策需要的字段。
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct TeacherSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub groups: Vec<String>,
}

impl From<&User> for TeacherSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.display_name().to_string(),
            email: user.email.clone(),
            department: user.department.clone(),
            groups: user.assigned_groups.clone(),
        }
    }
}
