use serde::Deserialize;
use ts_rs::TS;

use super::entities::{UserRole, UserStatus};
use crate::models::SubjectId;
use crate::models::common::pagination::PaginationQuery;

/// 创建用户请求（管理员）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub full_name: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub assigned_subjects: Vec<SubjectId>,
    #[serde(default)]
    pub assigned_groups: Vec<String>,
}

/// 更新用户请求（管理员）
///
/// 教师的科目/分组指派更新走这里（原系统只允许更新这两项）。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub status: Option<UserStatus>,
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub assigned_subjects: Option<Vec<SubjectId>>,
    pub assigned_groups: Option<Vec<String>>,
}

/// 用户列表查询参数（HTTP 层）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

/// 用户列表查询（存储层）
#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

impl From<UserListParams> for UserListQuery {
    fn from(params: UserListParams) -> Self {
        Self {
            pagination: PaginationQuery {
                page: params.page.unwrap_or(1),
                size: params.size.unwrap_or(10),
            },
            role: params.role,
            search: params.search,
        }
    }
}
