use serde::Deserialize;
use ts_rs::TS;

use crate::models::UserId;
use crate::models::common::pagination::PaginationQuery;

/// 创建通知（仅存储层使用，由通知分发器构造）
#[derive(Debug, Clone)]
pub struct CreateNotificationRequest {
    pub recipient_id: UserId,
    pub sender: String,
    pub subject: String,
    pub content: String,
    pub category: String,
}

/// 通知列表查询参数（HTTP 层）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub unread_only: Option<bool>,
}

/// 通知列表查询（存储层）
#[derive(Debug, Clone)]
pub struct NotificationListQuery {
    pub pagination: PaginationQuery,
    pub unread_only: Option<bool>,
}

impl From<NotificationListParams> for NotificationListQuery {
    fn from(params: NotificationListParams) -> Self {
        Self {
            pagination: PaginationQuery {
                page: params.page.unwrap_or(1),
                size: params.size.unwrap_or(10),
            },
            unread_only: params.unread_only,
        }
    }
}
