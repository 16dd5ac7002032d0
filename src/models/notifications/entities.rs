use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{NotificationId, UserId};

// 站内通知（存储转发消息）
//
// 只由通知分发器创建；接收方只能标记已读；核心从不删除。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    /// 发送方标签（系统或角色名，不是真实身份）
    pub sender: String,
    pub subject: String,
    pub content: String,
    pub category: String,
    pub is_read: bool,
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

impl Notification {
    /// 生命周期通知的固定类别
    pub const CATEGORY_NOTICE: &'static str = "notice";
}
