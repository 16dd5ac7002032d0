//! 通知分发器
//!
//! 生命周期状态变更的副作用：向相关方的收件箱追加存储转发消息。
//! 至少一次语义：重复通知可以容忍，丢失不行。通知持久化失败
//! 永远不回滚已提交的状态变更，只记录日志（调用必须发生在状态
//! 变更提交之后）。

use std::sync::Arc;

use tracing::error;

use crate::models::UserId;
use crate::models::notifications::entities::Notification;
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::storage::Storage;

/// 系统自动动作的发送方标签
pub const SENDER_SYSTEM: &str = "系统";
/// 管理员动作的发送方标签（角色名，不是真实身份）
pub const SENDER_ADMIN: &str = "教务管理员";

/// 追加一条未读通知，失败只记录日志，不向上传播
pub async fn dispatch(
    storage: &Arc<dyn Storage>,
    recipient_id: UserId,
    sender: &str,
    subject: &str,
    content: String,
) {
    let request = CreateNotificationRequest {
        recipient_id,
        sender: sender.to_string(),
        subject: subject.to_string(),
        content,
        category: Notification::CATEGORY_NOTICE.to_string(),
    };

    if let Err(e) = storage.create_notification(request).await {
        error!("通知发送失败 (recipient={}): {}", recipient_id, e);
    }
}
