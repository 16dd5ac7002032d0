//! 通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub recipient_id: i64,
    pub sender: String,
    pub subject: String,
    pub content: String,
    pub category: String,
    pub is_read: bool,
    pub sent_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RecipientId",
        to = "super::users::Column::Id"
    )]
    Recipient,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_notification(self) -> crate::models::notifications::entities::Notification {
        use chrono::{DateTime, Utc};

        crate::models::notifications::entities::Notification {
            id: crate::models::NotificationId::from(self.id),
            recipient_id: crate::models::UserId::from(self.recipient_id),
            sender: self.sender,
            subject: self.subject,
            content: self.content,
            category: self.category,
            is_read: self.is_read,
            sent_at: DateTime::<Utc>::from_timestamp(self.sent_at, 0).unwrap_or_default(),
        }
    }
}
