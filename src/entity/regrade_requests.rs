//! 复核申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "regrade_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub reviewer_id: Option<i64>,
    pub group_name: String,
    pub assessment: String,
    pub current_grade: f64,
    pub justification: String,
    pub rejection_reason: Option<String>,
    pub status: String,
    pub student_alias: String,
    pub teacher_alias: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub assigned_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_regrade_request(
        self,
    ) -> crate::models::regrade_requests::entities::RegradeRequest {
        use crate::models::regrade_requests::entities::{RegradeRequest, RequestStatus};
        use chrono::{DateTime, Utc};

        RegradeRequest {
            id: crate::models::RequestId::from(self.id),
            student_id: crate::models::UserId::from(self.student_id),
            subject_id: crate::models::SubjectId::from(self.subject_id),
            teacher_id: crate::models::UserId::from(self.teacher_id),
            reviewer_id: self.reviewer_id.map(crate::models::UserId::from),
            group_name: self.group_name,
            assessment: self.assessment,
            current_grade: self.current_grade,
            justification: self.justification,
            rejection_reason: self.rejection_reason,
            status: self
                .status
                .parse::<RequestStatus>()
                .unwrap_or(RequestStatus::Pending),
            student_alias: self.student_alias,
            teacher_alias: self.teacher_alias,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            assigned_at: self
                .assigned_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
        }
    }
}
