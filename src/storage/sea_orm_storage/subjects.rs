//! 科目存储操作

use super::SeaOrmStorage;
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{RegradeSystemError, Result};
use crate::models::{
    SubjectId,
    subjects::{entities::Subject, requests::CreateSubjectRequest},
};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let model = ActiveModel {
            name: Set(req.name),
            code: Set(req.code),
            description: Set(req.description),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("创建科目失败: {e}")))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: SubjectId) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        let models = Subjects::find()
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| {
                RegradeSystemError::database_operation(format!("查询科目列表失败: {e}"))
            })?;

        Ok(models.into_iter().map(|m| m.into_subject()).collect())
    }
}
