//! 复核申请存储操作

use super::SeaOrmStorage;
use crate::entity::regrade_requests::{ActiveModel, Column, Entity as RegradeRequests};
use crate::errors::{RegradeSystemError, Result};
use crate::models::{
    RequestId, UserId,
    regrade_requests::{
        entities::{RegradeRequest, RequestStatus},
        requests::{NewRegradeRequest, RequestTransition},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建申请，初始状态 pending
    pub async fn create_regrade_request_impl(
        &self,
        req: NewRegradeRequest,
    ) -> Result<RegradeRequest> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id.as_i64()),
            subject_id: Set(req.subject_id.as_i64()),
            teacher_id: Set(req.teacher_id.as_i64()),
            reviewer_id: Set(None),
            group_name: Set(req.group_name),
            assessment: Set(req.assessment),
            current_grade: Set(req.current_grade),
            justification: Set(req.justification),
            rejection_reason: Set(None),
            status: Set(RequestStatus::Pending.to_string()),
            student_alias: Set(req.student_alias),
            teacher_alias: Set(req.teacher_alias),
            created_at: Set(now),
            updated_at: Set(now),
            assigned_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("创建申请失败: {e}")))?;

        Ok(result.into_regrade_request())
    }

    pub async fn get_regrade_request_by_id_impl(
        &self,
        id: RequestId,
    ) -> Result<Option<RegradeRequest>> {
        let result = RegradeRequests::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("查询申请失败: {e}")))?;

        Ok(result.map(|m| m.into_regrade_request()))
    }

    pub async fn list_regrade_requests_impl(&self) -> Result<Vec<RegradeRequest>> {
        let models = RegradeRequests::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                RegradeSystemError::database_operation(format!("查询申请列表失败: {e}"))
            })?;

        Ok(models.into_iter().map(|m| m.into_regrade_request()).collect())
    }

    pub async fn list_regrade_requests_by_student_impl(
        &self,
        student_id: UserId,
    ) -> Result<Vec<RegradeRequest>> {
        let models = RegradeRequests::find()
            .filter(Column::StudentId.eq(student_id.as_i64()))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                RegradeSystemError::database_operation(format!("查询学生申请失败: {e}"))
            })?;

        Ok(models.into_iter().map(|m| m.into_regrade_request()).collect())
    }

    pub async fn list_regrade_requests_by_reviewer_impl(
        &self,
        reviewer_id: UserId,
    ) -> Result<Vec<RegradeRequest>> {
        let models = RegradeRequests::find()
            .filter(Column::ReviewerId.eq(reviewer_id.as_i64()))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                RegradeSystemError::database_operation(format!("查询复核任务失败: {e}"))
            })?;

        Ok(models.into_iter().map(|m| m.into_regrade_request()).collect())
    }

    /// 条件状态变更
    ///
    /// UPDATE ... WHERE id = ? AND status = ?，影响行数为 0 说明申请不存在
    /// 或状态已被并发修改，返回 None，由调用方映射为 InvalidState。
    /// 同一申请的并发变更因此天然串行化：最多一个赢家。
    pub async fn transition_regrade_request_impl(
        &self,
        id: RequestId,
        expected: RequestStatus,
        transition: RequestTransition,
    ) -> Result<Option<RegradeRequest>> {
        let now = chrono::Utc::now().timestamp();

        let mut update = RegradeRequests::update_many()
            .col_expr(Column::Status, Expr::value(transition.status.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now));

        if let Some(reviewer_id) = transition.reviewer_id {
            update = update.col_expr(Column::ReviewerId, Expr::value(reviewer_id.as_i64()));
        }
        if let Some(reason) = &transition.rejection_reason {
            update = update.col_expr(Column::RejectionReason, Expr::value(reason.clone()));
        }
        if transition.set_assigned_at {
            update = update.col_expr(Column::AssignedAt, Expr::value(now));
        }

        let result = update
            .filter(Column::Id.eq(id.as_i64()))
            .filter(Column::Status.eq(expected.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                RegradeSystemError::database_operation(format!("申请状态变更失败: {e}"))
            })?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_regrade_request_by_id_impl(id).await
    }
}
