//! 用户存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::teacher_subjects;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{RegradeSystemError, Result};
use crate::models::{
    PaginationInfo, SubjectId, UserId,
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 查出一批用户的科目指派，按用户分组
    async fn load_subjects_map(&self, user_ids: &[i64]) -> Result<HashMap<i64, Vec<SubjectId>>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = teacher_subjects::Entity::find()
            .filter(teacher_subjects::Column::TeacherId.is_in(user_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| {
                RegradeSystemError::database_operation(format!("查询科目指派失败: {e}"))
            })?;

        let mut map: HashMap<i64, Vec<SubjectId>> = HashMap::new();
        for row in rows {
            map.entry(row.teacher_id)
                .or_default()
                .push(SubjectId::from(row.subject_id));
        }
        Ok(map)
    }

    async fn load_assigned_subjects(&self, user_id: i64) -> Result<Vec<SubjectId>> {
        Ok(self
            .load_subjects_map(&[user_id])
            .await?
            .remove(&user_id)
            .unwrap_or_default())
    }

    /// 创建用户；教师的科目指派一并写入关联表
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let assigned_groups = if req.assigned_groups.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&req.assigned_groups)?)
        };

        let txn = self.db.begin().await.map_err(|e| {
            RegradeSystemError::database_operation(format!("开启事务失败: {e}"))
        })?;

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set("active".to_string()),
            full_name: Set(req.full_name),
            department: Set(req.department),
            assigned_groups: Set(assigned_groups),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("创建用户失败: {e}")))?;

        for subject_id in &req.assigned_subjects {
            let link = teacher_subjects::ActiveModel {
                teacher_id: Set(inserted.id),
                subject_id: Set(subject_id.as_i64()),
                assigned_at: Set(now),
                ..Default::default()
            };
            link.insert(&txn).await.map_err(|e| {
                RegradeSystemError::database_operation(format!("写入科目指派失败: {e}"))
            })?;
        }

        txn.commit().await.map_err(|e| {
            RegradeSystemError::database_operation(format!("提交事务失败: {e}"))
        })?;

        Ok(inserted.into_user(req.assigned_subjects))
    }

    pub async fn get_user_by_id_impl(&self, id: UserId) -> Result<Option<User>> {
        let result = Users::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("查询用户失败: {e}")))?;

        match result {
            Some(model) => {
                let subjects = self.load_assigned_subjects(model.id).await?;
                Ok(Some(model.into_user(subjects)))
            }
            None => Ok(None),
        }
    }

    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("查询用户失败: {e}")))?;

        match result {
            Some(model) => {
                let subjects = self.load_assigned_subjects(model.id).await?;
                Ok(Some(model.into_user(subjects)))
            }
            None => Ok(None),
        }
    }

    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.pagination.page.max(1) as u64;
        let size = query.pagination.size.clamp(1, 100) as u64;

        let mut select = Users::find();

        if let Some(role) = &query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(search) = &query.search
            && !search.is_empty()
        {
            let pattern = format!("%{}%", escape_like_pattern(search));
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(&pattern))
                    .add(Column::Email.like(&pattern))
                    .add(Column::FullName.like(&pattern)),
            );
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("查询用户总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("查询用户页数失败: {e}")))?;

        let models = paginator.fetch_page(page - 1).await.map_err(|e| {
            RegradeSystemError::database_operation(format!("查询用户列表失败: {e}"))
        })?;

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut subjects_map = self.load_subjects_map(&ids).await?;

        let items = models
            .into_iter()
            .map(|m| {
                let subjects = subjects_map.remove(&m.id).unwrap_or_default();
                m.into_user(subjects)
            })
            .collect();

        Ok(UserListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                size: size as i64,
                total: total as i64,
                pages: pages as i64,
            },
        })
    }

    pub async fn update_user_impl(
        &self,
        id: UserId,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let existing = Users::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("查询用户失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let txn = self.db.begin().await.map_err(|e| {
            RegradeSystemError::database_operation(format!("开启事务失败: {e}"))
        })?;

        let mut model: ActiveModel = existing.into();

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = update.password {
            model.password_hash = Set(password_hash);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(full_name) = update.full_name {
            model.full_name = Set(Some(full_name));
        }
        if let Some(department) = update.department {
            model.department = Set(Some(department));
        }
        if let Some(groups) = &update.assigned_groups {
            model.assigned_groups = Set(Some(serde_json::to_string(groups)?));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("更新用户失败: {e}")))?;

        // 科目指派整体替换
        if let Some(subjects) = &update.assigned_subjects {
            teacher_subjects::Entity::delete_many()
                .filter(teacher_subjects::Column::TeacherId.eq(id.as_i64()))
                .exec(&txn)
                .await
                .map_err(|e| {
                    RegradeSystemError::database_operation(format!("清除科目指派失败: {e}"))
                })?;

            let now = chrono::Utc::now().timestamp();
            for subject_id in subjects {
                let link = teacher_subjects::ActiveModel {
                    teacher_id: Set(id.as_i64()),
                    subject_id: Set(subject_id.as_i64()),
                    assigned_at: Set(now),
                    ..Default::default()
                };
                link.insert(&txn).await.map_err(|e| {
                    RegradeSystemError::database_operation(format!("写入科目指派失败: {e}"))
                })?;
            }
        }

        txn.commit().await.map_err(|e| {
            RegradeSystemError::database_operation(format!("提交事务失败: {e}"))
        })?;

        let subjects = self.load_assigned_subjects(id.as_i64()).await?;
        Ok(Some(updated.into_user(subjects)))
    }

    pub async fn delete_user_impl(&self, id: UserId) -> Result<bool> {
        let result = Users::delete_by_id(id.as_i64())
            .exec(&self.db)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn update_last_login_impl(&self, id: UserId) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                Column::LastLogin,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id.as_i64()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                RegradeSystemError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("统计用户数量失败: {e}")))
    }

    /// 合格复核教师集合：具备该科目资格的在职教师，排除原评分教师
    pub async fn list_teachers_by_subject_impl(
        &self,
        subject_id: SubjectId,
        exclude: UserId,
    ) -> Result<Vec<User>> {
        let links = teacher_subjects::Entity::find()
            .filter(teacher_subjects::Column::SubjectId.eq(subject_id.as_i64()))
            .all(&self.db)
            .await
            .map_err(|e| {
                RegradeSystemError::database_operation(format!("查询科目指派失败: {e}"))
            })?;

        let teacher_ids: Vec<i64> = links
            .iter()
            .map(|l| l.teacher_id)
            .filter(|id| *id != exclude.as_i64())
            .collect();

        if teacher_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Users::find()
            .filter(Column::Id.is_in(teacher_ids.clone()))
            .filter(Column::Role.eq(UserRole::TEACHER))
            .filter(Column::Status.eq("active"))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RegradeSystemError::database_operation(format!("查询教师失败: {e}")))?;

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut subjects_map = self.load_subjects_map(&ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let subjects = subjects_map.remove(&m.id).unwrap_or_default();
                m.into_user(subjects)
            })
            .collect())
    }
}
