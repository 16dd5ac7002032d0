use std::sync::Arc;

use crate::models::{
    NotificationId, RequestId, SubjectId, UserId,
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
    regrade_requests::{
        entities::{RegradeRequest, RequestStatus},
        requests::{NewRegradeRequest, RequestTransition},
    },
    subjects::{entities::Subject, requests::CreateSubjectRequest},
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（密码已哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息（含教师的科目/分组指派）
    async fn update_user(&self, id: UserId, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: UserId) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: UserId) -> Result<bool>;
    // 统计用户数量（启动时判断是否需要初始化管理员）
    async fn count_users(&self) -> Result<u64>;

    /// 教师目录（只读）
    // 具备某科目资格的在职教师集合，排除指定教师（原评分教师）。
    // 空集合是合法结果，由调用方决定是否视为错误。
    async fn list_teachers_by_subject(
        &self,
        subject_id: SubjectId,
        exclude: UserId,
    ) -> Result<Vec<User>>;

    /// 科目管理方法
    // 创建科目
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    // 通过ID获取科目
    async fn get_subject_by_id(&self, id: SubjectId) -> Result<Option<Subject>>;
    // 列出全部科目
    async fn list_subjects(&self) -> Result<Vec<Subject>>;

    /// 复核申请方法
    // 创建申请（初始状态 pending；别名已计算）
    async fn create_regrade_request(&self, request: NewRegradeRequest) -> Result<RegradeRequest>;
    // 通过ID获取申请
    async fn get_regrade_request_by_id(&self, id: RequestId) -> Result<Option<RegradeRequest>>;
    // 全部申请，按创建时间倒序
    async fn list_regrade_requests(&self) -> Result<Vec<RegradeRequest>>;
    // 某学生的申请，按创建时间倒序
    async fn list_regrade_requests_by_student(
        &self,
        student_id: UserId,
    ) -> Result<Vec<RegradeRequest>>;
    // 指派给某复核教师的申请，按创建时间倒序
    async fn list_regrade_requests_by_reviewer(
        &self,
        reviewer_id: UserId,
    ) -> Result<Vec<RegradeRequest>>;
    // 条件状态变更：只有当前状态等于 expected 时才写入。
    // 返回 None 表示申请不存在或状态已被并发修改（调用方视作 InvalidState）。
    async fn transition_regrade_request(
        &self,
        id: RequestId,
        expected: RequestStatus,
        transition: RequestTransition,
    ) -> Result<Option<RegradeRequest>>;

    /// 通知方法
    // 追加一条未读通知
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification>;
    // 列出用户通知（分页）
    async fn list_notifications_with_pagination(
        &self,
        recipient_id: UserId,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    // 获取用户未读通知数量
    async fn get_unread_notification_count(&self, recipient_id: UserId) -> Result<i64>;
    // 标记通知为已读（只允许接收者本人）
    async fn mark_notification_as_read(
        &self,
        notification_id: NotificationId,
        recipient_id: UserId,
    ) -> Result<bool>;
    // 标记用户所有通知为已读
    async fn mark_all_notifications_as_read(&self, recipient_id: UserId) -> Result<i64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
