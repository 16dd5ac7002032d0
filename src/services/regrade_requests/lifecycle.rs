//! 复核申请生命周期引擎
//!
//! 申请状态的唯一合法修改入口。每次状态变更都通过存储层的条件更新
//! （WHERE id = ? AND status = ?）提交，同一申请的并发操作最多一个
//! 赢家，输家得到 InvalidState。通知分发在状态提交之后尽力而为，
//! 失败不回滚状态。
//!
//! 审批通过的两种部署模式：
//! - auto：资格过滤 -> 随机选择 -> pending 直接进入 in_review；
//! - manual：pending 进入 approved，等管理员调用 assign_reviewer。

use std::sync::Arc;

use crate::errors::RegradeSystemError;
use crate::models::regrade_requests::entities::{RegradeRequest, RequestStatus};
use crate::models::regrade_requests::requests::{
    DecideRequest, DecisionOutcome, RequestTransition,
};
use crate::models::regrade_requests::responses::RegradeRequestView;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::responses::TeacherSummary;
use crate::models::{RequestId, UserId};
use crate::services::notifications::dispatch::{SENDER_ADMIN, SENDER_SYSTEM, dispatch};
use crate::storage::Storage;

use super::selector::ReviewerSelector;

/// 生命周期操作，用于授权策略表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOp {
    List,
    Decide,
    ListEligible,
    Assign,
}

/// 操作 -> 所需角色 的策略表。
/// 授权是数据而不是散落在各处的 if：新增操作时在这里登记。
const OPERATION_POLICY: &[(LifecycleOp, UserRole)] = &[
    (LifecycleOp::List, UserRole::Admin),
    (LifecycleOp::Decide, UserRole::Admin),
    (LifecycleOp::ListEligible, UserRole::Admin),
    (LifecycleOp::Assign, UserRole::Admin),
];

/// 生命周期操作的错误，每个变体对应一个稳定的对外错误码
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleError {
    Forbidden,
    RequestNotFound,
    /// 当前状态不允许该变更（包括并发竞争输掉的情况，属于正常结果）
    InvalidState { current: RequestStatus },
    /// 没有可自动指派的合格复核教师（合格集合为空）
    NoEligibleReviewer,
    SameTeacher,
    TeacherNotFound,
    TeacherNotQualified,
    MissingRejectionReason,
    Storage(String),
}

impl From<RegradeSystemError> for LifecycleError {
    fn from(err: RegradeSystemError) -> Self {
        LifecycleError::Storage(err.to_string())
    }
}

impl std::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleError::Forbidden => write!(f, "没有执行该操作的权限"),
            LifecycleError::RequestNotFound => write!(f, "申请不存在"),
            LifecycleError::InvalidState { current } => {
                write!(f, "当前状态 {current} 不允许该操作")
            }
            LifecycleError::NoEligibleReviewer => write!(f, "没有可用的复核教师"),
            LifecycleError::SameTeacher => write!(f, "不能指派原评分教师复核自己的评分"),
            LifecycleError::TeacherNotFound => write!(f, "教师不存在"),
            LifecycleError::TeacherNotQualified => write!(f, "该教师不具备此科目的复核资格"),
            LifecycleError::MissingRejectionReason => write!(f, "驳回申请必须填写原因"),
            LifecycleError::Storage(msg) => write!(f, "存储错误: {msg}"),
        }
    }
}

/// 生命周期引擎
pub struct LifecycleEngine {
    selector: Arc<dyn ReviewerSelector>,
}

impl LifecycleEngine {
    pub fn new(selector: Arc<dyn ReviewerSelector>) -> Self {
        Self { selector }
    }

    /// 统一授权检查：信任身份断言给出的角色，不再查库
    fn authorize(actor: &User, op: LifecycleOp) -> Result<(), LifecycleError> {
        let required = OPERATION_POLICY
            .iter()
            .find(|(policy_op, _)| *policy_op == op)
            .map(|(_, role)| role)
            .expect("operation missing from policy table");

        if actor.role == *required {
            Ok(())
        } else {
            Err(LifecycleError::Forbidden)
        }
    }

    /// 全部申请的匿名化视图，按创建时间倒序
    pub async fn list(
        &self,
        storage: &Arc<dyn Storage>,
        actor: &User,
    ) -> Result<Vec<RegradeRequestView>, LifecycleError> {
        Self::authorize(actor, LifecycleOp::List)?;

        // 真实姓名从不出现在视图里，只有创建时固化的化名
        let requests = storage.list_regrade_requests().await?;
        Ok(super::render_request_views(storage, requests).await?)
    }

    /// 审批申请（通过或驳回）
    ///
    /// 所有校验都发生在任何写入之前；条件更新失败（并发输家）
    /// 映射为 InvalidState，并带上重读到的当前状态。
    pub async fn decide(
        &self,
        storage: &Arc<dyn Storage>,
        actor: &User,
        request_id: RequestId,
        decision: DecideRequest,
        auto_assign: bool,
    ) -> Result<RegradeRequest, LifecycleError> {
        Self::authorize(actor, LifecycleOp::Decide)?;

        let request = storage
            .get_regrade_request_by_id(request_id)
            .await?
            .ok_or(LifecycleError::RequestNotFound)?;

        match decision.outcome {
            DecisionOutcome::Reject => {
                let reason = decision
                    .rejection_reason
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or("");
                if reason.is_empty() {
                    return Err(LifecycleError::MissingRejectionReason);
                }

                if request.status != RequestStatus::Pending {
                    return Err(LifecycleError::InvalidState {
                        current: request.status,
                    });
                }

                let updated = self
                    .commit(
                        storage,
                        request_id,
                        RequestStatus::Pending,
                        RequestTransition::reject(reason.to_string()),
                    )
                    .await?;

                dispatch(
                    storage,
                    updated.student_id,
                    SENDER_ADMIN,
                    "申请状态更新 - 已驳回",
                    format!("你的成绩复核申请已被驳回。原因：{reason}"),
                )
                .await;

                Ok(updated)
            }
            DecisionOutcome::Approve => {
                if request.status != RequestStatus::Pending {
                    return Err(LifecycleError::InvalidState {
                        current: request.status,
                    });
                }

                if auto_assign {
                    self.approve_with_auto_assignment(storage, &request).await
                } else {
                    self.approve_pending_assignment(storage, &request).await
                }
            }
        }
    }

    /// auto 模式：资格过滤 + 随机选择 + 单次条件更新进入 in_review
    async fn approve_with_auto_assignment(
        &self,
        storage: &Arc<dyn Storage>,
        request: &RegradeRequest,
    ) -> Result<RegradeRequest, LifecycleError> {
        // 合格集合 = 具备该科目资格的教师，排除原评分教师；纯读，无副作用
        let eligible = storage
            .list_teachers_by_subject(request.subject_id, request.teacher_id)
            .await?;

        // 空集合不是静默通过：申请保持 pending，错误可恢复
        let reviewer = self
            .selector
            .select(&eligible)
            .ok_or(LifecycleError::NoEligibleReviewer)?;
        let reviewer_id = reviewer.id;

        let updated = self
            .commit(
                storage,
                request.id,
                RequestStatus::Pending,
                RequestTransition::assign(reviewer_id),
            )
            .await?;

        // 状态已提交，两条通知并发分发，失败不回滚
        tokio::join!(
            dispatch(
                storage,
                reviewer_id,
                SENDER_SYSTEM,
                "新的复核任务",
                "系统已自动指派你复核一条成绩复核申请，请及时处理。".to_string(),
            ),
            dispatch(
                storage,
                updated.student_id,
                SENDER_ADMIN,
                "申请状态更新 - 已进入复核",
                "你的成绩复核申请已通过审批，系统已自动指派复核教师。".to_string(),
            ),
        );

        Ok(updated)
    }

    /// manual 模式：只进入 approved，等待管理员指派
    async fn approve_pending_assignment(
        &self,
        storage: &Arc<dyn Storage>,
        request: &RegradeRequest,
    ) -> Result<RegradeRequest, LifecycleError> {
        let updated = self
            .commit(
                storage,
                request.id,
                RequestStatus::Pending,
                RequestTransition::approve(),
            )
            .await?;

        dispatch(
            storage,
            updated.student_id,
            SENDER_ADMIN,
            "申请状态更新 - 已通过审批",
            "你的成绩复核申请已通过审批，等待指派复核教师。".to_string(),
        )
        .await;

        Ok(updated)
    }

    /// 管理员查看某申请的合格复核教师列表（空列表是合法结果）
    pub async fn eligible_reviewers(
        &self,
        storage: &Arc<dyn Storage>,
        actor: &User,
        request_id: RequestId,
    ) -> Result<Vec<TeacherSummary>, LifecycleError> {
        Self::authorize(actor, LifecycleOp::ListEligible)?;

        let request = storage
            .get_regrade_request_by_id(request_id)
            .await?
            .ok_or(LifecycleError::RequestNotFound)?;

        let eligible = storage
            .list_teachers_by_subject(request.subject_id, request.teacher_id)
            .await?;

        Ok(eligible.iter().map(TeacherSummary::from).collect())
    }

    /// 手动指派复核教师（manual 部署模式下 approved 状态的出口）
    pub async fn assign_reviewer(
        &self,
        storage: &Arc<dyn Storage>,
        actor: &User,
        request_id: RequestId,
        reviewer_id: UserId,
    ) -> Result<RegradeRequest, LifecycleError> {
        Self::authorize(actor, LifecycleOp::Assign)?;

        let request = storage
            .get_regrade_request_by_id(request_id)
            .await?
            .ok_or(LifecycleError::RequestNotFound)?;

        if request.status != RequestStatus::Approved {
            return Err(LifecycleError::InvalidState {
                current: request.status,
            });
        }

        // 排除不变式：复核教师永远不能是原评分教师
        if reviewer_id == request.teacher_id {
            return Err(LifecycleError::SameTeacher);
        }

        let reviewer = storage
            .get_user_by_id(reviewer_id)
            .await?
            .ok_or(LifecycleError::TeacherNotFound)?;

        // 资格校验：角色为教师且具备该科目资格
        if !reviewer.teaches_subject(request.subject_id) {
            return Err(LifecycleError::TeacherNotQualified);
        }

        let updated = self
            .commit(
                storage,
                request_id,
                RequestStatus::Approved,
                RequestTransition::assign(reviewer_id),
            )
            .await?;

        tokio::join!(
            dispatch(
                storage,
                reviewer_id,
                SENDER_ADMIN,
                "新的复核任务",
                "管理员已指派你复核一条成绩复核申请，请及时处理。".to_string(),
            ),
            dispatch(
                storage,
                updated.student_id,
                SENDER_ADMIN,
                "已指派复核教师",
                "你的成绩复核申请已指派复核教师。".to_string(),
            ),
        );

        Ok(updated)
    }

    /// 提交条件状态变更；影响 0 行说明竞争输掉或申请被删，
    /// 重读一次当前状态让输家拿到可诊断的 InvalidState
    async fn commit(
        &self,
        storage: &Arc<dyn Storage>,
        request_id: RequestId,
        expected: RequestStatus,
        transition: RequestTransition,
    ) -> Result<RegradeRequest, LifecycleError> {
        match storage
            .transition_regrade_request(request_id, expected, transition)
            .await?
        {
            Some(updated) => Ok(updated),
            None => {
                let current = storage
                    .get_regrade_request_by_id(request_id)
                    .await?
                    .map(|r| r.status)
                    .ok_or(LifecycleError::RequestNotFound)?;
                Err(LifecycleError::InvalidState { current })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result as StorageResult;
    use crate::models::notifications::entities::Notification;
    use crate::models::notifications::requests::{
        CreateNotificationRequest, NotificationListQuery,
    };
    use crate::models::notifications::responses::NotificationListResponse;
    use crate::models::regrade_requests::requests::NewRegradeRequest;
    use crate::models::subjects::entities::Subject;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::models::users::entities::UserStatus;
    use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListQuery};
    use crate::models::users::responses::UserListResponse;
    use crate::models::{NotificationId, SubjectId};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// 测试用确定性选择器：总是选第一个
    struct FirstSelector;

    impl ReviewerSelector for FirstSelector {
        fn select<'a>(&self, eligible: &'a [User]) -> Option<&'a User> {
            eligible.first()
        }
    }

    /// 内存存储：条件更新在互斥锁内完成读-判-写，与数据库的
    /// 条件 UPDATE 等价，用于并发语义测试
    #[derive(Default)]
    struct MemoryStorage {
        users: Mutex<HashMap<i64, User>>,
        subjects: Mutex<HashMap<i64, Subject>>,
        requests: Mutex<HashMap<i64, RegradeRequest>>,
        notifications: Mutex<Vec<Notification>>,
        next_id: AtomicI64,
    }

    impl MemoryStorage {
        fn add_user(&self, user: User) {
            self.users.lock().unwrap().insert(user.id.as_i64(), user);
        }

        fn add_subject(&self, subject: Subject) {
            self.subjects
                .lock()
                .unwrap()
                .insert(subject.id.as_i64(), subject);
        }

        fn add_request(&self, request: RegradeRequest) {
            self.requests
                .lock()
                .unwrap()
                .insert(request.id.as_i64(), request);
        }

        fn notifications_for(&self, recipient: UserId) -> Vec<Notification> {
            self.notifications
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.recipient_id == recipient)
                .cloned()
                .collect()
        }

        fn notification_count(&self) -> usize {
            self.notifications.lock().unwrap().len()
        }

        fn request_status(&self, id: RequestId) -> RequestStatus {
            self.requests.lock().unwrap()[&id.as_i64()].status
        }
    }

    #[async_trait::async_trait]
    impl Storage for MemoryStorage {
        async fn create_user(&self, _user: CreateUserRequest) -> StorageResult<User> {
            unimplemented!()
        }

        async fn get_user_by_id(&self, id: UserId) -> StorageResult<Option<User>> {
            Ok(self.users.lock().unwrap().get(&id.as_i64()).cloned())
        }

        async fn get_user_by_username_or_email(
            &self,
            _identifier: &str,
        ) -> StorageResult<Option<User>> {
            unimplemented!()
        }

        async fn list_users_with_pagination(
            &self,
            _query: UserListQuery,
        ) -> StorageResult<UserListResponse> {
            unimplemented!()
        }

        async fn update_user(
            &self,
            _id: UserId,
            _update: UpdateUserRequest,
        ) -> StorageResult<Option<User>> {
            unimplemented!()
        }

        async fn delete_user(&self, _id: UserId) -> StorageResult<bool> {
            unimplemented!()
        }

        async fn update_last_login(&self, _id: UserId) -> StorageResult<bool> {
            unimplemented!()
        }

        async fn count_users(&self) -> StorageResult<u64> {
            unimplemented!()
        }

        async fn list_teachers_by_subject(
            &self,
            subject_id: SubjectId,
            exclude: UserId,
        ) -> StorageResult<Vec<User>> {
            let mut teachers: Vec<User> = self
                .users
                .lock()
                .unwrap()
                .values()
                .filter(|u| {
                    u.role == UserRole::Teacher
                        && u.status == UserStatus::Active
                        && u.id != exclude
                        && u.assigned_subjects.contains(&subject_id)
                })
                .cloned()
                .collect();
            teachers.sort_by_key(|t| t.id);
            Ok(teachers)
        }

        async fn create_subject(
            &self,
            _subject: CreateSubjectRequest,
        ) -> StorageResult<Subject> {
            unimplemented!()
        }

        async fn get_subject_by_id(&self, id: SubjectId) -> StorageResult<Option<Subject>> {
            Ok(self.subjects.lock().unwrap().get(&id.as_i64()).cloned())
        }

        async fn list_subjects(&self) -> StorageResult<Vec<Subject>> {
            Ok(self.subjects.lock().unwrap().values().cloned().collect())
        }

        async fn create_regrade_request(
            &self,
            _request: NewRegradeRequest,
        ) -> StorageResult<RegradeRequest> {
            unimplemented!()
        }

        async fn get_regrade_request_by_id(
            &self,
            id: RequestId,
        ) -> StorageResult<Option<RegradeRequest>> {
            Ok(self.requests.lock().unwrap().get(&id.as_i64()).cloned())
        }

        async fn list_regrade_requests(&self) -> StorageResult<Vec<RegradeRequest>> {
            let mut all: Vec<RegradeRequest> =
                self.requests.lock().unwrap().values().cloned().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        }

        async fn list_regrade_requests_by_student(
            &self,
            student_id: UserId,
        ) -> StorageResult<Vec<RegradeRequest>> {
            let mut mine: Vec<RegradeRequest> = self
                .requests
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.student_id == student_id)
                .cloned()
                .collect();
            mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(mine)
        }

        async fn list_regrade_requests_by_reviewer(
            &self,
            reviewer_id: UserId,
        ) -> StorageResult<Vec<RegradeRequest>> {
            let mut mine: Vec<RegradeRequest> = self
                .requests
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.reviewer_id == Some(reviewer_id))
                .cloned()
                .collect();
            mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(mine)
        }

        async fn transition_regrade_request(
            &self,
            id: RequestId,
            expected: RequestStatus,
            transition: RequestTransition,
        ) -> StorageResult<Option<RegradeRequest>> {
            // 锁内读-判-写，等价于条件 UPDATE 的原子性
            let mut requests = self.requests.lock().unwrap();
            let Some(request) = requests.get_mut(&id.as_i64()) else {
                return Ok(None);
            };
            if request.status != expected {
                return Ok(None);
            }

            let now = chrono::Utc::now();
            request.status = transition.status;
            request.updated_at = now;
            if let Some(reviewer_id) = transition.reviewer_id {
                request.reviewer_id = Some(reviewer_id);
            }
            if let Some(reason) = transition.rejection_reason {
                request.rejection_reason = Some(reason);
            }
            if transition.set_assigned_at {
                request.assigned_at = Some(now);
            }

            Ok(Some(request.clone()))
        }

        async fn create_notification(
            &self,
            req: CreateNotificationRequest,
        ) -> StorageResult<Notification> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let notification = Notification {
                id: NotificationId::new(id),
                recipient_id: req.recipient_id,
                sender: req.sender,
                subject: req.subject,
                content: req.content,
                category: req.category,
                is_read: false,
                sent_at: chrono::Utc::now(),
            };
            self.notifications
                .lock()
                .unwrap()
                .push(notification.clone());
            Ok(notification)
        }

        async fn list_notifications_with_pagination(
            &self,
            _recipient_id: UserId,
            _query: NotificationListQuery,
        ) -> StorageResult<NotificationListResponse> {
            unimplemented!()
        }

        async fn get_unread_notification_count(
            &self,
            _recipient_id: UserId,
        ) -> StorageResult<i64> {
            unimplemented!()
        }

        async fn mark_notification_as_read(
            &self,
            _notification_id: NotificationId,
            _recipient_id: UserId,
        ) -> StorageResult<bool> {
            unimplemented!()
        }

        async fn mark_all_notifications_as_read(
            &self,
            _recipient_id: UserId,
        ) -> StorageResult<i64> {
            unimplemented!()
        }
    }

    fn user(id: i64, role: UserRole, subjects: Vec<SubjectId>) -> User {
        User {
            id: UserId::new(id),
            username: format!("user{id}"),
            email: format!("user{id}@uni.edu"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            full_name: None,
            department: None,
            assigned_subjects: subjects,
            assigned_groups: vec![],
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn subject(id: i64, code: &str) -> Subject {
        Subject {
            id: SubjectId::new(id),
            name: format!("Subject {code}"),
            code: code.to_string(),
            description: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn pending_request(id: i64, student: i64, subject: i64, teacher: i64) -> RegradeRequest {
        RegradeRequest {
            id: RequestId::new(id),
            student_id: UserId::new(student),
            subject_id: SubjectId::new(subject),
            teacher_id: UserId::new(teacher),
            reviewer_id: None,
            group_name: "GR1".to_string(),
            assessment: "Primer aporte".to_string(),
            current_grade: 14.0,
            justification: "La suma de puntos no coincide".to_string(),
            rejection_reason: None,
            status: RequestStatus::Pending,
            student_alias: "学生-A1B2".to_string(),
            teacher_alias: "教师-C3D4".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            assigned_at: None,
        }
    }

    /// CALC101 场景：原评分教师 T1(2)，合格复核教师 T2(3)、T3(4)
    fn calc101_fixture() -> (Arc<dyn Storage>, Arc<MemoryStorage>, User, User) {
        let storage = Arc::new(MemoryStorage::default());
        let admin = user(1, UserRole::Admin, vec![]);
        let student = user(10, UserRole::Student, vec![]);
        storage.add_user(admin.clone());
        storage.add_user(student.clone());
        storage.add_user(user(2, UserRole::Teacher, vec![SubjectId::new(100)]));
        storage.add_user(user(3, UserRole::Teacher, vec![SubjectId::new(100)]));
        storage.add_user(user(4, UserRole::Teacher, vec![SubjectId::new(100)]));
        storage.add_subject(subject(100, "CALC101"));
        storage.add_request(pending_request(1, 10, 100, 2));
        let dyn_storage: Arc<dyn Storage> = storage.clone();
        (dyn_storage, storage, admin, student)
    }

    fn engine() -> LifecycleEngine {
        LifecycleEngine::new(Arc::new(FirstSelector))
    }

    fn random_engine() -> LifecycleEngine {
        LifecycleEngine::new(Arc::new(super::super::selector::RandomSelector))
    }

    fn approve() -> DecideRequest {
        DecideRequest {
            outcome: DecisionOutcome::Approve,
            rejection_reason: None,
        }
    }

    fn reject(reason: &str) -> DecideRequest {
        DecideRequest {
            outcome: DecisionOutcome::Reject,
            rejection_reason: Some(reason.to_string()),
        }
    }

    #[tokio::test]
    async fn test_approve_auto_assigns_reviewer_and_notifies_both_parties() {
        let (storage, mem, admin, student) = calc101_fixture();

        let updated = random_engine()
            .decide(&storage, &admin, RequestId::new(1), approve(), true)
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::InReview);
        let reviewer_id = updated.reviewer_id.expect("reviewer must be set");
        // 复核教师只能来自合格集合，且不是原评分教师
        assert!([UserId::new(3), UserId::new(4)].contains(&reviewer_id));
        assert_ne!(reviewer_id, updated.teacher_id);
        assert!(updated.assigned_at.is_some());

        // 两条通知：复核教师一条，学生一条
        assert_eq!(mem.notification_count(), 2);
        assert_eq!(mem.notifications_for(reviewer_id).len(), 1);
        assert_eq!(mem.notifications_for(student.id).len(), 1);
    }

    #[tokio::test]
    async fn test_approve_without_alternate_teacher_fails_recoverably() {
        // PHYS201 场景：只有原评分教师具备该科目资格
        let storage = Arc::new(MemoryStorage::default());
        let admin = user(1, UserRole::Admin, vec![]);
        storage.add_user(admin.clone());
        storage.add_user(user(10, UserRole::Student, vec![]));
        storage.add_user(user(2, UserRole::Teacher, vec![SubjectId::new(200)]));
        storage.add_subject(subject(200, "PHYS201"));
        storage.add_request(pending_request(1, 10, 200, 2));
        let dyn_storage: Arc<dyn Storage> = storage.clone();

        let err = engine()
            .decide(&dyn_storage, &admin, RequestId::new(1), approve(), true)
            .await
            .unwrap_err();

        assert_eq!(err, LifecycleError::NoEligibleReviewer);
        // 申请保持 pending，没有任何通知
        assert_eq!(storage.request_status(RequestId::new(1)), RequestStatus::Pending);
        assert_eq!(storage.notification_count(), 0);
    }

    #[tokio::test]
    async fn test_approve_manual_mode_waits_for_assignment() {
        let (storage, mem, admin, student) = calc101_fixture();

        let updated = engine()
            .decide(&storage, &admin, RequestId::new(1), approve(), false)
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::Approved);
        assert!(updated.reviewer_id.is_none());
        assert!(updated.assigned_at.is_none());
        // 只有学生收到"等待指派"通知
        assert_eq!(mem.notification_count(), 1);
        assert_eq!(mem.notifications_for(student.id).len(), 1);
    }

    #[tokio::test]
    async fn test_reject_stores_reason_verbatim_and_notifies_student() {
        let (storage, mem, admin, student) = calc101_fixture();

        let updated = engine()
            .decide(
                &storage,
                &admin,
                RequestId::new(1),
                reject("evidencia insuficiente"),
                true,
            )
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::Rejected);
        assert_eq!(
            updated.rejection_reason.as_deref(),
            Some("evidencia insuficiente")
        );

        let notes = mem.notifications_for(student.id);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].content.contains("evidencia insuficiente"));
        assert_eq!(mem.notification_count(), 1);
    }

    #[tokio::test]
    async fn test_reject_with_blank_reason_is_validation_error() {
        let (storage, mem, admin, _student) = calc101_fixture();

        for reason in [None, Some("".to_string()), Some("   ".to_string())] {
            let err = engine()
                .decide(
                    &storage,
                    &admin,
                    RequestId::new(1),
                    DecideRequest {
                        outcome: DecisionOutcome::Reject,
                        rejection_reason: reason,
                    },
                    true,
                )
                .await
                .unwrap_err();
            assert_eq!(err, LifecycleError::MissingRejectionReason);
        }

        // 校验失败不产生任何写入
        assert_eq!(mem.request_status(RequestId::new(1)), RequestStatus::Pending);
        assert_eq!(mem.notification_count(), 0);
    }

    #[tokio::test]
    async fn test_non_admin_actor_is_forbidden() {
        let (storage, _mem, _admin, student) = calc101_fixture();
        let teacher = user(3, UserRole::Teacher, vec![SubjectId::new(100)]);

        for actor in [&student, &teacher] {
            let err = engine()
                .decide(&storage, actor, RequestId::new(1), approve(), true)
                .await
                .unwrap_err();
            assert_eq!(err, LifecycleError::Forbidden);
        }
    }

    #[tokio::test]
    async fn test_decide_unknown_request() {
        let (storage, _mem, admin, _student) = calc101_fixture();

        let err = engine()
            .decide(&storage, &admin, RequestId::new(999), approve(), true)
            .await
            .unwrap_err();
        assert_eq!(err, LifecycleError::RequestNotFound);
    }

    #[tokio::test]
    async fn test_decide_twice_yields_invalid_state() {
        let (storage, _mem, admin, _student) = calc101_fixture();
        let engine = engine();

        engine
            .decide(&storage, &admin, RequestId::new(1), approve(), true)
            .await
            .unwrap();

        // 重试已完成的变更是安全的非破坏性结果
        let err = engine
            .decide(&storage, &admin, RequestId::new(1), approve(), true)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidState {
                current: RequestStatus::InReview
            }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_decides_have_exactly_one_winner() {
        let (storage, mem, admin, _student) = calc101_fixture();
        let engine = Arc::new(engine());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let storage = storage.clone();
            let admin = admin.clone();
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine
                    .decide(&storage, &admin, RequestId::new(1), approve(), true)
                    .await
            }));
        }

        let mut winners = 0;
        let mut losers = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(updated) => {
                    assert_eq!(updated.status, RequestStatus::InReview);
                    winners += 1;
                }
                Err(LifecycleError::InvalidState { .. }) => losers += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(winners, 1, "恰好一个并发审批成功");
        assert_eq!(losers, 7);
        // 赢家那一次产生两条通知，输家零条
        assert_eq!(mem.notification_count(), 2);
    }

    #[tokio::test]
    async fn test_manual_assignment_happy_path() {
        let (storage, mem, admin, student) = calc101_fixture();
        let engine = engine();

        engine
            .decide(&storage, &admin, RequestId::new(1), approve(), false)
            .await
            .unwrap();

        let updated = engine
            .assign_reviewer(&storage, &admin, RequestId::new(1), UserId::new(3))
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::InReview);
        assert_eq!(updated.reviewer_id, Some(UserId::new(3)));
        assert!(updated.assigned_at.is_some());
        // 审批 1 条 + 指派 2 条
        assert_eq!(mem.notification_count(), 3);
        assert_eq!(mem.notifications_for(UserId::new(3)).len(), 1);
        assert_eq!(mem.notifications_for(student.id).len(), 2);
    }

    #[tokio::test]
    async fn test_assign_original_teacher_is_rejected() {
        let (storage, mem, admin, _student) = calc101_fixture();
        let engine = engine();

        engine
            .decide(&storage, &admin, RequestId::new(1), approve(), false)
            .await
            .unwrap();
        let before = mem.notification_count();

        let err = engine
            .assign_reviewer(&storage, &admin, RequestId::new(1), UserId::new(2))
            .await
            .unwrap_err();

        assert_eq!(err, LifecycleError::SameTeacher);
        assert_eq!(mem.request_status(RequestId::new(1)), RequestStatus::Approved);
        assert_eq!(mem.notification_count(), before);
    }

    #[tokio::test]
    async fn test_assign_unknown_or_unqualified_teacher() {
        let (storage, mem, admin, _student) = calc101_fixture();
        // 一位不教 CALC101 的教师
        mem.add_user(user(5, UserRole::Teacher, vec![SubjectId::new(200)]));
        let engine = engine();

        engine
            .decide(&storage, &admin, RequestId::new(1), approve(), false)
            .await
            .unwrap();

        let err = engine
            .assign_reviewer(&storage, &admin, RequestId::new(1), UserId::new(999))
            .await
            .unwrap_err();
        assert_eq!(err, LifecycleError::TeacherNotFound);

        let err = engine
            .assign_reviewer(&storage, &admin, RequestId::new(1), UserId::new(5))
            .await
            .unwrap_err();
        assert_eq!(err, LifecycleError::TeacherNotQualified);

        // 学生不是教师，同样不合格
        let err = engine
            .assign_reviewer(&storage, &admin, RequestId::new(1), UserId::new(10))
            .await
            .unwrap_err();
        assert_eq!(err, LifecycleError::TeacherNotQualified);
    }

    #[tokio::test]
    async fn test_assign_requires_approved_state() {
        let (storage, _mem, admin, _student) = calc101_fixture();

        let err = engine()
            .assign_reviewer(&storage, &admin, RequestId::new(1), UserId::new(3))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidState {
                current: RequestStatus::Pending
            }
        );
    }

    #[tokio::test]
    async fn test_eligible_reviewers_excludes_original_teacher() {
        let (storage, _mem, admin, _student) = calc101_fixture();

        let eligible = engine()
            .eligible_reviewers(&storage, &admin, RequestId::new(1))
            .await
            .unwrap();

        let ids: Vec<UserId> = eligible.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![UserId::new(3), UserId::new(4)]);
    }

    #[tokio::test]
    async fn test_list_renders_anonymized_views() {
        let (storage, _mem, admin, student) = calc101_fixture();

        let views = engine().list(&storage, &admin).await.unwrap();

        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.student_alias, "学生-A1B2");
        assert_eq!(view.teacher_alias, "教师-C3D4");
        assert_eq!(view.subject_name, "Subject CALC101");

        // 非管理员不能列出
        let err = engine().list(&storage, &student).await.unwrap_err();
        assert_eq!(err, LifecycleError::Forbidden);
    }
}
