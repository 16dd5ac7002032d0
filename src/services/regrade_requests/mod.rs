pub mod assign;
pub mod assigned;
pub mod create;
pub mod decide;
pub mod eligible;
pub mod lifecycle;
pub mod list;
pub mod mine;
pub mod selector;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::regrade_requests::entities::RegradeRequest;
use crate::models::regrade_requests::requests::{
    AssignReviewerRequest, CreateRegradeRequestRequest, DecideRequest,
};
use crate::models::regrade_requests::responses::RegradeRequestView;
use crate::models::{ApiResponse, ErrorCode, RequestId};
use crate::storage::Storage;

use lifecycle::{LifecycleEngine, LifecycleError};
use selector::RandomSelector;

pub struct RegradeRequestService {
    storage: Option<Arc<dyn Storage>>,
    engine: LifecycleEngine,
}

impl RegradeRequestService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            engine: LifecycleEngine::new(Arc::new(RandomSelector)),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn engine(&self) -> &LifecycleEngine {
        &self.engine
    }

    // 学生提交申请
    pub async fn create_request(
        &self,
        request_data: CreateRegradeRequestRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_request(self, request_data, request).await
    }

    // 管理员列出全部申请（匿名化视图）
    pub async fn list_requests(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_requests(self, request).await
    }

    // 学生查看自己的申请
    pub async fn list_my_requests(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::list_my_requests(self, request).await
    }

    // 复核教师查看被指派的申请
    pub async fn list_assigned_requests(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        assigned::list_assigned_requests(self, request).await
    }

    // 管理员审批申请
    pub async fn decide_request(
        &self,
        request_id: RequestId,
        decision: DecideRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        decide::decide_request(self, request_id, decision, request).await
    }

    // 管理员查看合格复核教师
    pub async fn list_eligible_reviewers(
        &self,
        request_id: RequestId,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        eligible::list_eligible_reviewers(self, request_id, request).await
    }

    // 管理员手动指派复核教师
    pub async fn assign_reviewer(
        &self,
        request_id: RequestId,
        assign_data: AssignReviewerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assign::assign_reviewer(self, request_id, assign_data, request).await
    }
}

/// 把申请渲染为匿名化视图（批量，联表填充科目名）
pub(crate) async fn render_request_views(
    storage: &Arc<dyn Storage>,
    requests: Vec<RegradeRequest>,
) -> Result<Vec<RegradeRequestView>> {
    let subjects = storage.list_subjects().await?;
    let names: std::collections::HashMap<_, _> =
        subjects.into_iter().map(|s| (s.id, s.name)).collect();

    Ok(requests
        .into_iter()
        .map(|request| {
            let subject_name = names
                .get(&request.subject_id)
                .cloned()
                .unwrap_or_else(|| "未知科目".to_string());
            RegradeRequestView::from_request(request, subject_name)
        })
        .collect())
}

/// 单个申请的匿名化视图
pub(crate) async fn render_request_view(
    storage: &Arc<dyn Storage>,
    request: RegradeRequest,
) -> Result<RegradeRequestView> {
    let subject_name = storage
        .get_subject_by_id(request.subject_id)
        .await?
        .map(|s| s.name)
        .unwrap_or_else(|| "未知科目".to_string());
    Ok(RegradeRequestView::from_request(request, subject_name))
}

/// 生命周期错误 -> HTTP 响应的统一映射
///
/// 每个错误都带稳定错误码；InvalidState（含并发输家）用 409 表示
/// 这是一个预期内的业务结果，而不是服务端故障。
pub(crate) fn lifecycle_error_response(err: lifecycle::LifecycleError) -> HttpResponse {
    let message = err.to_string();
    match err {
        LifecycleError::Forbidden => {
            HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
        }
        LifecycleError::RequestNotFound => HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::RequestNotFound, message),
        ),
        LifecycleError::InvalidState { .. } => HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::InvalidState, message),
        ),
        LifecycleError::NoEligibleReviewer => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::NoEligibleReviewer, message),
        ),
        LifecycleError::SameTeacher => {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::SameTeacher, message))
        }
        LifecycleError::TeacherNotFound => HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::TeacherNotFound, message),
        ),
        LifecycleError::TeacherNotQualified => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::TeacherNotQualified, message),
        ),
        LifecycleError::MissingRejectionReason => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::MissingRejectionReason, message),
        ),
        LifecycleError::Storage(_) => HttpResponse::InternalServerError().json(
            ApiResponse::error_empty(ErrorCode::InternalServerError, message),
        ),
    }
}
