use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::regrade_requests::requests::{
    AssignReviewerRequest, CreateRegradeRequestRequest, DecideRequest,
};
use crate::services::RegradeRequestService;
use crate::utils::SafeRequestId;

// 懒加载的全局 RegradeRequestService 实例
static REGRADE_REQUEST_SERVICE: Lazy<RegradeRequestService> =
    Lazy::new(RegradeRequestService::new_lazy);

// HTTP处理程序
//
// 管理员操作（列表/审批/资格查询/指派）的授权由生命周期引擎的
// 策略表统一完成，路由层只负责身份认证。
pub async fn create_request(
    req: HttpRequest,
    request_data: web::Json<CreateRegradeRequestRequest>,
) -> ActixResult<HttpResponse> {
    REGRADE_REQUEST_SERVICE
        .create_request(request_data.into_inner(), &req)
        .await
}

pub async fn list_requests(req: HttpRequest) -> ActixResult<HttpResponse> {
    REGRADE_REQUEST_SERVICE.list_requests(&req).await
}

pub async fn list_my_requests(req: HttpRequest) -> ActixResult<HttpResponse> {
    REGRADE_REQUEST_SERVICE.list_my_requests(&req).await
}

pub async fn list_assigned_requests(req: HttpRequest) -> ActixResult<HttpResponse> {
    REGRADE_REQUEST_SERVICE.list_assigned_requests(&req).await
}

pub async fn decide_request(
    req: HttpRequest,
    request_id: SafeRequestId,
    decision: web::Json<DecideRequest>,
) -> ActixResult<HttpResponse> {
    REGRADE_REQUEST_SERVICE
        .decide_request(request_id.0, decision.into_inner(), &req)
        .await
}

pub async fn list_eligible_reviewers(
    req: HttpRequest,
    request_id: SafeRequestId,
) -> ActixResult<HttpResponse> {
    REGRADE_REQUEST_SERVICE
        .list_eligible_reviewers(request_id.0, &req)
        .await
}

pub async fn assign_reviewer(
    req: HttpRequest,
    request_id: SafeRequestId,
    assign_data: web::Json<AssignReviewerRequest>,
) -> ActixResult<HttpResponse> {
    REGRADE_REQUEST_SERVICE
        .assign_reviewer(request_id.0, assign_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_regrade_request_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/regrade-requests")
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(create_request))
            .route("", web::get().to(list_requests))
            .route("/mine", web::get().to(list_my_requests))
            .route("/assigned", web::get().to(list_assigned_requests))
            .route("/{id}/decision", web::put().to(decide_request))
            .route(
                "/{id}/eligible-reviewers",
                web::get().to(list_eligible_reviewers),
            )
            .route("/{id}/reviewer", web::post().to(assign_reviewer)),
    );
}
