use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{RegradeRequestService, lifecycle_error_response, render_request_view};
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::RequestId;
use crate::models::regrade_requests::requests::DecideRequest;
use crate::models::regrade_requests::responses::RegradeRequestResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 管理员审批申请（通过/驳回）
/// PUT /regrade-requests/{id}/decision
pub async fn decide_request(
    service: &RegradeRequestService,
    request_id: RequestId,
    decision: DecideRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    // 部署模式决定审批通过后是否自动指派
    let auto_assign = AppConfig::get().assignment.is_auto();

    match service
        .engine()
        .decide(&storage, &current_user, request_id, decision, auto_assign)
        .await
    {
        Ok(updated) => {
            info!(
                "Request {} decided by admin {}: status -> {}",
                updated.id, current_user.id, updated.status
            );
            match render_request_view(&storage, updated).await {
                Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                    RegradeRequestResponse { request: view },
                    "审批完成",
                ))),
                Err(e) => {
                    error!("渲染申请视图失败: {}", e);
                    Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("渲染申请视图失败: {e}"),
                        )),
                    )
                }
            }
        }
        Err(err) => Ok(lifecycle_error_response(err)),
    }
}
