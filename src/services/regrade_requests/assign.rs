use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{RegradeRequestService, lifecycle_error_response, render_request_view};
use crate::middlewares::RequireJWT;
use crate::models::RequestId;
use crate::models::regrade_requests::requests::AssignReviewerRequest;
use crate::models::regrade_requests::responses::RegradeRequestResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 管理员手动指派复核教师
/// POST /regrade-requests/{id}/reviewer
pub async fn assign_reviewer(
    service: &RegradeRequestService,
    request_id: RequestId,
    assign_data: AssignReviewerRequest,
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

    match service
        .engine()
        .assign_reviewer(&storage, &current_user, request_id, assign_data.reviewer_id)
        .await
    {
        Ok(updated) => {
            info!(
                "Reviewer {} assigned to request {} by admin {}",
                assign_data.reviewer_id, updated.id, current_user.id
            );
            match render_request_view(&storage, updated).await {
                Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                    RegradeRequestResponse { request: view },
                    "复核教师指派成功",
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
