use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RegradeRequestService, lifecycle_error_response};
use crate::middlewares::RequireJWT;
use crate::models::RequestId;
use crate::models::regrade_requests::responses::EligibleReviewersResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 管理员查看某申请的合格复核教师列表（空列表是合法结果）
/// GET /regrade-requests/{id}/eligible-reviewers
pub async fn list_eligible_reviewers(
    service: &RegradeRequestService,
    request_id: RequestId,
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
        .eligible_reviewers(&storage, &current_user, request_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EligibleReviewersResponse { items },
            "查询成功",
        ))),
        Err(err) => Ok(lifecycle_error_response(err)),
    }
}
