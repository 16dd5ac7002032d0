use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RegradeRequestService, lifecycle_error_response};
use crate::middlewares::RequireJWT;
use crate::models::regrade_requests::responses::RegradeRequestListResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 管理员列出全部申请（匿名化，按创建时间倒序）
/// GET /regrade-requests
pub async fn list_requests(
    service: &RegradeRequestService,
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

    match service.engine().list(&storage, &current_user).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RegradeRequestListResponse { items },
            "查询成功",
        ))),
        Err(err) => Ok(lifecycle_error_response(err)),
    }
}
