use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{RegradeRequestService, render_request_views};
use crate::middlewares::RequireJWT;
use crate::models::regrade_requests::responses::RegradeRequestListResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 学生查看自己的申请
/// GET /regrade-requests/mine
pub async fn list_my_requests(
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

    let requests = match storage
        .list_regrade_requests_by_student(current_user.id)
        .await
    {
        Ok(requests) => requests,
        Err(e) => {
            error!("查询学生申请失败: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询申请失败: {e}"),
                )),
            );
        }
    };

    match render_request_views(&storage, requests).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RegradeRequestListResponse { items },
            "查询成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("渲染申请视图失败: {e}"),
            )),
        ),
    }
}
