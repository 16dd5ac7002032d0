use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{RegradeRequestService, render_request_views};
use crate::middlewares::RequireJWT;
use crate::models::regrade_requests::responses::RegradeRequestListResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 复核教师查看被指派的申请队列（双盲：只看到化名）
/// GET /regrade-requests/assigned
pub async fn list_assigned_requests(
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
        .list_regrade_requests_by_reviewer(current_user.id)
        .await
    {
        Ok(requests) => requests,
        Err(e) => {
            error!("查询复核任务失败: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询复核任务失败: {e}"),
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
