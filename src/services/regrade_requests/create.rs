use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::RegradeRequestService;
use crate::middlewares::RequireJWT;
use crate::models::regrade_requests::requests::{CreateRegradeRequestRequest, NewRegradeRequest};
use crate::models::regrade_requests::responses::RegradeRequestResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::anonymize::anonymous_label;
use crate::utils::validate::{validate_grade, validate_justification};

/// 学生提交复核申请
/// POST /regrade-requests
pub async fn create_request(
    service: &RegradeRequestService,
    request_data: CreateRegradeRequestRequest,
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

    // 只有学生能提交复核申请
    if current_user.role != UserRole::Student {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只有学生可以提交复核申请",
        )));
    }

    // 入参校验，全部发生在写入之前
    if let Err(msg) = validate_grade(request_data.current_grade) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    if let Err(msg) = validate_justification(&request_data.justification) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    // 科目必须存在
    let subject = match storage.get_subject_by_id(request_data.subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubjectNotFound,
                "科目不存在",
            )));
        }
        Err(e) => {
            error!("查询科目失败: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询科目失败: {e}"),
                )),
            );
        }
    };

    // 原评分教师必须存在且具备该科目资格
    match storage.get_user_by_id(request_data.teacher_id).await {
        Ok(Some(teacher)) => {
            if teacher.role != UserRole::Teacher
                || !teacher.teaches_subject(request_data.subject_id)
            {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::TeacherNotQualified,
                    "该教师不教授此科目",
                )));
            }
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeacherNotFound,
                "教师不存在",
            )));
        }
        Err(e) => {
            error!("查询教师失败: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询教师失败: {e}"),
                )),
            );
        }
    }

    // 化名在创建时计算一次并持久化，之后所有读取都用存储的值
    let now_ts = chrono::Utc::now().timestamp();
    let new_request = NewRegradeRequest {
        student_id: current_user.id,
        subject_id: request_data.subject_id,
        teacher_id: request_data.teacher_id,
        group_name: request_data.group_name,
        assessment: request_data.assessment,
        current_grade: request_data.current_grade,
        justification: request_data.justification,
        student_alias: anonymous_label("学生", current_user.id, now_ts),
        teacher_alias: anonymous_label("教师", request_data.teacher_id, now_ts),
    };

    match storage.create_regrade_request(new_request).await {
        Ok(created) => {
            info!(
                "Regrade request {} created by student {} for subject {}",
                created.id, current_user.id, subject.code
            );
            let view =
                crate::models::regrade_requests::responses::RegradeRequestView::from_request(
                    created,
                    subject.name,
                );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                RegradeRequestResponse { request: view },
                "申请提交成功",
            )))
        }
        Err(e) => {
            error!("创建申请失败: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RequestCreationFailed,
                format!("创建申请失败: {e}"),
            )))
        }
    }
}
