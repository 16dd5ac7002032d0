//! 类型安全的路径参数提取器
//!
//! 路径中的 `{id}` 解析失败时直接返回 400 JSON 响应，
//! 处理函数拿到的是强类型 ID。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode, NotificationId, RequestId, UserId};

/// 定义路径 ID 提取器的宏
macro_rules! define_safe_id_extractor {
    ($name:ident, $id:ty, $err_msg:literal) => {
        pub struct $name(pub $id);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                let result = req
                    .match_info()
                    .query("id")
                    .parse::<$id>()
                    .map($name)
                    .map_err(|_| {
                        let response = HttpResponse::BadRequest()
                            .json(ApiResponse::error_empty(ErrorCode::BadRequest, $err_msg));
                        InternalError::from_response($err_msg, response).into()
                    });
                ready(result)
            }
        }
    };
}

define_safe_id_extractor!(SafeUserId, UserId, "无效的用户ID");
define_safe_id_extractor!(SafeRequestId, RequestId, "无效的申请ID");
define_safe_id_extractor!(SafeNotificationId, NotificationId, "无效的通知ID");
