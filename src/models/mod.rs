pub mod auth;
pub mod common;
pub mod notifications;
pub mod regrade_requests;
pub mod subjects;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::id::{NotificationId, RequestId, SubjectId, UserId};
pub use common::pagination::{PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 应用启动时间，用于健康检查中的运行时长统计
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
