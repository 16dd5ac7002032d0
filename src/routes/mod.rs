pub mod auth;

pub mod users;

pub mod subjects;

pub mod regrade_requests;

pub mod notifications;

pub mod system;

pub use auth::configure_auth_routes;
pub use notifications::configure_notification_routes;
pub use regrade_requests::configure_regrade_request_routes;
pub use subjects::configure_subject_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;
