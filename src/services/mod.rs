pub mod auth;
pub mod notifications;
pub mod regrade_requests;
pub mod subjects;
pub mod system;
pub mod users;

pub use auth::AuthService;
pub use notifications::NotificationService;
pub use regrade_requests::RegradeRequestService;
pub use subjects::SubjectService;
pub use system::SystemService;
pub use users::UserService;
