//! 业务错误码定义
//!
//! 所有 API 错误响应都携带一个稳定的数字错误码，调用方可以据此分支处理，
//! 而不需要解析 message 文本。

/// 统一业务错误码
///
/// 0 为成功；1xxx 为通用错误；2xxx 认证；3xxx 用户；4xxx 科目；
/// 5xxx 复核申请生命周期；6xxx 通知。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    InternalServerError = 1004,

    // 认证
    AuthFailed = 2001,
    UserInactive = 2002,

    // 用户
    UserNotFound = 3001,
    UserAlreadyExists = 3002,
    UserCreationFailed = 3003,
    UserUpdateFailed = 3004,
    UserPasswordInvalid = 3005,

    // 科目
    SubjectNotFound = 4001,
    SubjectAlreadyExists = 4002,

    // 复核申请生命周期
    RequestNotFound = 5001,
    InvalidState = 5002,
    NoEligibleReviewer = 5003,
    SameTeacher = 5004,
    TeacherNotFound = 5005,
    TeacherNotQualified = 5006,
    MissingRejectionReason = 5007,
    RequestCreationFailed = 5008,

    // 通知
    NotificationNotFound = 6001,
    NotificationPersistError = 6002,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values_are_stable() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Forbidden as i32, 1002);
        assert_eq!(ErrorCode::RequestNotFound as i32, 5001);
        assert_eq!(ErrorCode::InvalidState as i32, 5002);
        assert_eq!(ErrorCode::NoEligibleReviewer as i32, 5003);
        assert_eq!(ErrorCode::SameTeacher as i32, 5004);
        assert_eq!(ErrorCode::MissingRejectionReason as i32, 5007);
    }
}
