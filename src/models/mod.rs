//! 业务数据模型
//!
//! 每个子模块按 `entities` / `requests` / `responses` 划分，
//! 所有对外类型通过 ts-rs 导出到前端。

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod departments;
pub mod fees;
pub mod imports;
pub mod programs;
pub mod roles;
pub mod sections;
pub mod students;
pub mod teachers;
pub mod timetables;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 应用启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 认证与用户；3xxx 教务结构；
/// 4xxx 师生档案；5xxx 课表与考勤；6xxx 学费；7xxx 导入导出。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    PayloadTooLarge = 1007,
    InternalServerError = 1999,

    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserEmailAlreadyExists = 2006,
    UserCreationFailed = 2007,
    UserUpdateFailed = 2008,
    UserDeleteFailed = 2009,
    CanNotDeleteCurrentUser = 2010,
    UserInactive = 2011,
    RoleNotFound = 2100,
    RolePermissionInvalid = 2101,

    DepartmentNotFound = 3000,
    DepartmentAlreadyExists = 3001,
    DepartmentInUse = 3002,
    ProgramNotFound = 3100,
    ProgramAlreadyExists = 3101,
    ProgramInUse = 3102,
    ClassNotFound = 3200,
    ClassAlreadyExists = 3201,
    ClassInUse = 3202,
    SectionNotFound = 3300,
    SectionAlreadyExists = 3301,
    SectionFull = 3302,

    TeacherNotFound = 4000,
    TeacherAlreadyExists = 4001,
    StudentNotFound = 4100,
    StudentAlreadyExists = 4101,
    StudentEnrollmentInvalid = 4102,

    TimetableNotFound = 5000,
    TimetableConflict = 5001,
    TimetableInvalidTime = 5002,
    AttendanceInvalidDate = 5100,
    AttendanceInvalidStudent = 5101,
    AttendancePermissionDenied = 5102,

    FeeNotFound = 6000,
    FeeAlreadyPaid = 6001,
    FeeOverpayment = 6002,
    FeeWaived = 6003,
    FeeHasPayments = 6004,
    FeeInvalidAmount = 6005,

    FileUploadFailed = 7000,
    ImportFileMissingColumn = 7001,
    ImportFileParseFailed = 7002,
    ImportFileDataInvalid = 7003,
    ExportFailed = 7004,
}
