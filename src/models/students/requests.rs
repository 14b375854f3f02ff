use super::entities::StudentStatus;
use crate::models::common::PaginationQuery;
use crate::models::imports::requests::ExportFormat;
use serde::Deserialize;
use ts_rs::TS;

// 学生查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub program_id: Option<i64>,
    pub class_id: Option<i64>,
    pub section_id: Option<i64>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

// 创建学生请求，同时创建登录账号
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub roll_number: String,
    pub program_id: i64,
    pub class_id: Option<i64>,
    pub section_id: Option<i64>,
    pub guardian_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub admission_date: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub roll_number: Option<String>,
    pub program_id: Option<i64>,
    pub class_id: Option<i64>,
    pub section_id: Option<i64>,
    pub guardian_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub admission_date: Option<String>,
    pub status: Option<StudentStatus>,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub program_id: Option<i64>,
    pub class_id: Option<i64>,
    pub section_id: Option<i64>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

// 学生导出参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentExportParams {
    #[serde(default)]
    pub format: ExportFormat,
    pub program_id: Option<i64>,
    pub class_id: Option<i64>,
    pub section_id: Option<i64>,
    pub status: Option<StudentStatus>,
}
