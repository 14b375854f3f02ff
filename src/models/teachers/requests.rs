use crate::models::common::PaginationQuery;
use crate::models::imports::requests::ExportFormat;
use serde::Deserialize;
use ts_rs::TS;

// 教师查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub department_id: Option<i64>,
    pub search: Option<String>,
}

// 创建教师请求，同时创建登录账号
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct CreateTeacherRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub employee_id: String,
    pub department_id: Option<i64>,
    pub designation: Option<String>,
    pub qualification: Option<String>,
    pub phone: Option<String>,
    pub joining_date: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct UpdateTeacherRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub employee_id: Option<String>,
    pub department_id: Option<i64>,
    pub designation: Option<String>,
    pub qualification: Option<String>,
    pub phone: Option<String>,
    pub joining_date: Option<String>,
}

// 教师列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct TeacherListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub department_id: Option<i64>,
    pub search: Option<String>,
}

// 教师导出参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherExportParams {
    #[serde(default)]
    pub format: ExportFormat,
    pub department_id: Option<i64>,
}
