use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/program.ts")]
pub struct ProgramQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub department_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/program.ts")]
pub struct CreateProgramRequest {
    pub department_id: i64,
    pub name: String,
    pub code: String,
    pub duration_semesters: i32,
    #[serde(default)]
    pub fee_per_semester: i64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/program.ts")]
pub struct UpdateProgramRequest {
    pub department_id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub duration_semesters: Option<i32>,
    pub fee_per_semester: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProgramListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub department_id: Option<i64>,
    pub search: Option<String>,
}
