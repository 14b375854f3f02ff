use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 专业（学位项目）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/program.ts")]
pub struct Program {
    pub id: i64,
    pub department_id: i64,
    pub name: String,
    pub code: String,
    // 学制（学期数）
    pub duration_semesters: i32,
    // 每学期学费（以分为单位）
    pub fee_per_semester: i64,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
