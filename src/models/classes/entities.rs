use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 所属专业ID
    pub program_id: i64,
    // 班级名称
    pub name: String,
    // 班级代码
    pub code: String,
    // 当前学期
    pub semester: i32,
    // 学年，如 2025-2026
    pub academic_year: String,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
