use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分班（行政班下的教学班）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct Section {
    pub id: i64,
    pub class_id: i64,
    pub name: String,
    pub capacity: i32,
    // 班主任（教师档案ID）
    pub class_teacher_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 分班详情：附带当前人数
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct SectionDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub section: Section,
    pub student_count: i64,
}
