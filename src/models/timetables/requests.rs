use super::entities::DayOfWeek;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct CreateTimetableRequest {
    pub section_id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct UpdateTimetableRequest {
    pub section_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub subject: Option<String>,
    pub day_of_week: Option<DayOfWeek>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<String>,
}

/// 存储层写入用的完整条目
#[derive(Debug, Clone)]
pub struct TimetableInput {
    pub section_id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}
