use super::entities::AttendanceStatus;
use serde::Deserialize;
use ts_rs::TS;

// 单个学生的考勤
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceMark {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

// 批量点名请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub section_id: i64,
    pub date: String,
    pub records: Vec<AttendanceMark>,
}

// 某日点名表查询
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceDateQuery {
    pub date: Option<String>,
}

// 日期区间查询，缺省为最近 30 天
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}
