use super::entities::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceResponse {
    pub created: usize,
    pub updated: usize,
}

// 点名表中的一行，未点名时 status 为 null
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSheetRow {
    pub student_id: i64,
    pub roll_number: String,
    pub name: String,
    pub status: Option<AttendanceStatus>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSheetResponse {
    pub section_id: i64,
    pub date: String,
    pub items: Vec<AttendanceSheetRow>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StudentAttendanceResponse {
    pub student_id: i64,
    pub from: String,
    pub to: String,
    pub records: Vec<AttendanceRecord>,
    pub summary: AttendanceSummary,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceReportRow {
    pub student_id: i64,
    pub roll_number: String,
    pub name: String,
    pub summary: AttendanceSummary,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SectionAttendanceReport {
    pub section_id: i64,
    pub from: String,
    pub to: String,
    pub items: Vec<AttendanceReportRow>,
}
