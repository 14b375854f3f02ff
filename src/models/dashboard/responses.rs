use serde::Serialize;
use ts_rs::TS;

// 当日出勤计数
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct AttendanceCounts {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
}

// 学费汇总（单位：分）
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct FeeTotals {
    pub billed: i64,
    pub collected: i64,
    pub outstanding: i64,
    pub overdue_count: i64,
}

#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardStats {
    pub active_students: i64,
    pub teachers: i64,
    pub departments: i64,
    pub programs: i64,
    pub classes: i64,
    pub sections: i64,
    pub attendance_today: AttendanceCounts,
    pub fees: FeeTotals,
}
