pub mod mark;
pub mod query;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

use crate::models::attendance::requests::{
    AttendanceDateQuery, AttendanceMark, AttendanceRangeQuery, MarkAttendanceRequest,
};
use crate::utils::validate::parse_date;

super::lazy_storage_service!(AttendanceService);

/// 未指定区间时默认回溯的天数
pub const DEFAULT_RANGE_DAYS: i64 = 30;

const MAX_REMARKS_LEN: usize = 255;

impl AttendanceService {
    pub async fn mark_attendance(
        &self,
        request: &HttpRequest,
        data: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_attendance(self, request, data).await
    }

    // 某日点名表
    pub async fn section_sheet(
        &self,
        request: &HttpRequest,
        section_id: i64,
        query: AttendanceDateQuery,
    ) -> ActixResult<HttpResponse> {
        query::section_sheet(self, request, section_id, query).await
    }

    pub async fn section_report(
        &self,
        request: &HttpRequest,
        section_id: i64,
        query: AttendanceRangeQuery,
    ) -> ActixResult<HttpResponse> {
        query::section_report(self, request, section_id, query).await
    }

    pub async fn student_attendance(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: AttendanceRangeQuery,
    ) -> ActixResult<HttpResponse> {
        query::student_attendance(self, request, student_id, query).await
    }

    pub async fn my_attendance(
        &self,
        request: &HttpRequest,
        query: AttendanceRangeQuery,
    ) -> ActixResult<HttpResponse> {
        query::my_attendance(self, request, query).await
    }
}

/// 解析查询区间，缺省为截至今天的最近 30 天
pub(crate) fn resolve_range(
    query: &AttendanceRangeQuery,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), String> {
    let to = match query.to.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(to) => parse_date(to)?,
        None => today,
    };
    let from = match query.from.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(from) => parse_date(from)?,
        None => to - Duration::days(DEFAULT_RANGE_DAYS),
    };
    if from > to {
        return Err("'from' must not be after 'to'".to_string());
    }
    Ok((from, to))
}

/// 校验点名记录：非空、学生不重复、备注长度
pub(crate) fn validate_marks(records: &[AttendanceMark]) -> Result<(), String> {
    if records.is_empty() {
        return Err("At least one attendance record is required".to_string());
    }
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.student_id) {
            return Err(format!(
                "Student {} appears more than once",
                record.student_id
            ));
        }
        if record
            .remarks
            .as_deref()
            .is_some_and(|r| r.chars().count() > MAX_REMARKS_LEN)
        {
            return Err(format!(
                "Remarks must be at most {MAX_REMARKS_LEN} characters"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn range(from: Option<&str>, to: Option<&str>) -> AttendanceRangeQuery {
        AttendanceRangeQuery {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    #[test]
    fn test_default_range_is_last_thirty_days() {
        let today = day("2026-10-17");
        let (from, to) = resolve_range(&range(None, None), today).unwrap();
        assert_eq!(to, today);
        assert_eq!(from, day("2026-09-17"));

        let (from, _) = resolve_range(&range(None, Some("2026-03-31")), today).unwrap();
        assert_eq!(from, day("2026-03-01"));
    }

    #[test]
    fn test_range_rejects_reversed_or_malformed_dates() {
        let today = day("2026-10-17");
        assert!(resolve_range(&range(Some("2026-10-10"), Some("2026-10-01")), today).is_err());
        assert!(resolve_range(&range(Some("10/01/2026"), None), today).is_err());
        assert!(resolve_range(&range(Some("2026-10-01"), Some("2026-10-01")), today).is_ok());
    }

    #[test]
    fn test_validate_marks() {
        let mark = |student_id| AttendanceMark {
            student_id,
            status: AttendanceStatus::Present,
            remarks: None,
        };
        assert!(validate_marks(&[]).is_err());
        assert!(validate_marks(&[mark(1), mark(2)]).is_ok());
        assert!(validate_marks(&[mark(1), mark(1)]).is_err());

        let mut long = mark(3);
        long.remarks = Some("x".repeat(MAX_REMARKS_LEN + 1));
        assert!(validate_marks(&[long]).is_err());
    }
}
