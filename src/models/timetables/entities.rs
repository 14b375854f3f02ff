//! 课表条目与冲突判定

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 星期
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

crate::impl_string_enum!(DayOfWeek {
    Monday => "monday",
    Tuesday => "tuesday",
    Wednesday => "wednesday",
    Thursday => "thursday",
    Friday => "friday",
    Saturday => "saturday",
    Sunday => "sunday",
});

// 课表条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableEntry {
    pub id: i64,
    pub section_id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub day_of_week: DayOfWeek,
    // HH:MM
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TimetableEntry {
    /// 解析后的时间段，格式异常时返回 None
    pub fn slot(&self) -> Option<(NaiveTime, NaiveTime)> {
        Some((
            parse_clock_time(&self.start_time).ok()?,
            parse_clock_time(&self.end_time).ok()?,
        ))
    }
}

// 某一天的课表
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct DaySchedule {
    pub day: DayOfWeek,
    pub entries: Vec<TimetableEntry>,
}

// 冲突类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub enum ConflictKind {
    Section,
    Teacher,
    Room,
}

crate::impl_string_enum!(ConflictKind {
    Section => "section",
    Teacher => "teacher",
    Room => "room",
});

// 冲突详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableConflict {
    pub kind: ConflictKind,
    pub entry: TimetableEntry,
}

/// 待检查的时间段
#[derive(Debug, Clone)]
pub struct SlotCandidate<'a> {
    pub exclude_id: Option<i64>,
    pub section_id: i64,
    pub teacher_id: i64,
    pub room: Option<&'a str>,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// 解析 HH:MM 时间
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| format!("时间格式无效: '{value}'，应为 HH:MM"))
}

/// 半开区间重叠，首尾相接不算冲突
pub fn overlaps(a: (NaiveTime, NaiveTime), b: (NaiveTime, NaiveTime)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// 在同一天的已有条目中查找第一个冲突
pub fn find_conflict(
    candidate: &SlotCandidate<'_>,
    same_day: &[TimetableEntry],
) -> Option<TimetableConflict> {
    let room = candidate.room.map(str::trim).filter(|r| !r.is_empty());

    for entry in same_day {
        if Some(entry.id) == candidate.exclude_id {
            continue;
        }
        let Some(slot) = entry.slot() else {
            continue;
        };
        if !overlaps((candidate.start, candidate.end), slot) {
            continue;
        }

        let kind = if entry.section_id == candidate.section_id {
            ConflictKind::Section
        } else if entry.teacher_id == candidate.teacher_id {
            ConflictKind::Teacher
        } else if room.is_some() && entry.room.as_deref().map(str::trim) == room {
            ConflictKind::Room
        } else {
            continue;
        };

        return Some(TimetableConflict {
            kind,
            entry: entry.clone(),
        });
    }

    None
}

/// 按星期分组并按开始时间排序
pub fn group_by_day(mut entries: Vec<TimetableEntry>) -> Vec<DaySchedule> {
    entries.sort_by(|a, b| {
        a.day_of_week
            .cmp(&b.day_of_week)
            .then_with(|| {
                let key = |e: &TimetableEntry| parse_clock_time(&e.start_time).ok();
                key(a).cmp(&key(b))
            })
            .then_with(|| a.start_time.cmp(&b.start_time))
    });

    let mut days: Vec<DaySchedule> = Vec::new();
    for entry in entries {
        match days.last_mut() {
            Some(day) if day.day == entry.day_of_week => day.entries.push(entry),
            _ => days.push(DaySchedule {
                day: entry.day_of_week,
                entries: vec![entry],
            }),
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        parse_clock_time(s).unwrap()
    }

    fn entry(id: i64, section: i64, teacher: i64, room: Option<&str>, start: &str, end: &str) -> TimetableEntry {
        TimetableEntry {
            id,
            section_id: section,
            teacher_id: teacher,
            subject: "Math".to_string(),
            day_of_week: DayOfWeek::Monday,
            start_time: start.to_string(),
            end_time: end.to_string(),
            room: room.map(str::to_string),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn candidate<'a>(section: i64, teacher: i64, room: Option<&'a str>, start: &str, end: &str) -> SlotCandidate<'a> {
        SlotCandidate {
            exclude_id: None,
            section_id: section,
            teacher_id: teacher,
            room,
            start: t(start),
            end: t(end),
        }
    }

    #[test]
    fn test_touching_slots_do_not_overlap() {
        assert!(!overlaps((t("09:00"), t("10:00")), (t("10:00"), t("11:00"))));
        assert!(overlaps((t("09:00"), t("10:30")), (t("10:00"), t("11:00"))));
        assert!(overlaps((t("09:00"), t("12:00")), (t("10:00"), t("11:00"))));
    }

    #[test]
    fn test_parse_clock_time() {
        assert!(parse_clock_time("08:30").is_ok());
        assert!(parse_clock_time("24:00").is_err());
        assert!(parse_clock_time("8am").is_err());
    }

    #[test]
    fn test_conflict_kinds() {
        let existing = vec![entry(1, 10, 100, Some("A-101"), "09:00", "10:00")];

        let c = find_conflict(&candidate(10, 200, None, "09:30", "10:30"), &existing).unwrap();
        assert_eq!(c.kind, ConflictKind::Section);

        let c = find_conflict(&candidate(11, 100, None, "09:30", "10:30"), &existing).unwrap();
        assert_eq!(c.kind, ConflictKind::Teacher);

        let c = find_conflict(&candidate(11, 200, Some("A-101"), "09:30", "10:30"), &existing).unwrap();
        assert_eq!(c.kind, ConflictKind::Room);
        assert_eq!(c.entry.id, 1);

        assert!(find_conflict(&candidate(11, 200, Some("B-2"), "09:30", "10:30"), &existing).is_none());
        assert!(find_conflict(&candidate(11, 200, Some(""), "09:30", "10:30"), &existing).is_none());
    }

    #[test]
    fn test_update_excludes_itself() {
        let existing = vec![entry(1, 10, 100, None, "09:00", "10:00")];
        let mut c = candidate(10, 100, None, "09:15", "10:15");
        assert!(find_conflict(&c, &existing).is_some());
        c.exclude_id = Some(1);
        assert!(find_conflict(&c, &existing).is_none());
    }

    #[test]
    fn test_group_by_day_sorts() {
        let mut e1 = entry(1, 1, 1, None, "11:00", "12:00");
        let e2 = entry(2, 1, 1, None, "08:00", "09:00");
        e1.day_of_week = DayOfWeek::Wednesday;
        let e3 = entry(3, 1, 1, None, "10:00", "11:00");

        let days = group_by_day(vec![e1, e2, e3]);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, DayOfWeek::Monday);
        assert_eq!(days[0].entries[0].id, 2);
        assert_eq!(days[0].entries[1].id, 3);
        assert_eq!(days[1].day, DayOfWeek::Wednesday);
    }

    #[test]
    fn test_group_by_day_orders_by_clock_not_text() {
        let late = entry(1, 1, 1, None, "10:00", "11:00");
        let early = entry(2, 1, 1, None, "9:00", "9:45");

        let days = group_by_day(vec![late, early]);
        let ids: Vec<_> = days[0].entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
