use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserSummary;

// 学籍状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum StudentStatus {
    Active,    // 在读
    Graduated, // 毕业
    Suspended, // 休学
    Withdrawn, // 退学
}

crate::impl_string_enum!(StudentStatus {
    Active => "active",
    Graduated => "graduated",
    Suspended => "suspended",
    Withdrawn => "withdrawn",
});

// 学生档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
    // 学号
    pub roll_number: String,
    pub program_id: i64,
    pub class_id: Option<i64>,
    pub section_id: Option<i64>,
    pub guardian_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub admission_date: Option<String>,
    pub status: StudentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生详情：附带账号信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub student: Student,
    pub user: UserSummary,
}

impl StudentDetail {
    pub fn name(&self) -> &str {
        self.user
            .display_name
            .as_deref()
            .unwrap_or(&self.user.username)
    }
}
