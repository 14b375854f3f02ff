use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;

// 权限点
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/role.ts")]
pub enum Permission {
    #[serde(rename = "academics:manage")]
    AcademicsManage,
    #[serde(rename = "teachers:manage")]
    TeachersManage,
    #[serde(rename = "students:manage")]
    StudentsManage,
    #[serde(rename = "timetable:manage")]
    TimetableManage,
    #[serde(rename = "attendance:mark")]
    AttendanceMark,
    #[serde(rename = "attendance:view")]
    AttendanceView,
    #[serde(rename = "fees:manage")]
    FeesManage,
    #[serde(rename = "fees:collect")]
    FeesCollect,
    #[serde(rename = "dashboard:view")]
    DashboardView,
}

crate::impl_string_enum!(Permission {
    AcademicsManage => "academics:manage",
    TeachersManage => "teachers:manage",
    StudentsManage => "students:manage",
    TimetableManage => "timetable:manage",
    AttendanceMark => "attendance:mark",
    AttendanceView => "attendance:view",
    FeesManage => "fees:manage",
    FeesCollect => "fees:collect",
    DashboardView => "dashboard:view",
});

impl Permission {
    /// 内置角色的默认权限
    pub fn defaults_for(role: UserRole) -> Vec<Permission> {
        match role {
            UserRole::Admin => Permission::ALL.to_vec(),
            UserRole::Staff => vec![
                Permission::StudentsManage,
                Permission::AttendanceView,
                Permission::FeesManage,
                Permission::FeesCollect,
                Permission::DashboardView,
            ],
            UserRole::Teacher => vec![Permission::AttendanceMark, Permission::AttendanceView],
            UserRole::Student => vec![],
        }
    }
}

// 角色实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/role.ts")]
pub struct Role {
    pub id: i64,
    pub name: UserRole,
    pub display_name: String,
    pub description: Option<String>,
    pub permissions: Vec<Permission>,
    pub is_system: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Role {
    /// 管理员始终拥有全部权限
    pub fn allows(&self, permission: Permission) -> bool {
        self.name == UserRole::Admin || self.permissions.contains(&permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: UserRole, permissions: Vec<Permission>) -> Role {
        Role {
            id: 1,
            name,
            display_name: name.to_string(),
            description: None,
            permissions,
            is_system: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_admin_allows_everything() {
        let admin = role(UserRole::Admin, vec![]);
        for p in Permission::ALL {
            assert!(admin.allows(*p));
        }
    }

    #[test]
    fn test_teacher_defaults() {
        let teacher = role(UserRole::Teacher, Permission::defaults_for(UserRole::Teacher));
        assert!(teacher.allows(Permission::AttendanceMark));
        assert!(!teacher.allows(Permission::FeesCollect));
    }

    #[test]
    fn test_permission_strings() {
        assert_eq!(
            serde_json::to_string(&Permission::FeesCollect).unwrap(),
            "\"fees:collect\""
        );
        assert_eq!(
            "timetable:manage".parse::<Permission>().unwrap(),
            Permission::TimetableManage
        );
        assert!(
            serde_json::from_str::<Vec<Permission>>(r#"["fees:manage","nope"]"#).is_err()
        );
    }
}
