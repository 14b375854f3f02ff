//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod classes;
mod dashboard;
mod departments;
mod fees;
mod programs;
mod roles;
mod sections;
pub(crate) mod students;
pub(crate) mod teachers;
mod timetables;
mod users;

use crate::config::AppConfig;
use crate::errors::{CollegeHubError, Result};
use crate::models::PaginationInfo;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Select,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并执行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CollegeHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(if in_memory {
                SqliteJournalMode::Memory
            } else {
                SqliteJournalMode::Wal
            })
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库的数据随连接消失，连接必须常驻
        let idle_timeout = if in_memory {
            None
        } else {
            Some(Duration::from_secs(300))
        };
        let max_lifetime = if in_memory {
            None
        } else {
            Some(Duration::from_secs(1800))
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { pool_size.max(1) })
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(idle_timeout)
            .max_lifetime(max_lifetime)
            .connect_with(opt)
            .await
            .map_err(|e| CollegeHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CollegeHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CollegeHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 通用分页查询
    pub(crate) async fn fetch_page<E>(
        &self,
        select: Select<E>,
        page: u64,
        size: u64,
        what: &str,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: Sync,
    {
        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            CollegeHubError::database_operation(format!("查询{what}总数失败: {e}"))
        })?;
        let items = paginator.fetch_page(page - 1).await.map_err(|e| {
            CollegeHubError::database_operation(format!("查询{what}列表失败: {e}"))
        })?;

        let pages = total.div_ceil(size);
        Ok((items, PaginationInfo::new(page, size, total, pages)))
    }

    /// 当前 unix 秒
    pub(crate) fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    /// 服务器本地日期，用于逾期判断
    pub(crate) fn today() -> chrono::NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// 测试用内存数据库
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        Self::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory sqlite should open")
    }
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse,
    attendance::{entities::AttendanceRecord, requests::AttendanceMark},
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    dashboard::responses::DashboardStats,
    departments::{
        entities::Department,
        requests::{CreateDepartmentRequest, DepartmentListQuery, UpdateDepartmentRequest},
    },
    fees::{
        entities::{Fee, FeeStatus},
        requests::{FeeListQuery, NewFee},
    },
    programs::{
        entities::Program,
        requests::{CreateProgramRequest, ProgramListQuery, UpdateProgramRequest},
    },
    roles::{entities::Role, requests::UpdateRoleRequest},
    sections::{
        entities::{Section, SectionDetail},
        requests::{CreateSectionRequest, UpdateSectionRequest},
    },
    students::{
        entities::StudentDetail,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
    teachers::{
        entities::TeacherDetail,
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
    },
    timetables::{
        entities::{DayOfWeek, TimetableEntry},
        requests::TimetableInput,
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn check_usernames_exist(&self, usernames: &[String]) -> Result<Vec<String>> {
        self.check_usernames_exist_impl(usernames).await
    }

    async fn check_emails_exist(&self, emails: &[String]) -> Result<Vec<String>> {
        self.check_emails_exist_impl(emails).await
    }

    // 角色模块
    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.list_roles_impl().await
    }

    async fn get_role(&self, name: UserRole) -> Result<Option<Role>> {
        self.get_role_impl(name).await
    }

    async fn update_role(&self, name: UserRole, update: UpdateRoleRequest) -> Result<Option<Role>> {
        self.update_role_impl(name, update).await
    }

    async fn ensure_default_roles(&self) -> Result<usize> {
        self.ensure_default_roles_impl().await
    }

    // 院系模块
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department> {
        self.create_department_impl(req).await
    }

    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>> {
        self.get_department_by_id_impl(id).await
    }

    async fn get_department_by_code(&self, code: &str) -> Result<Option<Department>> {
        self.get_department_by_code_impl(code).await
    }

    async fn list_departments_with_pagination(
        &self,
        query: DepartmentListQuery,
    ) -> Result<PaginatedResponse<Department>> {
        self.list_departments_with_pagination_impl(query).await
    }

    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        self.update_department_impl(id, update).await
    }

    async fn delete_department(&self, id: i64) -> Result<bool> {
        self.delete_department_impl(id).await
    }

    async fn count_programs_in_department(&self, department_id: i64) -> Result<u64> {
        self.count_programs_in_department_impl(department_id).await
    }

    // 专业模块
    async fn create_program(&self, req: CreateProgramRequest) -> Result<Program> {
        self.create_program_impl(req).await
    }

    async fn get_program_by_id(&self, id: i64) -> Result<Option<Program>> {
        self.get_program_by_id_impl(id).await
    }

    async fn get_program_by_code(&self, code: &str) -> Result<Option<Program>> {
        self.get_program_by_code_impl(code).await
    }

    async fn list_programs_with_pagination(
        &self,
        query: ProgramListQuery,
    ) -> Result<PaginatedResponse<Program>> {
        self.list_programs_with_pagination_impl(query).await
    }

    async fn update_program(
        &self,
        id: i64,
        update: UpdateProgramRequest,
    ) -> Result<Option<Program>> {
        self.update_program_impl(id, update).await
    }

    async fn delete_program(&self, id: i64) -> Result<bool> {
        self.delete_program_impl(id).await
    }

    async fn count_classes_in_program(&self, program_id: i64) -> Result<u64> {
        self.count_classes_in_program_impl(program_id).await
    }

    async fn count_students_in_program(&self, program_id: i64) -> Result<u64> {
        self.count_students_in_program_impl(program_id).await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_code(&self, code: &str) -> Result<Option<Class>> {
        self.get_class_by_code_impl(code).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    // 分班模块
    async fn create_section(&self, class_id: i64, req: CreateSectionRequest) -> Result<Section> {
        self.create_section_impl(class_id, req).await
    }

    async fn get_section_by_id(&self, id: i64) -> Result<Option<Section>> {
        self.get_section_by_id_impl(id).await
    }

    async fn get_section_by_name(&self, class_id: i64, name: &str) -> Result<Option<Section>> {
        self.get_section_by_name_impl(class_id, name).await
    }

    async fn list_sections_by_class(&self, class_id: i64) -> Result<Vec<SectionDetail>> {
        self.list_sections_by_class_impl(class_id).await
    }

    async fn update_section(
        &self,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Option<Section>> {
        self.update_section_impl(id, update).await
    }

    async fn delete_section(&self, id: i64) -> Result<bool> {
        self.delete_section_impl(id).await
    }

    async fn count_students_in_section(&self, section_id: i64) -> Result<u64> {
        self.count_students_in_section_impl(section_id).await
    }

    // 教师模块
    async fn create_teacher(&self, req: CreateTeacherRequest) -> Result<TeacherDetail> {
        self.create_teacher_impl(req).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<TeacherDetail>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<TeacherDetail>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<PaginatedResponse<TeacherDetail>> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn list_teachers_for_export(
        &self,
        limit: u64,
        department_id: Option<i64>,
    ) -> Result<Vec<TeacherDetail>> {
        self.list_teachers_for_export_impl(limit, department_id)
            .await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<TeacherDetail>> {
        self.update_teacher_impl(id, update).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    async fn check_employee_ids_exist(&self, employee_ids: &[String]) -> Result<Vec<String>> {
        self.check_employee_ids_exist_impl(employee_ids).await
    }

    // 学生模块
    async fn create_student(&self, req: CreateStudentRequest) -> Result<StudentDetail> {
        self.create_student_impl(req).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentDetail>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<StudentDetail>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<StudentDetail>> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn list_students_for_export(
        &self,
        limit: u64,
        query: StudentListQuery,
    ) -> Result<Vec<StudentDetail>> {
        self.list_students_for_export_impl(limit, query).await
    }

    async fn list_students_in_section(&self, section_id: i64) -> Result<Vec<StudentDetail>> {
        self.list_students_in_section_impl(section_id).await
    }

    async fn list_active_student_ids(
        &self,
        program_id: i64,
        class_id: Option<i64>,
    ) -> Result<Vec<i64>> {
        self.list_active_student_ids_impl(program_id, class_id)
            .await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentDetail>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn check_roll_numbers_exist(&self, roll_numbers: &[String]) -> Result<Vec<String>> {
        self.check_roll_numbers_exist_impl(roll_numbers).await
    }

    // 课表模块
    async fn create_timetable(&self, input: TimetableInput) -> Result<TimetableEntry> {
        self.create_timetable_impl(input).await
    }

    async fn get_timetable_by_id(&self, id: i64) -> Result<Option<TimetableEntry>> {
        self.get_timetable_by_id_impl(id).await
    }

    async fn update_timetable(
        &self,
        id: i64,
        input: TimetableInput,
    ) -> Result<Option<TimetableEntry>> {
        self.update_timetable_impl(id, input).await
    }

    async fn delete_timetable(&self, id: i64) -> Result<bool> {
        self.delete_timetable_impl(id).await
    }

    async fn list_timetable_candidates(
        &self,
        day: DayOfWeek,
        section_id: i64,
        teacher_id: i64,
        room: Option<&str>,
    ) -> Result<Vec<TimetableEntry>> {
        self.list_timetable_candidates_impl(day, section_id, teacher_id, room)
            .await
    }

    async fn list_timetable_by_section(&self, section_id: i64) -> Result<Vec<TimetableEntry>> {
        self.list_timetable_by_section_impl(section_id).await
    }

    async fn list_timetable_by_teacher(&self, teacher_id: i64) -> Result<Vec<TimetableEntry>> {
        self.list_timetable_by_teacher_impl(teacher_id).await
    }

    async fn teacher_teaches_section(&self, teacher_id: i64, section_id: i64) -> Result<bool> {
        self.teacher_teaches_section_impl(teacher_id, section_id)
            .await
    }

    // 考勤模块
    async fn upsert_attendance(
        &self,
        section_id: i64,
        date: &str,
        marked_by: i64,
        records: Vec<AttendanceMark>,
    ) -> Result<(usize, usize)> {
        self.upsert_attendance_impl(section_id, date, marked_by, records)
            .await
    }

    async fn list_attendance_by_section_date(
        &self,
        section_id: i64,
        date: &str,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_by_section_date_impl(section_id, date)
            .await
    }

    async fn list_attendance_by_section_range(
        &self,
        section_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_by_section_range_impl(section_id, from, to)
            .await
    }

    async fn list_attendance_by_student(
        &self,
        student_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_by_student_impl(student_id, from, to)
            .await
    }

    // 学费模块
    async fn generate_fees(&self, fees: Vec<NewFee>) -> Result<(usize, usize)> {
        self.generate_fees_impl(fees).await
    }

    async fn get_fee_by_id(&self, id: i64) -> Result<Option<Fee>> {
        self.get_fee_by_id_impl(id).await
    }

    async fn list_fees_with_pagination(
        &self,
        query: FeeListQuery,
    ) -> Result<PaginatedResponse<Fee>> {
        self.list_fees_with_pagination_impl(query).await
    }

    async fn list_fees_by_student(&self, student_id: i64) -> Result<Vec<Fee>> {
        self.list_fees_by_student_impl(student_id).await
    }

    async fn apply_fee_payment(
        &self,
        id: i64,
        expected_paid: i64,
        new_paid: i64,
        status: FeeStatus,
        remarks: Option<String>,
    ) -> Result<Option<Fee>> {
        self.apply_fee_payment_impl(id, expected_paid, new_paid, status, remarks)
            .await
    }

    async fn waive_fee(&self, id: i64, remarks: Option<String>) -> Result<Option<Fee>> {
        self.waive_fee_impl(id, remarks).await
    }

    async fn delete_fee(&self, id: i64) -> Result<bool> {
        self.delete_fee_impl(id).await
    }

    // 仪表盘
    async fn dashboard_stats(&self, today: &str) -> Result<DashboardStats> {
        self.dashboard_stats_impl(today).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("collegehub.db").unwrap(),
            "sqlite://collegehub.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[tokio::test]
    async fn test_in_memory_migrates_and_seeds_roles() {
        let storage = SeaOrmStorage::in_memory().await;
        assert_eq!(storage.ensure_default_roles().await.unwrap(), 4);
        assert_eq!(storage.ensure_default_roles().await.unwrap(), 0);
        assert_eq!(storage.count_users().await.unwrap(), 0);
    }
}
