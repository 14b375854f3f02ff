use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（密码需已哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 批量检查已存在的用户名 / 邮箱
    async fn check_usernames_exist(&self, usernames: &[String]) -> Result<Vec<String>>;
    async fn check_emails_exist(&self, emails: &[String]) -> Result<Vec<String>>;

    /// 角色权限
    async fn list_roles(&self) -> Result<Vec<Role>>;
    async fn get_role(&self, name: UserRole) -> Result<Option<Role>>;
    async fn update_role(&self, name: UserRole, update: UpdateRoleRequest) -> Result<Option<Role>>;
    // 补齐缺失的内置角色，返回新建数量
    async fn ensure_default_roles(&self) -> Result<usize>;

    /// 院系
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department>;
    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>>;
    async fn get_department_by_code(&self, code: &str) -> Result<Option<Department>>;
    async fn list_departments_with_pagination(
        &self,
        query: DepartmentListQuery,
    ) -> Result<PaginatedResponse<Department>>;
    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>>;
    async fn delete_department(&self, id: i64) -> Result<bool>;
    async fn count_programs_in_department(&self, department_id: i64) -> Result<u64>;

    /// 专业
    async fn create_program(&self, req: CreateProgramRequest) -> Result<Program>;
    async fn get_program_by_id(&self, id: i64) -> Result<Option<Program>>;
    async fn get_program_by_code(&self, code: &str) -> Result<Option<Program>>;
    async fn list_programs_with_pagination(
        &self,
        query: ProgramListQuery,
    ) -> Result<PaginatedResponse<Program>>;
    async fn update_program(
        &self,
        id: i64,
        update: UpdateProgramRequest,
    ) -> Result<Option<Program>>;
    async fn delete_program(&self, id: i64) -> Result<bool>;
    async fn count_classes_in_program(&self, program_id: i64) -> Result<u64>;
    async fn count_students_in_program(&self, program_id: i64) -> Result<u64>;

    /// 班级
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn get_class_by_code(&self, code: &str) -> Result<Option<Class>>;
    async fn list_classes_with_pagination(&self, query: ClassListQuery)
    -> Result<ClassListResponse>;
    async fn update_class(&self, class_id: i64, update: UpdateClassRequest)
    -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 分班
    async fn create_section(&self, class_id: i64, req: CreateSectionRequest) -> Result<Section>;
    async fn get_section_by_id(&self, id: i64) -> Result<Option<Section>>;
    async fn get_section_by_name(&self, class_id: i64, name: &str) -> Result<Option<Section>>;
    async fn list_sections_by_class(&self, class_id: i64) -> Result<Vec<SectionDetail>>;
    async fn update_section(
        &self,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Option<Section>>;
    async fn delete_section(&self, id: i64) -> Result<bool>;
    async fn count_students_in_section(&self, section_id: i64) -> Result<u64>;

    /// 教师档案
    // 在同一事务中创建账号与档案（密码需已哈希）
    async fn create_teacher(&self, req: CreateTeacherRequest) -> Result<TeacherDetail>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<TeacherDetail>>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<TeacherDetail>>;
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<PaginatedResponse<TeacherDetail>>;
    async fn list_teachers_for_export(
        &self,
        limit: u64,
        department_id: Option<i64>,
    ) -> Result<Vec<TeacherDetail>>;
    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<TeacherDetail>>;
    // 删除档案及其账号
    async fn delete_teacher(&self, id: i64) -> Result<bool>;
    async fn check_employee_ids_exist(&self, employee_ids: &[String]) -> Result<Vec<String>>;

    /// 学生档案
    // 在同一事务中创建账号与档案（密码需已哈希）
    async fn create_student(&self, req: CreateStudentRequest) -> Result<StudentDetail>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentDetail>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<StudentDetail>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<StudentDetail>>;
    async fn list_students_for_export(
        &self,
        limit: u64,
        query: StudentListQuery,
    ) -> Result<Vec<StudentDetail>>;
    async fn list_students_in_section(&self, section_id: i64) -> Result<Vec<StudentDetail>>;
    // 专业（可限定班级）下的在读学生 ID
    async fn list_active_student_ids(
        &self,
        program_id: i64,
        class_id: Option<i64>,
    ) -> Result<Vec<i64>>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentDetail>>;
    // 删除档案及其账号
    async fn delete_student(&self, id: i64) -> Result<bool>;
    async fn check_roll_numbers_exist(&self, roll_numbers: &[String]) -> Result<Vec<String>>;

    /// 课表
    async fn create_timetable(&self, input: TimetableInput) -> Result<TimetableEntry>;
    async fn get_timetable_by_id(&self, id: i64) -> Result<Option<TimetableEntry>>;
    async fn update_timetable(
        &self,
        id: i64,
        input: TimetableInput,
    ) -> Result<Option<TimetableEntry>>;
    async fn delete_timetable(&self, id: i64) -> Result<bool>;
    // 同一天内与分班、教师或教室相关的条目，用于冲突检查
    async fn list_timetable_candidates(
        &self,
        day: DayOfWeek,
        section_id: i64,
        teacher_id: i64,
        room: Option<&str>,
    ) -> Result<Vec<TimetableEntry>>;
    async fn list_timetable_by_section(&self, section_id: i64) -> Result<Vec<TimetableEntry>>;
    async fn list_timetable_by_teacher(&self, teacher_id: i64) -> Result<Vec<TimetableEntry>>;
    // 教师是否为该分班班主任或在其课表中
    async fn teacher_teaches_section(&self, teacher_id: i64, section_id: i64) -> Result<bool>;

    /// 考勤
    // 按 (学生, 日期) 覆盖写入，返回 (新建数, 更新数)
    async fn upsert_attendance(
        &self,
        section_id: i64,
        date: &str,
        marked_by: i64,
        records: Vec<AttendanceMark>,
    ) -> Result<(usize, usize)>;
    async fn list_attendance_by_section_date(
        &self,
        section_id: i64,
        date: &str,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn list_attendance_by_section_range(
        &self,
        section_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn list_attendance_by_student(
        &self,
        student_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<AttendanceRecord>>;

    /// 学费
    // 批量生成，已存在同名学费的学生跳过，返回 (新建数, 跳过数)
    async fn generate_fees(&self, fees: Vec<NewFee>) -> Result<(usize, usize)>;
    async fn get_fee_by_id(&self, id: i64) -> Result<Option<Fee>>;
    async fn list_fees_with_pagination(&self, query: FeeListQuery)
    -> Result<PaginatedResponse<Fee>>;
    async fn list_fees_by_student(&self, student_id: i64) -> Result<Vec<Fee>>;
    // 以 expected_paid 为乐观锁记录缴费；返回 None 表示记录已被并发修改
    async fn apply_fee_payment(
        &self,
        id: i64,
        expected_paid: i64,
        new_paid: i64,
        status: FeeStatus,
        remarks: Option<String>,
    ) -> Result<Option<Fee>>;
    async fn waive_fee(&self, id: i64, remarks: Option<String>) -> Result<Option<Fee>>;
    async fn delete_fee(&self, id: i64) -> Result<bool>;

    /// 仪表盘
    async fn dashboard_stats(&self, today: &str) -> Result<DashboardStats>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
