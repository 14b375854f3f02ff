//! 学生档案存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students, Model};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{CollegeHubError, Result};
use crate::models::{
    PaginatedResponse,
    common::normalize_page,
    students::{
        entities::{StudentDetail, StudentStatus},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
    users::{
        entities::{UserRole, UserSummary},
        requests::{CreateUserRequest, UpdateUserRequest},
    },
};
use crate::utils::{like_any, sql::map_write_error};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SeaOrmStorage {
    async fn attach_student_users<C: ConnectionTrait>(
        conn: &C,
        models: Vec<Model>,
    ) -> Result<Vec<StudentDetail>> {
        let ids = models.iter().map(|m| m.user_id).collect();
        let users = Self::load_users_by_ids(conn, ids).await?;

        Ok(models
            .into_iter()
            .filter_map(|m| {
                let user = users.get(&m.user_id).map(UserSummary::from)?;
                Some(StudentDetail {
                    student: m.into_student(),
                    user,
                })
            })
            .collect())
    }

    async fn student_detail_on<C: ConnectionTrait>(
        conn: &C,
        model: Option<Model>,
    ) -> Result<Option<StudentDetail>> {
        match model {
            Some(m) => Ok(Self::attach_student_users(conn, vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 账号与档案在同一事务内创建
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<StudentDetail> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("开启事务失败: {e}")))?;

        let user = Self::insert_user_on(
            &txn,
            CreateUserRequest {
                username: req.username,
                email: req.email,
                password: req.password,
                role: UserRole::Student,
                display_name: blank_to_none(req.display_name),
                avatar_url: None,
            },
        )
        .await?;

        let now = Self::now();
        let model = ActiveModel {
            user_id: Set(user.id),
            roll_number: Set(req.roll_number.trim().to_string()),
            program_id: Set(req.program_id),
            class_id: Set(req.class_id),
            section_id: Set(req.section_id),
            guardian_name: Set(blank_to_none(req.guardian_name)),
            phone: Set(blank_to_none(req.phone)),
            address: Set(blank_to_none(req.address)),
            date_of_birth: Set(blank_to_none(req.date_of_birth)),
            admission_date: Set(blank_to_none(req.admission_date)),
            status: Set(StudentStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| map_write_error(e, "创建学生档案失败"))?;

        txn.commit()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(StudentDetail {
            student: model.into_student(),
            user: UserSummary::from(&user.into_user()),
        })
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<StudentDetail>> {
        let model = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询学生失败: {e}")))?;

        Self::student_detail_on(&self.db, model).await
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<StudentDetail>> {
        let model = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询学生失败: {e}")))?;

        Self::student_detail_on(&self.db, model).await
    }

    /// 按查询条件构建学生筛选
    async fn student_select(&self, query: &StudentListQuery) -> Result<Select<Students>> {
        let mut select = Students::find();

        if let Some(program_id) = query.program_id {
            select = select.filter(Column::ProgramId.eq(program_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(section_id) = query.section_id {
            select = select.filter(Column::SectionId.eq(section_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        // 搜索学号或账号的用户名、姓名
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let user_ids: Vec<i64> = Users::find()
                .select_only()
                .column(UserColumn::Id)
                .filter(UserColumn::Role.eq(UserRole::Student.as_str()))
                .filter(like_any(
                    &[UserColumn::Username, UserColumn::DisplayName],
                    search,
                ))
                .into_tuple::<i64>()
                .all(&self.db)
                .await
                .map_err(|e| {
                    CollegeHubError::database_operation(format!("搜索学生失败: {e}"))
                })?;

            select = select.filter(
                Condition::any()
                    .add(like_any(&[Column::RollNumber], search))
                    .add(Column::UserId.is_in(user_ids)),
            );
        }

        Ok(select.order_by_asc(Column::RollNumber))
    }

    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<StudentDetail>> {
        let (page, size) = normalize_page(query.page, query.size);
        let select = self.student_select(&query).await?;

        let (models, pagination) = self.fetch_page(select, page, size, "学生").await?;

        Ok(PaginatedResponse {
            items: Self::attach_student_users(&self.db, models).await?,
            pagination,
        })
    }

    pub async fn list_students_for_export_impl(
        &self,
        limit: u64,
        query: StudentListQuery,
    ) -> Result<Vec<StudentDetail>> {
        let models = self
            .student_select(&query)
            .await?
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("导出学生失败: {e}")))?;

        Self::attach_student_users(&self.db, models).await
    }

    /// 分班内的在读学生，按学号排序
    pub async fn list_students_in_section_impl(
        &self,
        section_id: i64,
    ) -> Result<Vec<StudentDetail>> {
        let models = Students::find()
            .filter(Column::SectionId.eq(section_id))
            .filter(Column::Status.eq(StudentStatus::Active.as_str()))
            .order_by_asc(Column::RollNumber)
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询分班学生失败: {e}")))?;

        Self::attach_student_users(&self.db, models).await
    }

    pub async fn list_active_student_ids_impl(
        &self,
        program_id: i64,
        class_id: Option<i64>,
    ) -> Result<Vec<i64>> {
        let mut select = Students::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::ProgramId.eq(program_id))
            .filter(Column::Status.eq(StudentStatus::Active.as_str()));
        if let Some(class_id) = class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        select
            .order_by_asc(Column::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询在读学生失败: {e}")))
    }

    /// 档案字段与账号字段在同一事务内更新
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentDetail>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Students::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询学生失败: {e}")))?
        else {
            return Ok(None);
        };

        if update.email.is_some() || update.display_name.is_some() {
            Self::update_user_on(
                &txn,
                existing.user_id,
                UpdateUserRequest {
                    email: update.email,
                    display_name: update.display_name,
                    ..Default::default()
                },
            )
            .await?;
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(Self::now()),
            ..Default::default()
        };
        if let Some(roll_number) = update.roll_number {
            model.roll_number = Set(roll_number.trim().to_string());
        }
        if let Some(program_id) = update.program_id {
            model.program_id = Set(program_id);
        }
        if let Some(class_id) = update.class_id {
            model.class_id = Set(Some(class_id));
        }
        if let Some(section_id) = update.section_id {
            model.section_id = Set(Some(section_id));
        }
        if update.guardian_name.is_some() {
            model.guardian_name = Set(blank_to_none(update.guardian_name));
        }
        if update.phone.is_some() {
            model.phone = Set(blank_to_none(update.phone));
        }
        if update.address.is_some() {
            model.address = Set(blank_to_none(update.address));
        }
        if update.date_of_birth.is_some() {
            model.date_of_birth = Set(blank_to_none(update.date_of_birth));
        }
        if update.admission_date.is_some() {
            model.admission_date = Set(blank_to_none(update.admission_date));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| map_write_error(e, "更新学生档案失败"))?;

        let detail = Self::student_detail_on(&txn, Some(updated)).await?;

        txn.commit()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(detail)
    }

    /// 删除账号，档案、考勤与学费随外键级联删除
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let Some(existing) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询学生失败: {e}")))?
        else {
            return Ok(false);
        };

        let result = Users::delete_by_id(existing.user_id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除学生失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn check_roll_numbers_exist_impl(
        &self,
        roll_numbers: &[String],
    ) -> Result<Vec<String>> {
        if roll_numbers.is_empty() {
            return Ok(Vec::new());
        }
        Students::find()
            .select_only()
            .column(Column::RollNumber)
            .filter(Column::RollNumber.is_in(roll_numbers.iter().cloned()))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("检查学号失败: {e}")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{
        classes::requests::CreateClassRequest, departments::requests::CreateDepartmentRequest,
        programs::requests::CreateProgramRequest, sections::requests::CreateSectionRequest,
    };

    /// 院系、专业、班级、分班各一个，返回 (program_id, class_id, section_id)
    pub(crate) async fn seed_academics(storage: &SeaOrmStorage) -> (i64, i64, i64) {
        let dept = storage
            .create_department_impl(CreateDepartmentRequest {
                name: "Computer Science".to_string(),
                code: "CS".to_string(),
                description: None,
                head_teacher_id: None,
            })
            .await
            .unwrap();
        let program = storage
            .create_program_impl(CreateProgramRequest {
                department_id: dept.id,
                name: "BSc Computer Science".to_string(),
                code: "BSCS".to_string(),
                duration_semesters: 8,
                fee_per_semester: 50_000,
                description: None,
            })
            .await
            .unwrap();
        let class = storage
            .create_class_impl(CreateClassRequest {
                program_id: program.id,
                name: "BSCS 2026 Fall".to_string(),
                code: "BSCS-26F".to_string(),
                semester: 1,
                academic_year: "2026-2027".to_string(),
            })
            .await
            .unwrap();
        let section = storage
            .create_section_impl(
                class.id,
                CreateSectionRequest {
                    name: "A".to_string(),
                    capacity: 40,
                    class_teacher_id: None,
                },
            )
            .await
            .unwrap();
        (program.id, class.id, section.id)
    }

    pub(crate) fn new_student(
        username: &str,
        roll_number: &str,
        (program_id, class_id, section_id): (i64, i64, i64),
    ) -> CreateStudentRequest {
        CreateStudentRequest {
            username: username.to_string(),
            email: format!("{username}@students.edu"),
            password: "hash".to_string(),
            display_name: None,
            roll_number: roll_number.to_string(),
            program_id,
            class_id: Some(class_id),
            section_id: Some(section_id),
            guardian_name: None,
            phone: None,
            address: None,
            date_of_birth: Some("2005-04-01".to_string()),
            admission_date: None,
        }
    }

    #[tokio::test]
    async fn test_student_lifecycle() {
        let storage = SeaOrmStorage::in_memory().await;
        let ids = seed_academics(&storage).await;

        let alice = storage
            .create_student_impl(new_student("alice", "CS-001", ids))
            .await
            .unwrap();
        let bob = storage
            .create_student_impl(new_student("bob", "CS-002", ids))
            .await
            .unwrap();
        assert_eq!(alice.student.status, StudentStatus::Active);

        let sections = storage.list_sections_by_class_impl(ids.1).await.unwrap();
        assert_eq!(sections[0].student_count, 2);

        storage
            .update_student_impl(
                bob.student.id,
                UpdateStudentRequest {
                    status: Some(StudentStatus::Suspended),
                    display_name: Some("Robert".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        let in_section = storage.list_students_in_section_impl(ids.2).await.unwrap();
        assert_eq!(in_section.len(), 1);
        assert_eq!(in_section[0].student.id, alice.student.id);

        let active = storage
            .list_active_student_ids_impl(ids.0, Some(ids.1))
            .await
            .unwrap();
        assert_eq!(active, vec![alice.student.id]);

        let search = storage
            .list_students_with_pagination_impl(StudentListQuery {
                search: Some("robert".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(search.items.len(), 1);
        assert_eq!(search.items[0].name(), "Robert");

        let by_roll = storage
            .list_students_with_pagination_impl(StudentListQuery {
                search: Some("CS-00".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_roll.pagination.total, 2);

        // 专业下仍有学生时数据库拒绝删除
        let err = storage.delete_program_impl(ids.0).await.unwrap_err();
        assert!(matches!(err, CollegeHubError::Conflict(_)));

        assert!(storage.delete_student_impl(alice.student.id).await.unwrap());
        assert!(
            storage
                .get_user_by_username_impl("alice")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_deleting_section_detaches_students() {
        let storage = SeaOrmStorage::in_memory().await;
        let ids = seed_academics(&storage).await;
        let alice = storage
            .create_student_impl(new_student("alice", "CS-001", ids))
            .await
            .unwrap();

        assert!(storage.delete_section_impl(ids.2).await.unwrap());

        let reloaded = storage
            .get_student_by_id_impl(alice.student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.student.section_id, None);
        assert_eq!(reloaded.student.class_id, Some(ids.1));
    }
}
