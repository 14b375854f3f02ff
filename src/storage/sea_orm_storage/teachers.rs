//! 教师档案存储操作

use super::SeaOrmStorage;
use crate::entity::departments::{Column as DepartmentColumn, Entity as Departments};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers, Model};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{CollegeHubError, Result};
use crate::models::{
    PaginatedResponse,
    common::normalize_page,
    teachers::{
        entities::TeacherDetail,
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
    },
    users::{
        entities::{UserRole, UserSummary},
        requests::{CreateUserRequest, UpdateUserRequest},
    },
};
use crate::utils::{like_any, sql::map_write_error};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SeaOrmStorage {
    /// 为档案批量附加账号摘要，缺失账号的档案被丢弃
    async fn attach_teacher_users<C: ConnectionTrait>(
        conn: &C,
        models: Vec<Model>,
    ) -> Result<Vec<TeacherDetail>> {
        let ids = models.iter().map(|m| m.user_id).collect();
        let users = Self::load_users_by_ids(conn, ids).await?;

        Ok(models
            .into_iter()
            .filter_map(|m| {
                let user = users.get(&m.user_id).map(UserSummary::from)?;
                Some(TeacherDetail {
                    teacher: m.into_teacher(),
                    user,
                })
            })
            .collect())
    }

    async fn teacher_detail_on<C: ConnectionTrait>(
        conn: &C,
        model: Option<Model>,
    ) -> Result<Option<TeacherDetail>> {
        match model {
            Some(m) => Ok(Self::attach_teacher_users(conn, vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 账号与档案在同一事务内创建
    pub async fn create_teacher_impl(&self, req: CreateTeacherRequest) -> Result<TeacherDetail> {
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
                role: UserRole::Teacher,
                display_name: blank_to_none(req.display_name),
                avatar_url: None,
            },
        )
        .await?;

        let now = Self::now();
        let model = ActiveModel {
            user_id: Set(user.id),
            employee_id: Set(req.employee_id.trim().to_string()),
            department_id: Set(req.department_id),
            designation: Set(blank_to_none(req.designation)),
            qualification: Set(blank_to_none(req.qualification)),
            phone: Set(blank_to_none(req.phone)),
            joining_date: Set(blank_to_none(req.joining_date)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| map_write_error(e, "创建教师档案失败"))?;

        txn.commit()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(TeacherDetail {
            teacher: model.into_teacher(),
            user: UserSummary::from(&user.into_user()),
        })
    }

    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<TeacherDetail>> {
        let model = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询教师失败: {e}")))?;

        Self::teacher_detail_on(&self.db, model).await
    }

    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<TeacherDetail>> {
        let model = Teachers::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询教师失败: {e}")))?;

        Self::teacher_detail_on(&self.db, model).await
    }

    /// 搜索同时匹配工号与账号的用户名、姓名
    async fn teacher_search_condition(&self, search: &str) -> Result<Condition> {
        let user_ids: Vec<i64> = Users::find()
            .select_only()
            .column(UserColumn::Id)
            .filter(UserColumn::Role.eq(UserRole::Teacher.as_str()))
            .filter(like_any(
                &[UserColumn::Username, UserColumn::DisplayName],
                search,
            ))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("搜索教师失败: {e}")))?;

        Ok(like_any(&[Column::EmployeeId], search).add(Column::UserId.is_in(user_ids)))
    }

    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListQuery,
    ) -> Result<PaginatedResponse<TeacherDetail>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Teachers::find();
        if let Some(department_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(self.teacher_search_condition(search).await?);
        }
        select = select.order_by_asc(Column::EmployeeId);

        let (models, pagination) = self.fetch_page(select, page, size, "教师").await?;

        Ok(PaginatedResponse {
            items: Self::attach_teacher_users(&self.db, models).await?,
            pagination,
        })
    }

    pub async fn list_teachers_for_export_impl(
        &self,
        limit: u64,
        department_id: Option<i64>,
    ) -> Result<Vec<TeacherDetail>> {
        let mut select = Teachers::find();
        if let Some(department_id) = department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }

        let models = select
            .order_by_asc(Column::EmployeeId)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("导出教师失败: {e}")))?;

        Self::attach_teacher_users(&self.db, models).await
    }

    /// 档案字段与账号字段在同一事务内更新
    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<TeacherDetail>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Teachers::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询教师失败: {e}")))?
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
        if let Some(employee_id) = update.employee_id {
            model.employee_id = Set(employee_id.trim().to_string());
        }
        if let Some(department_id) = update.department_id {
            model.department_id = Set(Some(department_id));
        }
        if update.designation.is_some() {
            model.designation = Set(blank_to_none(update.designation));
        }
        if update.qualification.is_some() {
            model.qualification = Set(blank_to_none(update.qualification));
        }
        if update.phone.is_some() {
            model.phone = Set(blank_to_none(update.phone));
        }
        if update.joining_date.is_some() {
            model.joining_date = Set(blank_to_none(update.joining_date));
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| map_write_error(e, "更新教师档案失败"))?;

        let detail = Self::teacher_detail_on(&txn, Some(updated)).await?;

        txn.commit()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(detail)
    }

    /// 删除账号，档案与课表随外键级联删除
    /// 院系负责人没有外键约束，删除教师前需手动清除
    pub(crate) async fn clear_department_head_on<C: ConnectionTrait>(
        conn: &C,
        teacher_id: i64,
    ) -> Result<()> {
        Departments::update_many()
            .col_expr(
                DepartmentColumn::HeadTeacherId,
                Expr::value(Option::<i64>::None),
            )
            .filter(DepartmentColumn::HeadTeacherId.eq(teacher_id))
            .exec(conn)
            .await
            .map_err(|e| map_write_error(e, "清除院系负责人失败"))?;
        Ok(())
    }

    pub async fn delete_teacher_impl(&self, id: i64) -> Result<bool> {
        let Some(existing) = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询教师失败: {e}")))?
        else {
            return Ok(false);
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("开启事务失败: {e}")))?;

        Self::clear_department_head_on(&txn, id).await?;

        let result = Users::delete_by_id(existing.user_id)
            .exec(&txn)
            .await
            .map_err(|e| map_write_error(e, "删除教师失败"))?;

        txn.commit()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn check_employee_ids_exist_impl(
        &self,
        employee_ids: &[String],
    ) -> Result<Vec<String>> {
        if employee_ids.is_empty() {
            return Ok(Vec::new());
        }
        Teachers::find()
            .select_only()
            .column(Column::EmployeeId)
            .filter(Column::EmployeeId.is_in(employee_ids.iter().cloned()))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("检查工号失败: {e}")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::departments::requests::{CreateDepartmentRequest, UpdateDepartmentRequest};

    pub(crate) fn new_teacher(username: &str, employee_id: &str) -> CreateTeacherRequest {
        CreateTeacherRequest {
            username: username.to_string(),
            email: format!("{username}@college.edu"),
            password: "hash".to_string(),
            display_name: Some(format!("Dr. {username}")),
            employee_id: employee_id.to_string(),
            department_id: None,
            designation: Some("Lecturer".to_string()),
            qualification: None,
            phone: Some("  ".to_string()),
            joining_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_teacher_creates_account() {
        let storage = SeaOrmStorage::in_memory().await;
        let detail = storage
            .create_teacher_impl(new_teacher("smith", "EMP001"))
            .await
            .unwrap();

        assert_eq!(detail.user.username, "smith");
        assert_eq!(detail.teacher.phone, None);

        let user = storage.get_user_by_id_impl(detail.user.id).await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Teacher);

        let by_user = storage
            .get_teacher_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_user.teacher.id, detail.teacher.id);
    }

    #[tokio::test]
    async fn test_duplicate_employee_id_rolls_back_account() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_teacher_impl(new_teacher("smith", "EMP001"))
            .await
            .unwrap();

        let err = storage
            .create_teacher_impl(new_teacher("jones", "EMP001"))
            .await
            .unwrap_err();
        assert!(matches!(err, CollegeHubError::Conflict(_)));

        // 档案插入失败时账号不应残留
        assert!(storage.get_user_by_username_impl("jones").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_search_and_delete_teacher() {
        let storage = SeaOrmStorage::in_memory().await;
        let dept = storage
            .create_department_impl(CreateDepartmentRequest {
                name: "Mathematics".to_string(),
                code: "MATH".to_string(),
                description: None,
                head_teacher_id: None,
            })
            .await
            .unwrap();

        let smith = storage
            .create_teacher_impl(new_teacher("smith", "EMP001"))
            .await
            .unwrap();
        storage
            .create_teacher_impl(new_teacher("jones", "EMP002"))
            .await
            .unwrap();

        let updated = storage
            .update_teacher_impl(
                smith.teacher.id,
                UpdateTeacherRequest {
                    display_name: Some("Prof. Smith".to_string()),
                    department_id: Some(dept.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.user.display_name.as_deref(), Some("Prof. Smith"));
        assert_eq!(updated.teacher.department_id, Some(dept.id));

        let found = storage
            .list_teachers_with_pagination_impl(TeacherListQuery {
                search: Some("prof".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);

        let by_department = storage
            .list_teachers_for_export_impl(100, Some(dept.id))
            .await
            .unwrap();
        assert_eq!(by_department.len(), 1);

        storage
            .update_department_impl(
                dept.id,
                UpdateDepartmentRequest {
                    name: None,
                    code: None,
                    description: None,
                    head_teacher_id: Some(smith.teacher.id),
                },
            )
            .await
            .unwrap();

        assert!(storage.delete_teacher_impl(smith.teacher.id).await.unwrap());
        assert!(
            storage
                .get_user_by_id_impl(smith.user.id)
                .await
                .unwrap()
                .is_none()
        );
        let dept = storage.get_department_by_id_impl(dept.id).await.unwrap().unwrap();
        assert_eq!(dept.head_teacher_id, None);

        let existing = storage
            .check_employee_ids_exist_impl(&["EMP001".to_string(), "EMP002".to_string()])
            .await
            .unwrap();
        assert_eq!(existing, vec!["EMP002".to_string()]);
    }

    #[tokio::test]
    async fn test_deleting_teacher_account_clears_department_head() {
        let storage = SeaOrmStorage::in_memory().await;
        let smith = storage
            .create_teacher_impl(new_teacher("smith", "EMP001"))
            .await
            .unwrap();
        let dept = storage
            .create_department_impl(CreateDepartmentRequest {
                name: "Physics".to_string(),
                code: "PHY".to_string(),
                description: None,
                head_teacher_id: Some(smith.teacher.id),
            })
            .await
            .unwrap();
        assert_eq!(dept.head_teacher_id, Some(smith.teacher.id));

        // 通过用户管理删除账号
        assert!(storage.delete_user_impl(smith.user.id).await.unwrap());

        assert!(
            storage
                .get_teacher_by_id_impl(smith.teacher.id)
                .await
                .unwrap()
                .is_none()
        );
        let dept = storage.get_department_by_id_impl(dept.id).await.unwrap().unwrap();
        assert_eq!(dept.head_teacher_id, None);
    }
}
