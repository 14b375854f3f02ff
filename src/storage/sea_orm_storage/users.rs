use super::SeaOrmStorage;
use crate::entity::teachers::{Column as TeacherColumn, Entity as Teachers};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{CollegeHubError, Result};
use crate::models::{
    common::normalize_page,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::{like_any, sql::map_write_error};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 在给定连接（或事务）上插入用户
    pub(crate) async fn insert_user_on<C: ConnectionTrait>(
        conn: &C,
        req: CreateUserRequest,
    ) -> Result<crate::entity::users::Model> {
        let now = Self::now();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            avatar_url: Set(req.avatar_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| map_write_error(e, "创建用户失败"))
    }

    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        Ok(Self::insert_user_on(&self.db, req).await?.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(like_any(
                &[Column::Username, Column::Email, Column::DisplayName],
                search,
            ));
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (users, pagination) = self.fetch_page(select, page, size, "用户").await?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination,
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = Self::now();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                CollegeHubError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 在给定连接上更新账号字段，返回是否存在
    pub(crate) async fn update_user_on<C: ConnectionTrait>(
        conn: &C,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<bool> {
        let exists = Users::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询用户失败: {e}")))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(Self::now()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name).filter(|s| !s.trim().is_empty()));
        }

        if let Some(avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url).filter(|s| !s.trim().is_empty()));
        }

        model
            .update(conn)
            .await
            .map_err(|e| map_write_error(e, "更新用户失败"))?;

        Ok(true)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if !Self::update_user_on(&self.db, id, update).await? {
            return Ok(None);
        }
        self.get_user_by_id_impl(id).await
    }

    /// 删除用户，师生档案随外键级联删除
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let teacher = Teachers::find()
            .filter(TeacherColumn::UserId.eq(id))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询教师失败: {e}")))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("开启事务失败: {e}")))?;

        if let Some(teacher) = teacher {
            Self::clear_department_head_on(&txn, teacher.id).await?;
        }

        let result = Users::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| map_write_error(e, "删除用户失败"))?;

        txn.commit()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    /// 批量检查已存在的用户名
    pub async fn check_usernames_exist_impl(&self, usernames: &[String]) -> Result<Vec<String>> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }
        Users::find()
            .select_only()
            .column(Column::Username)
            .filter(Column::Username.is_in(usernames.iter().cloned()))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("检查用户名失败: {e}")))
    }

    /// 批量检查已存在的邮箱
    pub async fn check_emails_exist_impl(&self, emails: &[String]) -> Result<Vec<String>> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }
        Users::find()
            .select_only()
            .column(Column::Email)
            .filter(Column::Email.is_in(emails.iter().cloned()))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("检查邮箱失败: {e}")))
    }

    /// 按 ID 批量加载用户
    pub(crate) async fn load_users_by_ids<C: ConnectionTrait>(
        conn: &C,
        ids: Vec<i64>,
    ) -> Result<std::collections::HashMap<i64, User>> {
        if ids.is_empty() {
            return Ok(Default::default());
        }
        let users = Users::find()
            .filter(Column::Id.is_in(ids))
            .all(conn)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(users
            .into_iter()
            .map(|m| (m.id, m.into_user()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn new_user(username: &str, email: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            role,
            display_name: None,
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage
            .create_user_impl(new_user("alice01", "alice@x.io", UserRole::Staff))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Staff);
        let by_email = storage
            .get_user_by_username_or_email_impl("alice@x.io")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_user_impl(new_user("alice01", "a@x.io", UserRole::Admin))
            .await
            .unwrap();
        let err = storage
            .create_user_impl(new_user("alice01", "b@x.io", UserRole::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, CollegeHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_existing_checks() {
        let storage = SeaOrmStorage::in_memory().await;
        for (name, role) in [
            ("teacher1", UserRole::Teacher),
            ("teacher2", UserRole::Teacher),
            ("student1", UserRole::Student),
        ] {
            storage
                .create_user_impl(new_user(name, &format!("{name}@x.io"), role))
                .await
                .unwrap();
        }

        let list = storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Teacher),
                size: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 2);
        assert_eq!(list.pagination.total_pages, 2);
        assert_eq!(list.items.len(), 1);

        let search = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("dent".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(search.items.len(), 1);

        let existing = storage
            .check_usernames_exist_impl(&["teacher1".to_string(), "nobody".to_string()])
            .await
            .unwrap();
        assert_eq!(existing, vec!["teacher1".to_string()]);
    }
}
