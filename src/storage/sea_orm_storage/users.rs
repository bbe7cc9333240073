//! 用户存储操作

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{DojoError, Result};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::{CreateUserRequest, UserListQuery},
    responses::UserListResponse,
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 新账号一律为 active；`req.password` 此时已是哈希
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let inserted = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            phone: Set(req.phone),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| DojoError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(inserted.into_user())
    }

    async fn find_user(&self, condition: Condition) -> Result<Option<User>> {
        Users::find()
            .filter(condition)
            .one(&self.db)
            .await
            .map(|found| found.map(|m| m.into_user()))
            .map_err(|e| DojoError::database_operation(format!("查询用户失败: {e}")))
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Id.eq(id))).await
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Username.eq(username)))
            .await
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Email.eq(email))).await
    }

    /// 登录时使用：标识既可以是用户名也可以是邮箱
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        self.find_user(
            Condition::any()
                .add(Column::Username.eq(identifier))
                .add(Column::Email.eq(identifier)),
        )
        .await
    }

    /// 最近注册的在前
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let mut select = Users::find();

        if let Some(term) = query.search.as_deref().map(str::trim)
            && !term.is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(like_contains(Column::Username, term))
                    .add(like_contains(Column::Email, term))
                    .add(like_contains(Column::DisplayName, term))
                    .add(like_contains(Column::Phone, term)),
            );
        }
        if let Some(role) = &query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }
        if let Some(status) = &query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let (rows, pagination) = self
            .fetch_page(
                select.order_by_desc(Column::CreatedAt),
                query.page.unwrap_or(1),
                query.size.unwrap_or(10),
                "用户",
            )
            .await?;

        Ok(UserListResponse {
            items: rows.into_iter().map(|m| m.into_user()).collect(),
            pagination,
        })
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map(|res| res.rows_affected > 0)
            .map_err(|e| DojoError::database_operation(format!("更新最后登录时间失败: {e}")))
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("统计用户数量失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::users::{entities::UserRole, requests::UserListQuery};

    #[tokio::test]
    async fn test_lookup_by_username_or_email() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "sensei", UserRole::Instructor).await;

        let by_name = storage
            .get_user_by_username_or_email_impl("sensei")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, user.id);
        assert_eq!(by_name.role, UserRole::Instructor);

        let by_email = storage
            .get_user_by_username_or_email_impl("sensei@dojo.test")
            .await
            .unwrap();
        assert!(by_email.is_some());
        assert!(storage.get_user_by_username_impl("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_role() {
        let storage = memory_storage().await;
        seed_user(&storage, "admin", UserRole::Admin).await;
        seed_user(&storage, "coach", UserRole::Instructor).await;
        seed_user(&storage, "kid", UserRole::Student).await;
        assert_eq!(storage.count_users_impl().await.unwrap(), 3);

        let result = storage
            .list_users_with_pagination_impl(UserListQuery {
                page: Some(1),
                size: Some(10),
                role: Some(UserRole::Instructor),
                status: None,
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(result.pagination.total, 1);
        assert_eq!(result.items[0].username, "coach");
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "kid", UserRole::Student).await;
        assert!(user.last_login.is_none());

        assert!(storage.update_last_login_impl(user.id).await.unwrap());
        let user = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert!(user.last_login.is_some());
    }
}
