//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{DojoError, Result};
use crate::models::{
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建通知
    pub async fn create_notification_impl(
        &self,
        req: CreateNotificationRequest,
    ) -> Result<Notification> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            notification_type: Set(req.notification_type),
            title: Set(req.title),
            content: Set(req.content),
            reference_type: Set(req.reference_type),
            reference_id: Set(req.reference_id),
            is_read: Set(false),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("创建通知失败: {e}")))?;

        Ok(result.into_notification())
    }

    /// 通过 ID 获取通知
    pub async fn get_notification_by_id_impl(
        &self,
        notification_id: i64,
    ) -> Result<Option<Notification>> {
        let result = Notifications::find_by_id(notification_id)
            .one(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询通知失败: {e}")))?;

        Ok(result.map(|m| m.into_notification()))
    }

    /// 列出用户通知（分页）
    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));
        if query.unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        let (rows, pagination) = self
            .fetch_page(
                select.order_by_desc(Column::CreatedAt),
                query.pagination.page,
                query.pagination.size,
                "通知",
            )
            .await?;

        Ok(NotificationListResponse {
            items: rows.into_iter().map(|m| m.into_notification()).collect(),
            pagination,
        })
    }

    /// 获取用户未读通知数量
    pub async fn get_unread_notification_count_impl(&self, user_id: i64) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询未读通知数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 标记通知为已读
    pub async fn mark_notification_as_read_impl(&self, notification_id: i64) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(notification_id))
            .exec(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::PaginationQuery;
    use crate::models::notifications::requests::{
        CreateNotificationRequest, NotificationListQuery,
    };
    use crate::models::users::entities::UserRole;

    fn notice(user_id: i64, title: &str) -> CreateNotificationRequest {
        CreateNotificationRequest {
            user_id,
            notification_type: "grading_recorded".to_string(),
            title: title.to_string(),
            content: None,
            reference_type: Some("grading".to_string()),
            reference_id: Some(1),
        }
    }

    #[tokio::test]
    async fn test_unread_count_and_mark_read() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "kid", UserRole::Student).await;

        let first = storage
            .create_notification_impl(notice(user.id, "Promoted to Yellow"))
            .await
            .unwrap();
        storage
            .create_notification_impl(notice(user.id, "Promoted to Orange"))
            .await
            .unwrap();
        assert_eq!(
            storage
                .get_unread_notification_count_impl(user.id)
                .await
                .unwrap(),
            2
        );

        assert!(storage.mark_notification_as_read_impl(first.id).await.unwrap());
        assert_eq!(
            storage
                .get_unread_notification_count_impl(user.id)
                .await
                .unwrap(),
            1
        );

        let unread = storage
            .list_notifications_with_pagination_impl(
                user.id,
                NotificationListQuery {
                    pagination: PaginationQuery::default(),
                    unread_only: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(unread.items.len(), 1);
        assert_eq!(unread.items[0].title, "Promoted to Orange");
    }
}
