//! 分馆存储操作

use super::SeaOrmStorage;
use crate::entity::branches::{ActiveModel, Column, Entity as Branches};
use crate::errors::{DojoError, Result};
use crate::models::branches::{
    entities::Branch,
    requests::{CreateBranchRequest, UpdateBranchRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建分馆
    pub async fn create_branch_impl(&self, req: CreateBranchRequest) -> Result<Branch> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            address: Set(req.address),
            phone: Set(req.phone),
            email: Set(req.email),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("创建分馆失败: {e}")))?;

        Ok(result.into_branch())
    }

    pub async fn get_branch_by_id_impl(&self, id: i64) -> Result<Option<Branch>> {
        let result = Branches::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询分馆失败: {e}")))?;

        Ok(result.map(|m| m.into_branch()))
    }

    pub async fn get_branch_by_name_impl(&self, name: &str) -> Result<Option<Branch>> {
        let result = Branches::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询分馆失败: {e}")))?;

        Ok(result.map(|m| m.into_branch()))
    }

    /// 列出全部分馆（按名称排序）
    pub async fn list_branches_impl(&self) -> Result<Vec<Branch>> {
        let result = Branches::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询分馆列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_branch()).collect())
    }

    /// 更新分馆信息
    pub async fn update_branch_impl(
        &self,
        id: i64,
        update: UpdateBranchRequest,
    ) -> Result<Option<Branch>> {
        if self.get_branch_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("更新分馆失败: {e}")))?;

        self.get_branch_by_id_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::branches::requests::{CreateBranchRequest, UpdateBranchRequest};

    #[tokio::test]
    async fn test_create_list_update() {
        let storage = memory_storage().await;
        for name in ["Westside", "Central"] {
            storage
                .create_branch_impl(CreateBranchRequest {
                    name: name.to_string(),
                    address: None,
                    phone: None,
                    email: None,
                })
                .await
                .unwrap();
        }

        let branches = storage.list_branches_impl().await.unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].name, "Central");

        let updated = storage
            .update_branch_impl(
                branches[0].id,
                UpdateBranchRequest {
                    name: None,
                    address: Some("1 Main St".to_string()),
                    phone: None,
                    email: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Central");
        assert_eq!(updated.address.as_deref(), Some("1 Main St"));

        assert!(
            storage
                .update_branch_impl(999, UpdateBranchRequest {
                    name: Some("Ghost".to_string()),
                    address: None,
                    phone: None,
                    email: None,
                })
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let storage = memory_storage().await;
        let req = || CreateBranchRequest {
            name: "Central".to_string(),
            address: None,
            phone: None,
            email: None,
        };
        storage.create_branch_impl(req()).await.unwrap();
        assert!(storage.create_branch_impl(req()).await.is_err());
    }
}
