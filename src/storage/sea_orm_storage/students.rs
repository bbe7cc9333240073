//! 学员存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{DojoError, Result};
use crate::grading::BeltLevel;
use crate::models::{
    students::{
        entities::{Student, StudentStatus},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建学员
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now();
        let belt = req.current_belt.unwrap_or(BeltLevel::White);
        let joined_at = req
            .joined_at
            .unwrap_or_else(|| now.date_naive().format("%Y-%m-%d").to_string());

        let model = ActiveModel {
            branch_id: Set(req.branch_id),
            user_id: Set(req.user_id),
            full_name: Set(req.full_name),
            email: Set(req.email),
            phone: Set(req.phone),
            date_of_birth: Set(req.date_of_birth),
            current_belt: Set(belt.name().to_string()),
            status: Set(StudentStatus::Active.to_string()),
            joined_at: Set(joined_at),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("创建学员失败: {e}")))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询学员失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学员
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let mut select = Students::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(like_contains(Column::FullName, term))
                    .add(like_contains(Column::Email, term))
                    .add(like_contains(Column::Phone, term)),
            );
        }

        if let Some(branch_id) = query.branch_id {
            select = select.filter(Column::BranchId.eq(branch_id));
        }

        if let Some(belt) = query.belt {
            select = select.filter(Column::CurrentBelt.eq(belt.name()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let (rows, pagination) = self
            .fetch_page(
                select.order_by_asc(Column::FullName),
                query.page.unwrap_or(1),
                query.size.unwrap_or(20),
                "学员",
            )
            .await?;

        Ok(StudentListResponse {
            items: rows.into_iter().map(|m| m.into_student()).collect(),
            pagination,
        })
    }

    /// 更新学员资料（腰带除外）
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(branch_id) = update.branch_id {
            model.branch_id = Set(branch_id);
        }
        if let Some(full_name) = update.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("更新学员失败: {e}")))?;

        self.get_student_by_id_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_student};
    use crate::grading::BeltLevel;
    use crate::models::students::{
        entities::StudentStatus,
        requests::{StudentListQuery, UpdateStudentRequest},
    };

    #[tokio::test]
    async fn test_new_student_starts_at_white() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Aiko Tanaka", None).await;
        assert_eq!(student.current_belt, "White");
        assert_eq!(student.belt_level(), Some(BeltLevel::White));
        assert_eq!(student.status, StudentStatus::Active);
        assert_eq!(student.joined_at, "2024-01-10");
    }

    #[tokio::test]
    async fn test_list_filters() {
        let storage = memory_storage().await;
        let aiko = seed_student(&storage, "Aiko Tanaka", None).await;
        seed_student(&storage, "Ben Carter", None).await;

        storage
            .update_student_impl(
                aiko.id,
                UpdateStudentRequest {
                    branch_id: None,
                    full_name: None,
                    email: None,
                    phone: None,
                    date_of_birth: None,
                    status: Some(StudentStatus::Inactive),
                },
            )
            .await
            .unwrap();

        let active = storage
            .list_students_with_pagination_impl(StudentListQuery {
                status: Some(StudentStatus::Active),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.pagination.total, 1);
        assert_eq!(active.items[0].full_name, "Ben Carter");

        let searched = storage
            .list_students_with_pagination_impl(StudentListQuery {
                search: Some("tana".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.items.len(), 1);

        let yellow = storage
            .list_students_with_pagination_impl(StudentListQuery {
                belt: Some(BeltLevel::Yellow),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(yellow.items.is_empty());
    }
}
