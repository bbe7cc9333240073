use std::sync::Arc;

use crate::models::{
    branches::{
        entities::Branch,
        requests::{CreateBranchRequest, UpdateBranchRequest},
    },
    fees::{
        entities::{Fee, FeeConfig},
        requests::{FeeListQuery, UpsertFeeConfigRequest},
        responses::FeeListResponse,
    },
    gradings::{
        entities::GradingOutcome, requests::CreateGradingRequest,
        responses::GradingListResponse,
    },
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
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
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 分馆管理方法
    async fn create_branch(&self, branch: CreateBranchRequest) -> Result<Branch>;
    async fn get_branch_by_id(&self, id: i64) -> Result<Option<Branch>>;
    async fn get_branch_by_name(&self, name: &str) -> Result<Option<Branch>>;
    async fn list_branches(&self) -> Result<Vec<Branch>>;
    async fn update_branch(&self, id: i64, update: UpdateBranchRequest) -> Result<Option<Branch>>;

    /// 学员管理方法
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;

    /// 考核方法
    // 在同一事务中写入考核记录、更新学员腰带并生成考核费用
    async fn record_belt_grading(
        &self,
        request: CreateGradingRequest,
        default_due_days: i64,
    ) -> Result<GradingOutcome>;
    // 学员考核历史（最新在前）
    async fn list_student_gradings(
        &self,
        student_id: i64,
        page: i64,
        size: i64,
    ) -> Result<GradingListResponse>;

    /// 费用方法
    async fn list_fee_configs(&self) -> Result<Vec<FeeConfig>>;
    async fn upsert_fee_config(&self, config: UpsertFeeConfigRequest) -> Result<FeeConfig>;
    async fn list_fees_with_pagination(&self, query: FeeListQuery) -> Result<FeeListResponse>;
    async fn get_fee_by_id(&self, id: i64) -> Result<Option<Fee>>;
    // 仅当费用仍为待缴时标记为已缴，返回 None 表示状态已变化
    async fn mark_fee_paid(&self, id: i64) -> Result<Option<Fee>>;

    /// 通知方法
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification>;
    async fn get_notification_by_id(&self, id: i64) -> Result<Option<Notification>>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64>;
    async fn mark_notification_as_read(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
