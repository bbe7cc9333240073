//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod branches;
mod fees;
mod gradings;
mod notifications;
mod students;
mod users;

use crate::config::AppConfig;
use crate::errors::{DojoError, Result};
use migration::{Migrator, MigratorTrait};
use crate::models::PaginationInfo;
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

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout_secs: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout_secs).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout_secs).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| DojoError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| DojoError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(None)
            .connect_with(opt)
            .await
            .map_err(|e| DojoError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(timeout_secs))
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| DojoError::database_connection(format!("无法连接到数据库: {e}")))
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
            Err(DojoError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 按页读取 `select` 的结果；页码从 1 开始，每页最多 100 条
    pub(crate) async fn fetch_page<'db, E>(
        &'db self,
        select: Select<E>,
        page: i64,
        size: i64,
        what: &str,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: Sync + 'db,
    {
        let page = page.max(1) as u64;
        let size = size.clamp(1, 100) as u64;

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| DojoError::database_operation(format!("统计{what}数量失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询{what}列表失败: {e}")))?;

        Ok((
            rows,
            PaginationInfo::from_counts(page as i64, size as i64, total as i64),
        ))
    }
}

// Storage trait 实现
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

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 分馆模块
    async fn create_branch(&self, branch: CreateBranchRequest) -> Result<Branch> {
        self.create_branch_impl(branch).await
    }

    async fn get_branch_by_id(&self, id: i64) -> Result<Option<Branch>> {
        self.get_branch_by_id_impl(id).await
    }

    async fn get_branch_by_name(&self, name: &str) -> Result<Option<Branch>> {
        self.get_branch_by_name_impl(name).await
    }

    async fn list_branches(&self) -> Result<Vec<Branch>> {
        self.list_branches_impl().await
    }

    async fn update_branch(&self, id: i64, update: UpdateBranchRequest) -> Result<Option<Branch>> {
        self.update_branch_impl(id, update).await
    }

    // 学员模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    // 考核模块
    async fn record_belt_grading(
        &self,
        request: CreateGradingRequest,
        default_due_days: i64,
    ) -> Result<GradingOutcome> {
        self.record_belt_grading_impl(request, default_due_days)
            .await
    }

    async fn list_student_gradings(
        &self,
        student_id: i64,
        page: i64,
        size: i64,
    ) -> Result<GradingListResponse> {
        self.list_student_gradings_impl(student_id, page, size)
            .await
    }

    // 费用模块
    async fn list_fee_configs(&self) -> Result<Vec<FeeConfig>> {
        self.list_fee_configs_impl().await
    }

    async fn upsert_fee_config(&self, config: UpsertFeeConfigRequest) -> Result<FeeConfig> {
        self.upsert_fee_config_impl(config).await
    }

    async fn list_fees_with_pagination(&self, query: FeeListQuery) -> Result<FeeListResponse> {
        self.list_fees_with_pagination_impl(query).await
    }

    async fn get_fee_by_id(&self, id: i64) -> Result<Option<Fee>> {
        self.get_fee_by_id_impl(id).await
    }

    async fn mark_fee_paid(&self, id: i64) -> Result<Option<Fee>> {
        self.mark_fee_paid_impl(id).await
    }

    // 通知模块
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification> {
        self.create_notification_impl(req).await
    }

    async fn get_notification_by_id(&self, id: i64) -> Result<Option<Notification>> {
        self.get_notification_by_id_impl(id).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, query)
            .await
    }

    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64> {
        self.get_unread_notification_count_impl(user_id).await
    }

    async fn mark_notification_as_read(&self, id: i64) -> Result<bool> {
        self.mark_notification_as_read_impl(id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::branches::requests::CreateBranchRequest;
    use crate::models::students::{entities::Student, requests::CreateStudentRequest};
    use crate::models::users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    };

    /// 单连接的内存 SQLite，已执行全部迁移
    pub async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory sqlite")
    }

    pub async fn seed_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
        storage
            .create_user_impl(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@dojo.test"),
                password: "hash".to_string(),
                role,
                display_name: None,
                phone: None,
            })
            .await
            .expect("seed user")
    }

    pub async fn seed_student(
        storage: &SeaOrmStorage,
        full_name: &str,
        user_id: Option<i64>,
    ) -> Student {
        let branch = match storage.get_branch_by_name_impl("Central").await.unwrap() {
            Some(branch) => branch,
            None => storage
                .create_branch_impl(CreateBranchRequest {
                    name: "Central".to_string(),
                    address: None,
                    phone: None,
                    email: None,
                })
                .await
                .expect("seed branch"),
        };

        storage
            .create_student_impl(CreateStudentRequest {
                branch_id: branch.id,
                user_id,
                full_name: full_name.to_string(),
                email: None,
                phone: None,
                date_of_birth: None,
                current_belt: None,
                joined_at: Some("2024-01-10".to_string()),
            })
            .await
            .expect("seed student")
    }
}
