//! 业务逻辑层
//!
//! 每个资源一个服务结构体，处理程序通过懒加载的全局实例调用，
//! 存储从请求的 app data 中获取。

pub mod auth;
pub mod belts;
pub mod branches;
pub mod fees;
pub mod gradings;
pub mod notifications;
pub mod students;
pub mod users;

pub use auth::AuthService;
pub use belts::BeltService;
pub use branches::BranchService;
pub use fees::FeeService;
pub use gradings::GradingService;
pub use notifications::NotificationService;
pub use students::StudentService;
pub use users::UserService;
