//! HTTP 路由表，每个资源一个 `configure_*_routes`

pub mod auth;
pub mod belts;
pub mod branches;
pub mod fees;
pub mod notifications;
pub mod students;
pub mod users;

pub use auth::configure_auth_routes;
pub use belts::configure_belt_routes;
pub use branches::configure_branch_routes;
pub use fees::configure_fee_routes;
pub use notifications::configure_notification_routes;
pub use students::configure_student_routes;
pub use users::configure_user_routes;
