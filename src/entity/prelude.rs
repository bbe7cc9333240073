//! 预导入模块，方便使用

pub use super::belt_gradings::{
    ActiveModel as BeltGradingActiveModel, Entity as BeltGradings, Model as BeltGradingModel,
};
pub use super::branches::{
    ActiveModel as BranchActiveModel, Entity as Branches, Model as BranchModel,
};
pub use super::fee_configs::{
    ActiveModel as FeeConfigActiveModel, Entity as FeeConfigs, Model as FeeConfigModel,
};
pub use super::fees::{ActiveModel as FeeActiveModel, Entity as Fees, Model as FeeModel};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
