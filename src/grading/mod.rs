//! 腰带升级考核
//!
//! - `belts`: 腰带目录与等级比较
//! - `form`: 考核表单控制器（显式状态机）
//! - `recorder`: 考核记录契约及基于存储的实现

pub mod belts;
pub mod form;
pub mod recorder;

pub use belts::{BeltInfo, BeltLevel, UNRANKED, index_of, is_higher, promotion_options};
pub use form::{FormState, GradingForm, GradingStudent, GradingValidationError, SubmitOutcome};
pub use recorder::{
    GradingRecorder, GradingSubmission, RecordedGrading, RecorderError, RecorderErrorKind,
    StorageGradingRecorder,
};
