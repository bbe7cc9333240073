//! 升级考核表单控制器
//!
//! 两步选择（当前腰带 → 目标腰带）加考核日期，校验通过后交给 [`GradingRecorder`]。
//! 状态用 [`FormState`] 显式表示：
//!
//! ```text
//! Idle ──select_from──▶ FromSelected ──select_to──▶ ToSelected ──begin_submit──▶ Submitting
//!                                                      ▲                            │
//!                                                      └──────── 失败 ◀─────────────┤
//!                                                                                   ▼
//!                                                                                Success
//! ```
//!
//! 当前用户和目标学员作为参数传入，控制器不读取任何全局上下文。

use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::belts::{BeltLevel, is_higher, promotion_options};
use super::recorder::{
    GradingRecorder, GradingSubmission, RecordedGrading, RecorderError, RecorderErrorKind,
};

pub const GRADING_DATE_FORMAT: &str = "%Y-%m-%d";

/// 表单所针对的学员
#[derive(Debug, Clone)]
pub struct GradingStudent {
    pub id: i64,
    pub current_belt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    FromSelected,
    ToSelected,
    Submitting,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingValidationError {
    MissingFromBelt,
    MissingToBelt,
    SameBelt(String),
    NotHigher { from: String, to: String },
    MissingDate,
    InvalidDate(String),
    FutureDate(String),
    SubmissionInProgress,
    AlreadyRecorded,
}

impl std::fmt::Display for GradingValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFromBelt => write!(f, "Please select the current belt"),
            Self::MissingToBelt => write!(f, "Please select the new belt"),
            Self::SameBelt(belt) => {
                write!(f, "The new belt must be different from the current belt ({belt})")
            }
            Self::NotHigher { from, to } => {
                write!(f, "{to} is not a higher rank than {from}")
            }
            Self::MissingDate => write!(f, "Please select a grading date"),
            Self::InvalidDate(date) => {
                write!(f, "Invalid grading date '{date}', expected YYYY-MM-DD")
            }
            Self::FutureDate(date) => write!(f, "Grading date {date} cannot be in the future"),
            Self::SubmissionInProgress => write!(f, "A submission is already in progress"),
            Self::AlreadyRecorded => write!(f, "This grading has already been recorded"),
        }
    }
}

impl std::error::Error for GradingValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// 展示给用户的临时提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// 一次提交的结果
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// 本地校验未通过，记录器未被调用
    Rejected(GradingValidationError),
    /// 记录成功，在 `navigate_after` 之后离开页面
    Recorded {
        recorded: Box<RecordedGrading>,
        navigate_after: Duration,
    },
    /// 记录器返回错误，表单回到 `ToSelected` 可重新提交；
    /// 没有进行中的提交时结果被丢弃，表单状态不变
    Failed(RecorderError),
}

#[derive(Debug, Clone)]
pub struct GradingForm {
    student_id: i64,
    acting_user_id: i64,
    state: FormState,
    from_belt: Option<String>,
    to_belt: Option<String>,
    grading_date: Option<String>,
    redirect_delay: Duration,
    pending_navigation: Option<Duration>,
    notice: Option<Notice>,
}

impl GradingForm {
    pub fn new(student: &GradingStudent, acting_user_id: i64, redirect_delay: Duration) -> Self {
        let current = student.current_belt.trim();
        Self {
            student_id: student.id,
            acting_user_id,
            state: FormState::Idle,
            from_belt: (!current.is_empty()).then(|| current.to_string()),
            to_belt: None,
            grading_date: None,
            redirect_delay,
            pending_navigation: None,
            notice: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn from_belt(&self) -> Option<&str> {
        self.from_belt.as_deref()
    }

    pub fn to_belt(&self) -> Option<&str> {
        self.to_belt.as_deref()
    }

    pub fn grading_date(&self) -> Option<&str> {
        self.grading_date.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn ensure_editable(&self) -> Result<(), GradingValidationError> {
        match self.state {
            FormState::Submitting => Err(GradingValidationError::SubmissionInProgress),
            FormState::Success => Err(GradingValidationError::AlreadyRecorded),
            _ => Ok(()),
        }
    }

    /// 选择当前腰带；已选目标腰带若不再更高则清除
    pub fn select_from(&mut self, belt: &str) -> Result<(), GradingValidationError> {
        self.ensure_editable()?;
        let belt = belt.trim();
        if belt.is_empty() {
            return Err(GradingValidationError::MissingFromBelt);
        }

        if let Some(to) = self.to_belt.as_deref()
            && !is_higher(to, belt)
        {
            debug!("Clearing target belt {} after selecting {}", to, belt);
            self.to_belt = None;
        }

        self.from_belt = Some(belt.to_string());
        self.state = if self.to_belt.is_some() {
            FormState::ToSelected
        } else {
            FormState::FromSelected
        };
        Ok(())
    }

    /// 可选择的目标腰带：严格高于当前腰带者
    pub fn to_options(&self) -> Vec<BeltLevel> {
        self.from_belt
            .as_deref()
            .map(promotion_options)
            .unwrap_or_default()
    }

    pub fn select_to(&mut self, belt: &str) -> Result<(), GradingValidationError> {
        self.ensure_editable()?;
        let from = self
            .from_belt
            .clone()
            .ok_or(GradingValidationError::MissingFromBelt)?;

        let Some(level) = BeltLevel::parse(belt.trim()) else {
            return Err(GradingValidationError::NotHigher {
                from,
                to: belt.to_string(),
            });
        };

        if !self.to_options().contains(&level) {
            return Err(if same_belt(&from, level) {
                GradingValidationError::SameBelt(from)
            } else {
                GradingValidationError::NotHigher {
                    from,
                    to: level.name().to_string(),
                }
            });
        }

        self.to_belt = Some(level.name().to_string());
        self.state = FormState::ToSelected;
        Ok(())
    }

    pub fn set_grading_date(&mut self, date: &str) -> Result<(), GradingValidationError> {
        self.ensure_editable()?;
        let date = date.trim();
        self.grading_date = (!date.is_empty()).then(|| date.to_string());
        Ok(())
    }

    /// 提交前的完整校验
    pub fn validate(&self, today: NaiveDate) -> Result<(), GradingValidationError> {
        let from = self
            .from_belt
            .as_deref()
            .ok_or(GradingValidationError::MissingFromBelt)?;
        let to = self
            .to_belt
            .as_deref()
            .ok_or(GradingValidationError::MissingToBelt)?;

        if from == to {
            return Err(GradingValidationError::SameBelt(from.to_string()));
        }
        if !is_higher(to, from) {
            return Err(GradingValidationError::NotHigher {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let raw_date = self
            .grading_date
            .as_deref()
            .ok_or(GradingValidationError::MissingDate)?;
        let date = NaiveDate::parse_from_str(raw_date, GRADING_DATE_FORMAT)
            .map_err(|_| GradingValidationError::InvalidDate(raw_date.to_string()))?;
        if date > today {
            return Err(GradingValidationError::FutureDate(raw_date.to_string()));
        }

        Ok(())
    }

    /// 提交按钮是否可用
    pub fn can_submit(&self, today: NaiveDate) -> bool {
        self.state == FormState::ToSelected && self.validate(today).is_ok()
    }

    /// 校验并进入 `Submitting`，返回交给记录器的请求
    pub fn begin_submit(
        &mut self,
        today: NaiveDate,
    ) -> Result<GradingSubmission, GradingValidationError> {
        self.ensure_editable()?;
        if let Err(e) = self.validate(today) {
            self.notice = Some(Notice {
                kind: NoticeKind::Error,
                text: e.to_string(),
            });
            return Err(e);
        }

        // validate 已保证三个字段都存在
        let submission = GradingSubmission {
            student_id: self.student_id,
            from_belt: self.from_belt.clone().unwrap_or_default(),
            to_belt: self.to_belt.clone().unwrap_or_default(),
            grading_date: self.grading_date.clone().unwrap_or_default(),
            created_by_id: self.acting_user_id,
        };

        self.state = FormState::Submitting;
        self.notice = None;
        Ok(submission)
    }

    /// 处理记录器结果
    ///
    /// 只在 `Submitting` 中生效；其他状态下丢弃结果，表单保持原样。
    pub fn complete(&mut self, result: Result<RecordedGrading, RecorderError>) -> SubmitOutcome {
        if self.state != FormState::Submitting {
            warn!(
                "Ignoring grading result for student {} in state {:?}",
                self.student_id, self.state
            );
            return SubmitOutcome::Failed(RecorderError::new(
                RecorderErrorKind::Unavailable,
                "No grading submission is in progress",
            ));
        }

        match result {
            Ok(recorded) => {
                self.state = FormState::Success;
                self.pending_navigation = Some(self.redirect_delay);
                self.notice = Some(Notice {
                    kind: NoticeKind::Success,
                    text: format!(
                        "Grading recorded: {} → {}",
                        recorded.grading.from_belt, recorded.grading.to_belt
                    ),
                });
                SubmitOutcome::Recorded {
                    recorded: Box::new(recorded),
                    navigate_after: self.redirect_delay,
                }
            }
            Err(err) => {
                error!(
                    "Failed to record grading for student {}: {}",
                    self.student_id, err
                );
                self.state = FormState::ToSelected;
                self.notice = Some(Notice {
                    kind: NoticeKind::Error,
                    text: err.message.clone(),
                });
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// 取出待执行的页面跳转，只会返回一次
    pub fn take_navigation(&mut self) -> Option<Duration> {
        self.pending_navigation.take()
    }

    /// 完整的提交流程：校验、调用记录器（带超时）、处理结果
    pub async fn submit<R>(
        &mut self,
        recorder: &R,
        today: NaiveDate,
        timeout: Duration,
    ) -> SubmitOutcome
    where
        R: GradingRecorder + ?Sized,
    {
        let submission = match self.begin_submit(today) {
            Ok(submission) => submission,
            Err(e) => return SubmitOutcome::Rejected(e),
        };

        let result = match tokio::time::timeout(timeout, recorder.record_grading(submission)).await
        {
            Ok(result) => result,
            Err(_) => Err(RecorderError::timeout(timeout)),
        };

        self.complete(result)
    }
}

fn same_belt(from: &str, level: BeltLevel) -> bool {
    BeltLevel::parse(from) == Some(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::entities::{Fee, FeeStatus, FeeType};
    use crate::models::gradings::entities::GradingRecord;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockRecorder {
        calls: Mutex<Vec<GradingSubmission>>,
        fail_with: Option<String>,
        delay: Option<Duration>,
    }

    impl MockRecorder {
        fn ok() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: None,
                delay: None,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::ok()
            }
        }

        fn hanging(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::ok()
            }
        }

        fn calls(&self) -> Vec<GradingSubmission> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GradingRecorder for MockRecorder {
        async fn record_grading(
            &self,
            submission: GradingSubmission,
        ) -> Result<RecordedGrading, RecorderError> {
            self.calls.lock().unwrap().push(submission.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(message) = &self.fail_with {
                return Err(RecorderError::new(
                    RecorderErrorKind::Unavailable,
                    message.clone(),
                ));
            }
            let from_belt = BeltLevel::parse(&submission.from_belt).unwrap();
            let to_belt = BeltLevel::parse(&submission.to_belt).unwrap();
            Ok(RecordedGrading {
                grading: GradingRecord {
                    id: 1,
                    student_id: submission.student_id,
                    from_belt,
                    to_belt,
                    grading_date: submission.grading_date.clone(),
                    created_by: submission.created_by_id,
                    created_at: chrono::Utc::now(),
                },
                fee: Fee {
                    id: 1,
                    student_id: submission.student_id,
                    fee_type: FeeType::Grading,
                    amount: 3000,
                    belt_level: Some(to_belt),
                    grading_id: Some(1),
                    due_date: submission.grading_date,
                    status: FeeStatus::Pending,
                    paid_at: None,
                    created_at: chrono::Utc::now(),
                },
            })
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn form_for(belt: &str) -> GradingForm {
        let student = GradingStudent {
            id: 42,
            current_belt: belt.to_string(),
        };
        GradingForm::new(&student, 7, Duration::from_secs(2))
    }

    #[test]
    fn test_starts_idle_with_current_belt() {
        let form = form_for("Yellow");
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.from_belt(), Some("Yellow"));
        assert_eq!(form.to_belt(), None);
        assert!(!form.can_submit(today()));
    }

    #[test]
    fn test_to_options_from_green() {
        let mut form = form_for("White");
        form.select_from("Green").unwrap();
        let options: Vec<&str> = form.to_options().iter().map(|b| b.name()).collect();
        assert_eq!(
            options,
            vec!["Blue", "Purple", "Brown 3", "Brown 2", "Brown 1", "Black"]
        );
    }

    #[test]
    fn test_lower_target_is_unselectable() {
        let mut form = form_for("Green");
        let err = form.select_to("Yellow").unwrap_err();
        assert!(matches!(err, GradingValidationError::NotHigher { .. }));
        assert_eq!(form.to_belt(), None);

        let err = form.select_to("Green").unwrap_err();
        assert_eq!(err, GradingValidationError::SameBelt("Green".to_string()));
    }

    #[test]
    fn test_changing_from_clears_stale_target() {
        let mut form = form_for("Yellow");
        form.select_to("Orange").unwrap();
        assert_eq!(form.state(), FormState::ToSelected);

        form.select_from("Green").unwrap();
        assert_eq!(form.to_belt(), None);
        assert_eq!(form.state(), FormState::FromSelected);
    }

    #[test]
    fn test_reselecting_same_from_keeps_valid_target() {
        let mut form = form_for("Yellow");
        form.select_from("Yellow").unwrap();
        form.select_to("Blue").unwrap();
        form.select_from("Yellow").unwrap();
        form.select_from("Yellow").unwrap();
        assert_eq!(form.to_belt(), Some("Blue"));
        assert_eq!(form.state(), FormState::ToSelected);
    }

    #[test]
    fn test_validation_messages() {
        let mut form = form_for("Yellow");
        assert_eq!(
            form.validate(today()),
            Err(GradingValidationError::MissingToBelt)
        );

        form.select_to("Orange").unwrap();
        assert_eq!(
            form.validate(today()),
            Err(GradingValidationError::MissingDate)
        );

        form.set_grading_date("01/03/2024").unwrap();
        assert!(matches!(
            form.validate(today()),
            Err(GradingValidationError::InvalidDate(_))
        ));

        form.set_grading_date("2024-06-02").unwrap();
        assert!(matches!(
            form.validate(today()),
            Err(GradingValidationError::FutureDate(_))
        ));

        form.set_grading_date("2024-06-01").unwrap();
        assert!(form.can_submit(today()));
    }

    #[tokio::test]
    async fn test_same_belt_rejected_without_calling_recorder() {
        let recorder = MockRecorder::ok();
        let mut form = form_for("Blue");
        // 模拟直接提交相同腰带
        form.to_belt = Some("Blue".to_string());
        form.state = FormState::ToSelected;
        form.set_grading_date("2024-03-01").unwrap();

        let outcome = form.submit(&recorder, today(), Duration::from_secs(1)).await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Rejected(GradingValidationError::SameBelt(_))
        ));
        assert!(recorder.calls().is_empty());
        assert_eq!(form.notice().map(|n| n.kind), Some(NoticeKind::Error));
        assert_eq!(form.state(), FormState::ToSelected);
    }

    #[tokio::test]
    async fn test_submit_calls_recorder_once_with_exact_fields() {
        let recorder = MockRecorder::ok();
        let mut form = form_for("White");
        form.select_from("Yellow").unwrap();
        form.select_to("Orange").unwrap();
        form.set_grading_date("2024-03-01").unwrap();

        let outcome = form.submit(&recorder, today(), Duration::from_secs(1)).await;

        assert_eq!(
            recorder.calls(),
            vec![GradingSubmission {
                student_id: 42,
                from_belt: "Yellow".to_string(),
                to_belt: "Orange".to_string(),
                grading_date: "2024-03-01".to_string(),
                created_by_id: 7,
            }]
        );
        match outcome {
            SubmitOutcome::Recorded { navigate_after, .. } => {
                assert_eq!(navigate_after, Duration::from_secs(2));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(form.state(), FormState::Success);
        assert_eq!(form.take_navigation(), Some(Duration::from_secs(2)));
        assert_eq!(form.take_navigation(), None);
    }

    #[tokio::test]
    async fn test_failure_returns_to_to_selected() {
        let recorder = MockRecorder::failing("Student not found");
        let mut form = form_for("Yellow");
        form.select_to("Orange").unwrap();
        form.set_grading_date("2024-03-01").unwrap();

        let outcome = form.submit(&recorder, today(), Duration::from_secs(1)).await;
        match outcome {
            SubmitOutcome::Failed(err) => assert_eq!(err.message, "Student not found"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(form.state(), FormState::ToSelected);
        assert!(form.can_submit(today()));
        assert_eq!(form.take_navigation(), None);
        assert_eq!(
            form.notice().map(|n| n.text.as_str()),
            Some("Student not found")
        );
        // 表单保持原样，可直接重试
        assert_eq!(form.to_belt(), Some("Orange"));
        assert_eq!(form.grading_date(), Some("2024-03-01"));
    }

    #[tokio::test]
    async fn test_hung_recorder_times_out() {
        let recorder = MockRecorder::hanging(Duration::from_secs(5));
        let mut form = form_for("Yellow");
        form.select_to("Orange").unwrap();
        form.set_grading_date("2024-03-01").unwrap();

        let outcome = form
            .submit(&recorder, today(), Duration::from_millis(20))
            .await;
        match outcome {
            SubmitOutcome::Failed(err) => assert_eq!(err.kind, RecorderErrorKind::Timeout),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(form.state(), FormState::ToSelected);
        assert_eq!(recorder.calls().len(), 1);
    }

    #[test]
    fn test_form_locked_while_submitting() {
        let mut form = form_for("Yellow");
        form.select_to("Orange").unwrap();
        form.set_grading_date("2024-03-01").unwrap();
        form.begin_submit(today()).unwrap();

        assert_eq!(form.state(), FormState::Submitting);
        assert!(!form.can_submit(today()));
        assert_eq!(
            form.begin_submit(today()),
            Err(GradingValidationError::SubmissionInProgress)
        );
        assert_eq!(
            form.select_from("Green"),
            Err(GradingValidationError::SubmissionInProgress)
        );
    }

    #[tokio::test]
    async fn test_result_without_submission_is_ignored() {
        let recorder = MockRecorder::ok();
        let submission = GradingSubmission {
            student_id: 42,
            from_belt: "Yellow".to_string(),
            to_belt: "Orange".to_string(),
            grading_date: "2024-03-01".to_string(),
            created_by_id: 7,
        };
        let recorded = recorder.record_grading(submission).await.unwrap();

        let mut form = form_for("Yellow");
        match form.complete(Ok(recorded.clone())) {
            SubmitOutcome::Failed(err) => assert_eq!(err.kind, RecorderErrorKind::Unavailable),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.take_navigation(), None);

        // 已完成的提交不会被重复的结果再次触发跳转
        form.select_to("Orange").unwrap();
        form.set_grading_date("2024-03-01").unwrap();
        form.begin_submit(today()).unwrap();
        assert!(matches!(
            form.complete(Ok(recorded.clone())),
            SubmitOutcome::Recorded { .. }
        ));
        assert!(form.take_navigation().is_some());
        assert!(matches!(
            form.complete(Err(RecorderError::new(RecorderErrorKind::Unavailable, "late"))),
            SubmitOutcome::Failed(_)
        ));
        assert_eq!(form.state(), FormState::Success);
        assert_eq!(form.take_navigation(), None);
    }

    #[test]
    fn test_unranked_current_belt_has_no_options() {
        let form = form_for("Rainbow");
        assert!(form.to_options().is_empty());
        let form = form_for("");
        assert_eq!(form.from_belt(), None);
        assert!(form.to_options().is_empty());
    }
}
