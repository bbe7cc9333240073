use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{error, info};

use super::GradingService;
use crate::grading::{
    GradingForm, GradingValidationError, RecorderError, RecorderErrorKind,
    StorageGradingRecorder, SubmitOutcome,
};
use crate::middlewares::RequireJWT;
use crate::models::gradings::{requests::RecordGradingRequest, responses::RecordGradingResponse};
use crate::models::{ApiResponse, ErrorCode};

// 成功后客户端返回的页面
const SUCCESS_REDIRECT: &str = "/students";

pub async fn record_grading(
    service: &GradingService,
    student_id: i64,
    body: RecordGradingRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 录入人只取自 JWT
    let Some(acting_user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);
    let config = &service.get_config().grading;

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            error!("Failed to load student {} for grading: {}", student_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to record grading",
                )),
            );
        }
    };

    let mut form = GradingForm::new(
        &student.grading_target(),
        acting_user_id,
        config.success_redirect_delay(),
    );
    if let Err(e) = fill_form(&mut form, &body) {
        return Ok(validation_failed(&e));
    }

    let recorder = StorageGradingRecorder::new(storage, config.fee_due_days);
    let today = chrono::Utc::now().date_naive();

    match form
        .submit(&recorder, today, config.submit_timeout())
        .await
    {
        SubmitOutcome::Rejected(e) => Ok(validation_failed(&e)),
        SubmitOutcome::Recorded {
            recorded,
            navigate_after,
        } => {
            info!(
                "User {} recorded grading {} for student {}",
                acting_user_id, recorded.grading.id, student_id
            );
            let recorded = *recorded;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                RecordGradingResponse {
                    grading: recorded.grading,
                    fee: recorded.fee,
                    navigate_after_ms: navigate_after.as_millis() as i64,
                    redirect_to: SUCCESS_REDIRECT.to_string(),
                },
                "Grading recorded",
            )))
        }
        SubmitOutcome::Failed(err) => Ok(recorder_failed(&err)),
    }
}

// 请求体只覆盖提供了的字段，from 缺省时沿用学员当前腰带
fn fill_form(
    form: &mut GradingForm,
    body: &RecordGradingRequest,
) -> Result<(), GradingValidationError> {
    if let Some(from) = body.from_belt.as_deref() {
        form.select_from(from)?;
    }
    if let Some(to) = body.to_belt.as_deref() {
        form.select_to(to)?;
    }
    if let Some(date) = body.grading_date.as_deref() {
        form.set_grading_date(date)?;
    }
    Ok(())
}

fn validation_failed(err: &GradingValidationError) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::GradingValidationFailed,
        err.to_string(),
    ))
}

fn recorder_failed(err: &RecorderError) -> HttpResponse {
    let (status, code) = match err.kind {
        RecorderErrorKind::StudentNotFound => (StatusCode::NOT_FOUND, ErrorCode::StudentNotFound),
        RecorderErrorKind::InvalidPromotion => {
            (StatusCode::BAD_REQUEST, ErrorCode::GradingValidationFailed)
        }
        RecorderErrorKind::FeeConfigMissing => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::GradingFeeConfigMissing,
        ),
        RecorderErrorKind::Timeout => (StatusCode::GATEWAY_TIMEOUT, ErrorCode::GradingTimeout),
        RecorderErrorKind::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::GradingRecordFailed,
        ),
    };
    HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{FormState, GradingStudent};
    use std::time::Duration;

    fn form_for(belt: &str) -> GradingForm {
        let student = GradingStudent {
            id: 1,
            current_belt: belt.to_string(),
        };
        GradingForm::new(&student, 2, Duration::from_secs(2))
    }

    #[test]
    fn test_fill_form_defaults_from_to_current_belt() {
        let mut form = form_for("Yellow");
        let body = RecordGradingRequest {
            from_belt: None,
            to_belt: Some("Orange".to_string()),
            grading_date: Some("2024-03-01".to_string()),
        };
        fill_form(&mut form, &body).unwrap();
        assert_eq!(form.from_belt(), Some("Yellow"));
        assert_eq!(form.to_belt(), Some("Orange"));
        assert_eq!(form.state(), FormState::ToSelected);
    }

    #[test]
    fn test_fill_form_rejects_lower_target() {
        let mut form = form_for("Green");
        let body = RecordGradingRequest {
            from_belt: None,
            to_belt: Some("Yellow".to_string()),
            grading_date: None,
        };
        let err = fill_form(&mut form, &body).unwrap_err();
        assert!(matches!(err, GradingValidationError::NotHigher { .. }));
    }

    #[test]
    fn test_recorder_error_status_mapping() {
        let resp = recorder_failed(&RecorderError::new(
            RecorderErrorKind::FeeConfigMissing,
            "No grading fee configured for Black",
        ));
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = recorder_failed(&RecorderError::timeout(Duration::from_millis(10)));
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);

        let resp = recorder_failed(&RecorderError::new(
            RecorderErrorKind::StudentNotFound,
            "Student 9 not found",
        ));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
