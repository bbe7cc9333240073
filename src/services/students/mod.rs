pub mod create;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub(crate) const FULL_NAME_MAX: usize = 100;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, query, request).await
    }

    pub async fn create_student(
        &self,
        student_data: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, student_data, request).await
    }

    pub async fn get_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, student_id, request).await
    }

    pub async fn update_student(
        &self,
        student_id: i64,
        update_data: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, student_id, update_data, request).await
    }
}

// 学员资料的公共字段校验
pub(crate) fn validate_profile(
    full_name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
    date_of_birth: Option<&str>,
) -> Result<(), HttpResponse> {
    use crate::utils::validate::{validate_contact, validate_date, validate_required_text};

    let bad_request = |msg: String| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::StudentInvalid, msg))
    };

    if let Some(name) = full_name {
        validate_required_text(name, FULL_NAME_MAX)
            .map_err(|msg| bad_request(format!("Full name: {msg}")))?;
    }
    validate_contact(email, phone).map_err(|msg| bad_request(msg.to_string()))?;
    if let Some(dob) = date_of_birth {
        validate_date(dob).map_err(|msg| bad_request(format!("Date of birth: {msg}")))?;
    }
    Ok(())
}
