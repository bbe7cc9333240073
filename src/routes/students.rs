use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::fees::requests::FeeListParams;
use crate::models::gradings::requests::{GradingListParams, RecordGradingRequest};
use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{FeeService, GradingService, StudentService};
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);
static GRADING_SERVICE: Lazy<GradingService> = Lazy::new(GradingService::new_lazy);
static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .list_students(query.into_inner(), &req)
        .await
}

pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(student_data.into_inner(), &req)
        .await
}

pub async fn get_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(student_id.0, &req).await
}

pub async fn update_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    update_data: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(student_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn record_grading(
    req: HttpRequest,
    student_id: SafeIDI64,
    body: web::Json<RecordGradingRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .record_grading(student_id.0, body.into_inner(), &req)
        .await
}

pub async fn list_gradings(
    req: HttpRequest,
    student_id: SafeIDI64,
    query: web::Query<GradingListParams>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .list_gradings(student_id.0, query.into_inner(), &req)
        .await
}

pub async fn list_student_fees(
    req: HttpRequest,
    student_id: SafeIDI64,
    query: web::Query<FeeListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .list_student_fees(student_id.0, query.into_inner(), &req)
        .await
}

// 配置路由：学员、考核与学员费用仅教练和管理员可用
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_students))
            .route("", web::post().to(create_student))
            .route("/{id}", web::get().to(get_student))
            .route("/{id}", web::put().to(update_student))
            // 考核记录不可修改或删除，只有录入和查询
            .route("/{id}/gradings", web::post().to(record_grading))
            .route("/{id}/gradings", web::get().to(list_gradings))
            .route("/{id}/fees", web::get().to(list_student_fees)),
    );
}
