pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod import;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::imports::requests::ExportParams;
use crate::models::students::requests::{
    CreateStudentRequest, StudentExportParams, StudentQueryParams, UpdateStudentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate::{validate_optional_date, validate_required};

super::lazy_storage_service!(StudentService);

impl StudentService {
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    // 创建学生档案及其登录账号
    pub async fn create_student(
        &self,
        request: &HttpRequest,
        data: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, data).await
    }

    pub async fn get_student(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_student(self, request, id).await
    }

    // 当前登录学生的档案
    pub async fn get_my_student(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_my_student(self, request).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, request, id, data).await
    }

    pub async fn delete_student(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_student(self, request, id).await
    }

    pub async fn import_students(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        import::import_students(self, request, payload).await
    }

    pub async fn export_students(
        &self,
        request: &HttpRequest,
        params: StudentExportParams,
    ) -> ActixResult<HttpResponse> {
        export::export_students(self, request, params).await
    }

    pub async fn download_template(&self, params: ExportParams) -> ActixResult<HttpResponse> {
        export::download_template(params).await
    }
}

/// 档案字段校验（账号字段另行校验）
fn validate_profile(
    roll_number: Option<&str>,
    date_of_birth: Option<&str>,
    admission_date: Option<&str>,
) -> std::result::Result<(), String> {
    if let Some(roll_number) = roll_number {
        validate_required("roll_number", roll_number, 32)?;
    }
    validate_optional_date(date_of_birth)?;
    validate_optional_date(admission_date)
}

/// 学籍归属不合法的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EnrollmentError {
    ProgramNotFound,
    ClassNotFound,
    ClassNotInProgram,
    SectionWithoutClass,
    SectionNotFound,
    SectionNotInClass,
    SectionFull { capacity: i32 },
}

impl EnrollmentError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ProgramNotFound => ErrorCode::ProgramNotFound,
            Self::ClassNotFound => ErrorCode::ClassNotFound,
            Self::SectionNotFound => ErrorCode::SectionNotFound,
            Self::SectionFull { .. } => ErrorCode::SectionFull,
            _ => ErrorCode::StudentEnrollmentInvalid,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::ProgramNotFound => "Program does not exist".to_string(),
            Self::ClassNotFound => "Class does not exist".to_string(),
            Self::ClassNotInProgram => "Class does not belong to the program".to_string(),
            Self::SectionWithoutClass => "A section requires a class".to_string(),
            Self::SectionNotFound => "Section does not exist".to_string(),
            Self::SectionNotInClass => "Section does not belong to the class".to_string(),
            Self::SectionFull { capacity } => format!("Section is full (capacity {capacity})"),
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let body = ApiResponse::error_empty(self.error_code(), self.message());
        match self {
            Self::SectionFull { .. } => HttpResponse::Conflict().json(body),
            _ => HttpResponse::BadRequest().json(body),
        }
    }
}

/// 检查专业、班级、分班的归属关系与分班容量
///
/// `current_section` 为学生当前所在分班，留在原分班时不占新名额。
pub(crate) async fn check_enrollment(
    storage: &Arc<dyn Storage>,
    program_id: i64,
    class_id: Option<i64>,
    section_id: Option<i64>,
    current_section: Option<i64>,
) -> Result<Option<EnrollmentError>> {
    if storage.get_program_by_id(program_id).await?.is_none() {
        return Ok(Some(EnrollmentError::ProgramNotFound));
    }

    let Some(class_id) = class_id else {
        return Ok(section_id.map(|_| EnrollmentError::SectionWithoutClass));
    };
    let Some(class) = storage.get_class_by_id(class_id).await? else {
        return Ok(Some(EnrollmentError::ClassNotFound));
    };
    if class.program_id != program_id {
        return Ok(Some(EnrollmentError::ClassNotInProgram));
    }

    let Some(section_id) = section_id else {
        return Ok(None);
    };
    let Some(section) = storage.get_section_by_id(section_id).await? else {
        return Ok(Some(EnrollmentError::SectionNotFound));
    };
    if section.class_id != class_id {
        return Ok(Some(EnrollmentError::SectionNotInClass));
    }
    if current_section != Some(section_id) {
        let enrolled = storage.count_students_in_section(section_id).await?;
        if enrolled >= section.capacity.max(0) as u64 {
            return Ok(Some(EnrollmentError::SectionFull {
                capacity: section.capacity,
            }));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sections::requests::UpdateSectionRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::students::tests::{new_student, seed_academics};

    #[tokio::test]
    async fn test_enrollment_rules() {
        let sea = SeaOrmStorage::in_memory().await;
        let (program_id, class_id, section_id) = seed_academics(&sea).await;
        let storage: Arc<dyn Storage> = Arc::new(sea);

        let ok = check_enrollment(&storage, program_id, Some(class_id), Some(section_id), None)
            .await
            .unwrap();
        assert_eq!(ok, None);

        let err = check_enrollment(&storage, program_id + 99, None, None, None)
            .await
            .unwrap();
        assert_eq!(err, Some(EnrollmentError::ProgramNotFound));

        let err = check_enrollment(&storage, program_id, None, Some(section_id), None)
            .await
            .unwrap();
        assert_eq!(err, Some(EnrollmentError::SectionWithoutClass));

        let err = check_enrollment(&storage, program_id, Some(class_id), Some(section_id + 99), None)
            .await
            .unwrap();
        assert_eq!(err, Some(EnrollmentError::SectionNotFound));
    }

    #[tokio::test]
    async fn test_full_section_refuses_new_students_only() {
        let sea = SeaOrmStorage::in_memory().await;
        let (program_id, class_id, section_id) = seed_academics(&sea).await;
        sea.update_section_impl(
            section_id,
            UpdateSectionRequest {
                name: None,
                capacity: Some(1),
                class_teacher_id: None,
            },
        )
        .await
        .unwrap();
        sea.create_student_impl(new_student(
            "alice01",
            "R-001",
            (program_id, class_id, section_id),
        ))
        .await
        .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(sea);

        let err = check_enrollment(&storage, program_id, Some(class_id), Some(section_id), None)
            .await
            .unwrap();
        assert_eq!(err, Some(EnrollmentError::SectionFull { capacity: 1 }));
        assert_eq!(err.unwrap().into_response().status(), 409);

        // 已在该分班的学生不受影响
        let ok = check_enrollment(
            &storage,
            program_id,
            Some(class_id),
            Some(section_id),
            Some(section_id),
        )
        .await
        .unwrap();
        assert_eq!(ok, None);
    }
}
