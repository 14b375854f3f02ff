pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest, UpdateClassRequest};
use crate::models::programs::entities::Program;

super::lazy_storage_service!(ClassService);

impl ClassService {
    // 获取班级列表
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }

    pub async fn create_class(
        &self,
        req: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, req, class_data).await
    }

    // 根据班级 ID 获取班级信息
    pub async fn get_class(&self, req: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        get::get_class(self, req, class_id).await
    }

    // 更新班级信息
    pub async fn update_class(
        &self,
        req: &HttpRequest,
        class_id: i64,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, req, class_id, update_data).await
    }

    // 删除班级，分班随之删除
    pub async fn delete_class(
        &self,
        req: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, req, class_id).await
    }
}

/// 学期须在专业学制范围内
fn validate_semester(semester: i32, program: &Program) -> Result<(), String> {
    if (1..=program.duration_semesters).contains(&semester) {
        Ok(())
    } else {
        Err(format!(
            "semester must be between 1 and {} for program {}",
            program.duration_semesters, program.code
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semester_within_program_duration() {
        let program = Program {
            id: 1,
            department_id: 1,
            name: "Computer Science".to_string(),
            code: "BSCS".to_string(),
            duration_semesters: 8,
            fee_per_semester: 50_000,
            description: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert!(validate_semester(1, &program).is_ok());
        assert!(validate_semester(8, &program).is_ok());
        assert!(validate_semester(0, &program).is_err());
        let err = validate_semester(9, &program).unwrap_err();
        assert!(err.contains("BSCS"));
    }
}
