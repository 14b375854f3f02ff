pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::programs::requests::{
    CreateProgramRequest, ProgramQueryParams, UpdateProgramRequest,
};

super::lazy_storage_service!(ProgramService);

/// 最长学制（学期）
pub const MAX_DURATION_SEMESTERS: i32 = 20;

impl ProgramService {
    pub async fn list_programs(
        &self,
        request: &HttpRequest,
        query: ProgramQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_programs(self, request, query).await
    }

    pub async fn create_program(
        &self,
        request: &HttpRequest,
        data: CreateProgramRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_program(self, request, data).await
    }

    pub async fn get_program(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_program(self, request, id).await
    }

    pub async fn update_program(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateProgramRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_program(self, request, id, data).await
    }

    // 仍有班级或学生的专业不可删除
    pub async fn delete_program(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_program(self, request, id).await
    }
}

/// 学制与学费范围检查
fn validate_program_numbers(
    duration_semesters: Option<i32>,
    fee_per_semester: Option<i64>,
) -> Result<(), String> {
    if let Some(duration) = duration_semesters
        && !(1..=MAX_DURATION_SEMESTERS).contains(&duration)
    {
        return Err(format!(
            "duration_semesters must be between 1 and {MAX_DURATION_SEMESTERS}"
        ));
    }
    if fee_per_semester.is_some_and(|fee| fee < 0) {
        return Err("fee_per_semester must not be negative".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_number_bounds() {
        assert!(validate_program_numbers(Some(8), Some(50_000)).is_ok());
        assert!(validate_program_numbers(Some(1), Some(0)).is_ok());
        assert!(validate_program_numbers(Some(20), None).is_ok());
        assert!(validate_program_numbers(Some(0), None).is_err());
        assert!(validate_program_numbers(Some(21), None).is_err());
        assert!(validate_program_numbers(None, Some(-1)).is_err());
        assert!(validate_program_numbers(None, None).is_ok());
    }
}
