pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod import;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::imports::requests::ExportParams;
use crate::models::teachers::requests::{
    CreateTeacherRequest, TeacherExportParams, TeacherQueryParams, UpdateTeacherRequest,
};
use crate::utils::validate::{validate_optional_date, validate_required};

super::lazy_storage_service!(TeacherService);

impl TeacherService {
    pub async fn list_teachers(
        &self,
        request: &HttpRequest,
        query: TeacherQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_teachers(self, request, query).await
    }

    // 创建教师档案及其登录账号
    pub async fn create_teacher(
        &self,
        request: &HttpRequest,
        data: CreateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_teacher(self, request, data).await
    }

    pub async fn get_teacher(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_teacher(self, request, id).await
    }

    pub async fn update_teacher(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_teacher(self, request, id, data).await
    }

    // 删除档案及账号
    pub async fn delete_teacher(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_teacher(self, request, id).await
    }

    pub async fn import_teachers(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        import::import_teachers(self, request, payload).await
    }

    pub async fn export_teachers(
        &self,
        request: &HttpRequest,
        params: TeacherExportParams,
    ) -> ActixResult<HttpResponse> {
        export::export_teachers(self, request, params).await
    }

    pub async fn download_template(&self, params: ExportParams) -> ActixResult<HttpResponse> {
        export::download_template(params).await
    }
}

/// 档案字段校验（账号字段另行校验）
fn validate_profile(employee_id: Option<&str>, joining_date: Option<&str>) -> Result<(), String> {
    if let Some(employee_id) = employee_id {
        validate_required("employee_id", employee_id, 32)?;
    }
    validate_optional_date(joining_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_profile() {
        assert!(validate_profile(Some("EMP-001"), Some("2024-08-01")).is_ok());
        assert!(validate_profile(None, None).is_ok());
        assert!(validate_profile(Some("  "), None).is_err());
        assert!(validate_profile(Some("EMP-001"), Some("01/08/2024")).is_err());
        // 空日期视为未填写
        assert!(validate_profile(None, Some("")).is_ok());
    }
}
