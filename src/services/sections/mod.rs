pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::sections::requests::{CreateSectionRequest, UpdateSectionRequest};
use crate::storage::Storage;

super::lazy_storage_service!(SectionService);

impl SectionService {
    // 班级下的分班列表（含人数）
    pub async fn list_sections(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_sections(self, request, class_id).await
    }

    pub async fn create_section(
        &self,
        request: &HttpRequest,
        class_id: i64,
        data: CreateSectionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_section(self, request, class_id, data).await
    }

    pub async fn get_section(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_section(self, request, id).await
    }

    pub async fn update_section(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateSectionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_section(self, request, id, data).await
    }

    // 删除分班：课表与考勤随之删除，学生脱离分班
    pub async fn delete_section(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_section(self, request, id).await
    }

    pub async fn list_section_students(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        students::list_section_students(self, request, id).await
    }
}

fn validate_section_name(name: &str) -> std::result::Result<(), String> {
    crate::utils::validate::validate_required("name", name, 20)
}

async fn class_teacher_exists(storage: &Arc<dyn Storage>, teacher_id: Option<i64>) -> Result<bool> {
    match teacher_id {
        Some(id) => Ok(storage.get_teacher_by_id(id).await?.is_some()),
        None => Ok(true),
    }
}
