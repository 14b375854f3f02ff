pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::departments::requests::{
    CreateDepartmentRequest, DepartmentQueryParams, UpdateDepartmentRequest,
};
use crate::storage::Storage;

super::lazy_storage_service!(DepartmentService);

impl DepartmentService {
    pub async fn list_departments(
        &self,
        request: &HttpRequest,
        query: DepartmentQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_departments(self, request, query).await
    }

    pub async fn create_department(
        &self,
        request: &HttpRequest,
        data: CreateDepartmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_department(self, request, data).await
    }

    pub async fn get_department(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_department(self, request, id).await
    }

    pub async fn update_department(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateDepartmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_department(self, request, id, data).await
    }

    // 仍有专业的院系不可删除
    pub async fn delete_department(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_department(self, request, id).await
    }
}

/// 系主任必须是已存在的教师
async fn head_teacher_exists(storage: &Arc<dyn Storage>, teacher_id: Option<i64>) -> Result<bool> {
    match teacher_id {
        Some(id) => Ok(storage.get_teacher_by_id(id).await?.is_some()),
        None => Ok(true),
    }
}
