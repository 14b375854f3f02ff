use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::services::today;

super::lazy_storage_service!(DashboardService);

impl DashboardService {
    /// 首页汇总：在读人数、教务结构、当日考勤与学费
    pub async fn get_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let today = today().format("%Y-%m-%d").to_string();

        let stats = storage.dashboard_stats(&today).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Dashboard statistics retrieved successfully",
        )))
    }
}
