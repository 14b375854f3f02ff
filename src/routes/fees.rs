use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::fees::requests::{
    FeeQueryParams, GenerateFeesRequest, RecordPaymentRequest, WaiveFeeRequest,
};
use crate::models::roles::entities::Permission;
use crate::services::FeeService;
use crate::utils::SafeIDI64;

static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn generate_fees(
    req: HttpRequest,
    body: web::Json<GenerateFeesRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.generate_fees(&req, body.into_inner()).await
}

pub async fn list_fees(
    req: HttpRequest,
    query: web::Query<FeeQueryParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_fees(&req, query.into_inner()).await
}

pub async fn get_fee(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_fee(&req, id.0).await
}

pub async fn delete_fee(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_fee(&req, id.0).await
}

pub async fn record_payment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<RecordPaymentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .record_payment(&req, id.0, body.into_inner())
        .await
}

pub async fn waive_fee(
    req: HttpRequest,
    id: SafeIDI64,
    body: Option<web::Json<WaiveFeeRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    FEE_SERVICE.waive_fee(&req, id.0, body).await
}

pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/generate").route(
                    web::post()
                        .to(generate_fees)
                        .wrap(RequirePermission::new(Permission::FeesManage)),
                ),
            )
            .service(
                web::resource("").route(
                    web::get()
                        .to(list_fees)
                        .wrap(RequirePermission::new(Permission::FeesCollect)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_fee)
                            .wrap(RequirePermission::new(Permission::FeesCollect)),
                    )
                    .route(
                        web::delete()
                            .to(delete_fee)
                            .wrap(RequirePermission::new(Permission::FeesManage)),
                    ),
            )
            .service(
                web::resource("/{id}/payments").route(
                    web::post()
                        .to(record_payment)
                        .wrap(RequirePermission::new(Permission::FeesCollect)),
                ),
            )
            .service(
                web::resource("/{id}/waive").route(
                    web::post()
                        .to(waive_fee)
                        .wrap(RequirePermission::new(Permission::FeesManage)),
                ),
            ),
    );
}
