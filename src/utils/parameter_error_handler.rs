//! JSON / Query / Path 反序列化失败时的统一错误响应

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request<E>(err: E, message: String) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON 解析失败 {}: {}", req.path(), err);
    match &err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            let message = format!("请求体过大: {err}");
            InternalError::from_response(
                err,
                HttpResponse::PayloadTooLarge()
                    .json(ApiResponse::error_empty(ErrorCode::PayloadTooLarge, message)),
            )
            .into()
        }
        JsonPayloadError::ContentType => {
            bad_request(err, "Content-Type 必须为 application/json".to_string())
        }
        _ => {
            let message = format!("请求体格式错误: {err}");
            bad_request(err, message)
        }
    }
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("查询参数解析失败 {}: {}", req.path(), err);
    let message = format!("查询参数错误: {err}");
    bad_request(err, message)
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!("路径参数解析失败 {}: {}", req.path(), err);
    let message = format!("路径参数错误: {err}");
    bad_request(err, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{ResponseError, http::StatusCode, test::TestRequest};

    #[test]
    fn test_json_error_is_bad_request() {
        let req = TestRequest::default().to_http_request();
        let err = json_error_handler(JsonPayloadError::ContentType, &req);
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_json_overflow_is_413() {
        let req = TestRequest::default().to_http_request();
        let err = json_error_handler(
            JsonPayloadError::OverflowKnownLength {
                length: 100,
                limit: 10,
            },
            &req,
        );
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
