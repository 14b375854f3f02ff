//! 路径参数提取器
//!
//! 路径中的 ID 解析失败时直接返回统一 JSON 错误，而不是 actix 默认的纯文本 404。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};
use crate::models::users::entities::UserRole;

fn bad_path_param(name: &str, raw: &str) -> actix_web::Error {
    InternalError::from_response(
        format!("invalid path parameter {name}"),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("路径参数 {name} 无效: '{raw}'"),
        )),
    )
    .into()
}

/// 为正整数路径参数生成提取器
macro_rules! define_safe_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or("");
                ready(match raw.parse::<i64>() {
                    Ok(id) if id > 0 => Ok($name(id)),
                    _ => Err(bad_path_param($param, raw)),
                })
            }
        }
    };
}

define_safe_id_extractor!(SafeIDI64, "id");
define_safe_id_extractor!(SafeClassIdI64, "class_id");

/// 角色名路径参数
#[derive(Debug, Clone, Copy)]
pub struct SafeRoleName(pub UserRole);

impl FromRequest for SafeRoleName {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("name").unwrap_or("");
        ready(
            raw.parse::<UserRole>()
                .map(SafeRoleName)
                .map_err(|_| bad_path_param("name", raw)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_invalid() {
        for raw in ["0", "-1", "abc", ""] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{raw}");
        }
    }

    #[actix_web::test]
    async fn test_role_name() {
        let req = TestRequest::default().param("name", "staff").to_http_request();
        assert_eq!(SafeRoleName::extract(&req).await.unwrap().0, UserRole::Staff);

        let req = TestRequest::default().param("name", "root").to_http_request();
        assert!(SafeRoleName::extract(&req).await.is_err());
    }
}
