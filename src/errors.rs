//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_collegehub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum CollegeHubError {
            $($variant(String),)*
        }

        impl CollegeHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(CollegeHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(CollegeHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(CollegeHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl CollegeHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        CollegeHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_collegehub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    Conflict("E013", "Resource Conflict"),
    Import("E014", "Import Error"),
}

impl CollegeHubError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for CollegeHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CollegeHubError {}

impl CollegeHubError {
    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            CollegeHubError::Validation(_)
            | CollegeHubError::DateParse(_)
            | CollegeHubError::Import(_) => StatusCode::BAD_REQUEST,
            CollegeHubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CollegeHubError::Authorization(_) => StatusCode::FORBIDDEN,
            CollegeHubError::NotFound(_) => StatusCode::NOT_FOUND,
            CollegeHubError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对应的 API 错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            CollegeHubError::Validation(_) | CollegeHubError::DateParse(_) => {
                ErrorCode::ValidationFailed
            }
            CollegeHubError::Import(_) => ErrorCode::ImportFileDataInvalid,
            CollegeHubError::Authentication(_) => ErrorCode::Unauthorized,
            CollegeHubError::Authorization(_) => ErrorCode::Forbidden,
            CollegeHubError::NotFound(_) => ErrorCode::NotFound,
            CollegeHubError::Conflict(_) => ErrorCode::Conflict,
            _ => ErrorCode::InternalServerError,
        }
    }
}

/// 统一错误出口：服务层直接 `?` 返回的错误在这里格式化为 JSON 响应
impl ResponseError for CollegeHubError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!("{}", self.format_simple());
        }
        HttpResponse::build(status).json(ApiResponse::error_empty(self.api_code(), self.message()))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for CollegeHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        CollegeHubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for CollegeHubError {
    fn from(err: std::io::Error) -> Self {
        CollegeHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for CollegeHubError {
    fn from(err: serde_json::Error) -> Self {
        CollegeHubError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for CollegeHubError {
    fn from(err: csv::Error) -> Self {
        CollegeHubError::Import(err.to_string())
    }
}

impl From<chrono::ParseError> for CollegeHubError {
    fn from(err: chrono::ParseError) -> Self {
        CollegeHubError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CollegeHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CollegeHubError::cache_connection("test").code(), "E001");
        assert_eq!(CollegeHubError::database_config("test").code(), "E003");
        assert_eq!(CollegeHubError::validation("test").code(), "E007");
        assert_eq!(CollegeHubError::authentication("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            CollegeHubError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            CollegeHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = CollegeHubError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CollegeHubError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CollegeHubError::conflict("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CollegeHubError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CollegeHubError::authorization("x").api_code() as i32,
            ErrorCode::Forbidden as i32
        );
    }

    #[test]
    fn test_error_response_body() {
        let resp = CollegeHubError::validation("bad date").error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_format_simple() {
        let err = CollegeHubError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
