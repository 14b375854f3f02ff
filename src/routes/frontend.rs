//! 前端静态资源
//!
//! 构建好的单页应用由 rust-embed 编译进二进制；未命中的路径回退到 index.html。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const INDEX: &str = "index.html";

fn extension(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

fn content_type(path: &str) -> &'static str {
    match extension(path) {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// 带哈希的构建产物可长期缓存，入口页不缓存
fn cache_control(path: &str) -> &'static str {
    if path.starts_with("assets/") && extension(path) != "html" {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache"
    }
}

/// 解析请求路径，返回实际命中的资源名
fn resolve(path: &str) -> Option<(String, Vec<u8>)> {
    let path = path.trim_start_matches('/');
    if !path.is_empty()
        && let Some(file) = FrontendAssets::get(path)
    {
        return Some((path.to_string(), file.data.into_owned()));
    }
    // 客户端路由
    FrontendAssets::get(INDEX).map(|file| (INDEX.to_string(), file.data.into_owned()))
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let tail = req.match_info().query("tail");

    // 未匹配的 API 请求不回退到前端页面
    if req.path().starts_with("/api/") {
        return Ok(HttpResponse::NotFound().json(crate::models::ApiResponse::error_empty(
            crate::models::ErrorCode::NotFound,
            format!("No route for {}", req.path()),
        )));
    }

    match resolve(tail) {
        Some((name, body)) => Ok(HttpResponse::Ok()
            .content_type(content_type(&name))
            .insert_header(("Cache-Control", cache_control(&name)))
            .body(body)),
        None => Ok(HttpResponse::NotFound()
            .content_type("text/plain; charset=utf-8")
            .body("CollegeHub frontend has not been built")),
    }
}

pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            content_type("assets/app.3f2a.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(content_type("favicon.ico"), "image/x-icon");
        assert_eq!(content_type("data.bin"), "application/octet-stream");
    }

    #[test]
    fn test_cache_control() {
        assert_eq!(
            cache_control("assets/index.9c1e.css"),
            "public, max-age=31536000, immutable"
        );
        assert_eq!(cache_control("index.html"), "no-cache");
        assert_eq!(cache_control("manifest.json"), "no-cache");
    }
}
