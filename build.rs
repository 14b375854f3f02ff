use std::env;
use std::fs;
use std::path::Path;

const FALLBACK_INDEX: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <title>CollegeHub</title>
    <style>
        body { font-family: sans-serif; max-width: 560px; margin: 96px auto; text-align: center; }
        code { background: #f1f3f4; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>CollegeHub 教务管理</h1>
    <p>前端尚未构建，API 仍可通过 <code>/api/v1</code> 访问。</p>
    <p><code>cd frontend && bun install && bun run build</code></p>
</body>
</html>"#;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    // rust-embed 要求目录存在
    if !dist_path.exists() {
        println!("cargo:warning=frontend/dist not found, embedding placeholder page");
        fs::create_dir_all(dist_path.join("assets")).expect("Failed to create dist directory");
        fs::write(dist_path.join("index.html"), FALLBACK_INDEX)
            .expect("Failed to write fallback index.html");
    }
}
