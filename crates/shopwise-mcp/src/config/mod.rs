//! Configuration loading and resolution.
//!
//! Each path resolves as: explicit flag, then environment variable, then a
//! file in the working directory, then a default under `$HOME/.shopwise`.

use std::path::PathBuf;

pub const CATALOG_ENV: &str = "SHOPWISE_CATALOG";
pub const TRENDING_ENV: &str = "SHOPWISE_TRENDING";
pub const DB_ENV: &str = "SHOPWISE_DB";
pub const TOKEN_ENV: &str = "SHOPWISE_TOKEN";

pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:5000";

/// Resolve the training catalog used for recommendations.
pub fn resolve_catalog_path(explicit: Option<&str>) -> String {
    resolve(explicit, CATALOG_ENV, "models/clean_data.csv", "clean_data.csv")
}

/// Resolve the trending products catalog shown on the landing page.
pub fn resolve_trending_path(explicit: Option<&str>) -> String {
    resolve(
        explicit,
        TRENDING_ENV,
        "models/trending_products.csv",
        "trending_products.csv",
    )
}

/// Resolve the user database.
pub fn resolve_db_path(explicit: Option<&str>) -> String {
    resolve(explicit, DB_ENV, ".shopwise/users.db", "users.db")
}

/// Bearer token for the HTTP `/mcp` route: flag first, then environment.
pub fn resolve_token(explicit: Option<String>) -> Option<String> {
    explicit
        .or_else(|| std::env::var(TOKEN_ENV).ok())
        .filter(|t| !t.is_empty())
}

fn resolve(explicit: Option<&str>, env: &str, cwd_relative: &str, home_file: &str) -> String {
    if let Some(path) = explicit {
        return path.to_string();
    }

    if let Ok(env_path) = std::env::var(env) {
        return env_path;
    }

    let cwd_path = PathBuf::from(cwd_relative);
    if cwd_path.exists() {
        return cwd_path.display().to_string();
    }

    format!("{}/{home_file}", home_dir())
}

fn home_dir() -> String {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());

    format!("{home}/.shopwise")
}
