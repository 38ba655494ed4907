use tauri::AppHandle;
use tauri_plugin_store::StoreExt;
use tracing::{info, warn};

/// Fallback service origin when neither the environment nor the
/// preference store provides one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Resolve the assistant service origin.
///
/// Precedence: `SHOPMATE_API_URL` environment variable, then the
/// `api_base_url` preference, then the default.
pub fn api_base_url(app: &AppHandle) -> String {
    if let Ok(url) = std::env::var("SHOPMATE_API_URL") {
        if !url.trim().is_empty() {
            return url;
        }
    }

    app.store("preferences.json")
        .ok()
        .and_then(|store| store.get("api_base_url"))
        .and_then(|v| v.as_str().map(|s| s.to_string()))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

#[tauri::command]
pub fn get_preference(app: AppHandle, key: &str) -> Result<Option<String>, String> {
    info!("Getting preference: {}", key);
    let store = app.store("preferences.json").map_err(|e| {
        warn!("Failed to open store: {}", e);
        e.to_string()
    })?;
    let value = store.get(key).and_then(|v| v.as_str().map(|s| s.to_string()));
    Ok(value)
}

#[tauri::command]
pub fn set_preference(app: AppHandle, key: &str, value: &str) -> Result<(), String> {
    info!("Setting preference: {} = {}", key, value);
    let store = app.store("preferences.json").map_err(|e| {
        warn!("Failed to open store: {}", e);
        e.to_string()
    })?;
    store.set(key, serde_json::json!(value));
    store.save().map_err(|e| {
        warn!("Failed to save store: {}", e);
        e.to_string()
    })
}
