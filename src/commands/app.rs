use super::AppState;

/// Returns the application version from Cargo package metadata.
#[tauri::command]
pub(crate) fn app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Returns the current target OS as a short string (e.g. `windows`, `macos`).
#[tauri::command]
pub(crate) fn platform_os() -> String {
    std::env::consts::OS.to_string()
}

/// Opens the folder holding the section records in the system file manager.
#[tauri::command]
pub(crate) fn reveal_data_dir(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<(), String> {
    use tauri_plugin_opener::OpenerExt;

    let path = state.data_dir.to_string_lossy().to_string();
    log::info!("opening data directory {}", path);
    app.opener()
        .open_path(path, None::<&str>)
        .map_err(|e| e.to_string())
}
