//! Hotspot Maker: labeled, positioned hotspots on a background image,
//! embedded anywhere with a `[hotspot id="N"]` reference.
//!
//! The core (codec, renderer, sanitizers, embed references and the section
//! repository) is plain synchronous code. The Tauri authoring shell is built
//! with the `desktop` feature.

pub mod codec;
pub mod config;
pub mod embed;
pub mod error;
pub mod models;
pub mod render;
pub mod sanitize;
pub mod sections;
pub mod store;

#[cfg(feature = "desktop")]
mod commands;

pub use error::StoreError;
pub use models::{EntryId, Hotspot, HotspotSection, SectionSubmission, SpotRows};
pub use sections::Sections;

/// Sets up logging at the configured level; `RUST_LOG` overrides it.
#[cfg(feature = "desktop")]
fn init_logging(config: &config::AppConfig) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(config.log_filter());
    builder.parse_default_env();
    builder.init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;

    let config_path = config::AppConfig::config_path();
    let config = config::AppConfig::load_from_file(&config_path);
    init_logging(&config);
    log::info!(
        "Hotspot Maker v{} starting (config: {})",
        env!("CARGO_PKG_VERSION"),
        config_path.display()
    );

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            let data_dir = config.data_dir();
            let store = store::JsonFileStore::open(&data_dir)?;
            app.manage(commands::AppState::new(store, data_dir));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::app::app_version,
            commands::app::platform_os,
            commands::app::reveal_data_dir,
            commands::sections::list_sections,
            commands::sections::create_section,
            commands::sections::rename_section,
            commands::sections::delete_section,
            commands::sections::get_section,
            commands::sections::save_section,
            commands::sections::save_section_form,
            commands::sections::render_section,
            commands::sections::render_content,
            commands::sections::authoring_form,
            commands::sections::embed_reference_for
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
