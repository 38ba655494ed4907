pub mod assistant;
mod commands;
mod error;
pub mod session;

pub use error::ShopMateError;

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .manage(session::SessionState::new())
        .invoke_handler(tauri::generate_handler![
            commands::config::get_preference,
            commands::config::set_preference,
            commands::session::get_session,
            commands::session::submit_answer,
            commands::session::confirm_product,
            commands::session::refine_selection,
            commands::session::add_to_cart,
            commands::session::clear_cart,
            commands::session::show_similar,
            commands::session::cancel_category_entry,
            commands::assistant::analyze_image,
            commands::assistant::set_product_type,
            commands::assistant::fetch_recommendations,
            commands::assistant::summarize_session,
            commands::assistant::send_feedback,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
