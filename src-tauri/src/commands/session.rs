//! Tauri commands for pure session transitions (no network).
//!
//! Every command represents one user action: it clears the error banner
//! ("new user input"), applies the named transition, and returns a fresh
//! snapshot for the UI to render.

use tauri::State;
use tracing::info;

use crate::session::{SessionSnapshot, SessionState};

#[tauri::command]
pub fn get_session(state: State<'_, SessionState>) -> Result<SessionSnapshot, String> {
    Ok(state.lock().snapshot())
}

/// Record one answered clarifying question.
#[tauri::command]
pub fn submit_answer(
    state: State<'_, SessionState>,
    question: String,
    answer: String,
) -> Result<SessionSnapshot, String> {
    let mut session = state.lock();
    session.clear_error();
    session
        .record_answer(&question, &answer)
        .map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

/// Confirm the recommendation at `index` as the provisional choice.
#[tauri::command]
pub fn confirm_product(
    state: State<'_, SessionState>,
    index: usize,
) -> Result<SessionSnapshot, String> {
    let mut session = state.lock();
    session.clear_error();
    session.confirm(index).map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

/// Deselect the confirmed product and return to the candidate list.
#[tauri::command]
pub fn refine_selection(state: State<'_, SessionState>) -> Result<SessionSnapshot, String> {
    let mut session = state.lock();
    session.clear_error();
    session.refine().map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

#[tauri::command]
pub fn add_to_cart(state: State<'_, SessionState>) -> Result<SessionSnapshot, String> {
    let mut session = state.lock();
    session.clear_error();
    session.add_to_cart().map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

#[tauri::command]
pub fn clear_cart(state: State<'_, SessionState>) -> Result<SessionSnapshot, String> {
    info!("Clearing cart");
    let mut session = state.lock();
    session.clear_error();
    session.clear_cart();
    Ok(session.snapshot())
}

/// Narrow the candidate list to products similar to the one at `index`.
#[tauri::command]
pub fn show_similar(
    state: State<'_, SessionState>,
    index: usize,
) -> Result<SessionSnapshot, String> {
    let mut session = state.lock();
    session.clear_error();
    session.narrow_to_similar(index).map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

/// The user dismissed the manual category prompt without entering one.
#[tauri::command]
pub fn cancel_category_entry(state: State<'_, SessionState>) -> Result<SessionSnapshot, String> {
    let mut session = state.lock();
    session.set_error("No category selected. Please try again.".to_string());
    Ok(session.snapshot())
}
