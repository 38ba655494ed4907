//! Tauri commands that combine session transitions with assistant calls.
//!
//! Each command issues at most one network round-trip (the analyze path
//! chains the mandatory question fetch, which needs no extra user
//! action). The mutex guard is dropped before any await; responses are
//! applied under a fresh lock and checked against the generation token,
//! so a superseded upload or search can never overwrite newer state.

use base64::Engine;
use serde::Serialize;
use tauri::{AppHandle, State};
use tracing::{info, warn};

use crate::assistant::{image_prep, AssistantClient};
use crate::commands::config::api_base_url;
use crate::session::{SessionSnapshot, SessionState};

/// What the uploader learns from an analyze round-trip.
#[derive(Debug, Serialize)]
pub struct AnalyzeOutcome {
    /// Inferred category, if the service produced one.
    pub product_type: Option<String>,
    /// Optional caption describing what the vision model saw.
    pub vision_description: Option<String>,
    /// True when the call succeeded but no category was inferred; the UI
    /// must then collect one manually.
    pub needs_category: bool,
    pub snapshot: SessionSnapshot,
}

fn client_for(app: &AppHandle) -> Result<AssistantClient, String> {
    AssistantClient::new(&api_base_url(app)).map_err(String::from)
}

/// Classify an uploaded photo and, when a category comes back, fetch the
/// clarifying questions for it in the same user action.
///
/// Every failure mode (undecodable upload, transport error, bad status)
/// lands in the session error banner; the command itself only errs on
/// serialization problems the UI cannot recover from.
#[tauri::command]
pub async fn analyze_image(
    app: AppHandle,
    state: State<'_, SessionState>,
    image_base64: String,
) -> Result<AnalyzeOutcome, String> {
    info!("Starting product photo analysis");
    state.lock().clear_error();

    match try_analyze(&app, &state, image_base64).await {
        Ok(outcome) => Ok(outcome),
        Err(message) => {
            let mut session = state.lock();
            session.set_error(message);
            Ok(AnalyzeOutcome {
                product_type: None,
                vision_description: None,
                needs_category: false,
                snapshot: session.snapshot(),
            })
        }
    }
}

async fn try_analyze(
    app: &AppHandle,
    state: &State<'_, SessionState>,
    image_base64: String,
) -> Result<AnalyzeOutcome, String> {
    let image_bytes = base64::engine::general_purpose::STANDARD
        .decode(&image_base64)
        .map_err(|e| format!("Invalid base64 image data: {}", e))?;
    let jpeg_bytes = image_prep::prepare_upload(&image_bytes)?;

    let client = client_for(app)?;
    let response = client
        .analyze_image(jpeg_bytes)
        .await
        .map_err(String::from)?;

    // An empty string counts as "not inferred", same as an absent field.
    let inferred = response.product_type.filter(|t| !t.trim().is_empty());

    match inferred {
        Some(product_type) => {
            info!("Category inferred: {}", product_type);
            let snapshot = assign_product_type(&client, state, &product_type).await;
            Ok(AnalyzeOutcome {
                product_type: snapshot.product_type.clone(),
                vision_description: response.vision_description,
                needs_category: false,
                snapshot,
            })
        }
        None => {
            info!("No category inferred; manual entry required");
            Ok(AnalyzeOutcome {
                product_type: None,
                vision_description: response.vision_description,
                needs_category: true,
                snapshot: state.lock().snapshot(),
            })
        }
    }
}

/// Set the product category (manual entry path) and fetch its questions.
#[tauri::command]
pub async fn set_product_type(
    app: AppHandle,
    state: State<'_, SessionState>,
    product_type: String,
) -> Result<SessionSnapshot, String> {
    let client = client_for(&app)?;
    Ok(assign_product_type(&client, &state, &product_type).await)
}

/// Store the product type and immediately run the question fetch; setting
/// a type always triggers it, whether inferred or entered manually.
async fn assign_product_type(
    client: &AssistantClient,
    state: &State<'_, SessionState>,
    product_type: &str,
) -> SessionSnapshot {
    let (generation, normalized) = {
        let mut session = state.lock();
        let generation = session.set_product_type(product_type);
        (generation, session.product_type().unwrap_or_default().to_string())
    };

    let result = client.clarify_preferences(&normalized).await;

    let mut session = state.lock();
    match result {
        Ok(questions) => session.questions_received(generation, questions),
        Err(e) => session.fetch_failed(generation, e.to_string()),
    }
    session.snapshot()
}

/// Run the recommendation search for the completed preference map.
#[tauri::command]
pub async fn fetch_recommendations(
    app: AppHandle,
    state: State<'_, SessionState>,
) -> Result<SessionSnapshot, String> {
    let (generation, product_type, preferences) = {
        let mut session = state.lock();
        session.clear_error();
        let generation = session.begin_search().map_err(|e| e.to_string())?;
        (
            generation,
            session.product_type().unwrap_or_default().to_string(),
            session.preferences().clone(),
        )
    };

    let client = client_for(&app)?;
    let result = client.recommend(&product_type, &preferences).await;

    let mut session = state.lock();
    match result {
        Ok(products) => {
            info!("Received {} recommendations", products.len());
            session.recommendations_received(generation, products);
        }
        Err(e) => session.fetch_failed(generation, e.to_string()),
    }
    Ok(session.snapshot())
}

/// Request the natural-language session summary for the current cart.
#[tauri::command]
pub async fn summarize_session(
    app: AppHandle,
    state: State<'_, SessionState>,
) -> Result<SessionSnapshot, String> {
    let (product_type, preferences, recommendations, cart) = {
        let mut session = state.lock();
        session.clear_error();
        session.checkout_context().map_err(|e| e.to_string())?;
        (
            session.product_type().unwrap_or_default().to_string(),
            session.preferences().clone(),
            session.recommendations().to_vec(),
            session.cart().to_vec(),
        )
    };

    let client = client_for(&app)?;
    let result = client
        .summarize(&product_type, &preferences, &recommendations, &cart)
        .await;

    let mut session = state.lock();
    match result {
        Ok(summary) => session.summary_received(summary),
        Err(e) => session.set_error(e.to_string()),
    }
    Ok(session.snapshot())
}

/// Fire-and-forget feedback submission. Failures are logged and swallowed;
/// they never reach the error banner.
#[tauri::command]
pub async fn send_feedback(app: AppHandle, feedback: String) -> Result<(), String> {
    if feedback.trim().is_empty() {
        return Err("Feedback cannot be empty".to_string());
    }

    let client = client_for(&app)?;
    if let Err(e) = client.send_feedback(feedback.trim()).await {
        warn!("Feedback submission failed (ignored): {}", e);
    }
    Ok(())
}
