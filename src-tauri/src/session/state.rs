//! The session state machine driving the shopping flow.
//!
//! All cross-component state lives in [`Session`] and is mutated only
//! through the named transition methods below. The UI never mutates state;
//! it renders from [`SessionSnapshot`] values returned by commands.
//!
//! Stages move forward in the order of the [`Stage`] variants. Uploading a
//! new image restarts the pipeline from `AwaitingQuestions`; the generation
//! counter makes sure a response from a superseded upload cannot overwrite
//! newer state.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::assistant::types::{ClarifyingQuestion, Product};
use crate::session::similar;

/// Where the session currently is in the shopping flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No product type yet. Initial state.
    #[default]
    Idle,
    /// Product type set; clarifying questions on their way.
    AwaitingQuestions,
    /// Question set received, preferences incomplete.
    Conversing,
    /// Every current question has an answer.
    ReadyToRecommend,
    /// Recommendation fetch in flight.
    Recommending,
    /// Recommendation list received (possibly empty).
    Reviewing,
    /// Exactly one product selected from the list.
    Confirmed,
    /// Cart non-empty; summary and feedback available.
    CartActive,
}

/// Transition precondition violations.
///
/// These indicate a UI gating bug rather than a user-visible failure, so
/// they are returned to the caller instead of being written to the error
/// banner.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Answer cannot be empty")]
    EmptyAnswer,
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),
    #[error("Preferences are not complete yet")]
    PreferencesIncomplete,
    #[error("No recommendation at index {0}")]
    BadProductIndex(usize),
    #[error("No product is confirmed")]
    NothingConfirmed,
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Action not available in the current stage")]
    WrongStage,
}

/// All client-side session state, owned by the session controller.
#[derive(Debug, Default)]
pub struct Session {
    stage: Stage,
    generation: u64,
    product_type: Option<String>,
    questions: Vec<ClarifyingQuestion>,
    preferences: IndexMap<String, String>,
    recommendations: Vec<Product>,
    search_attempted: bool,
    confirmed: Option<Product>,
    cart: Vec<Product>,
    summary: Option<String>,
    error: Option<String>,
}

/// Serializable view of the session for the UI.
///
/// `cart_total` is derived at snapshot time, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub stage: Stage,
    pub generation: u64,
    pub product_type: Option<String>,
    pub questions: Vec<ClarifyingQuestion>,
    pub preferences: IndexMap<String, String>,
    pub recommendations: Vec<Product>,
    pub search_attempted: bool,
    pub confirmed: Option<Product>,
    pub cart: Vec<Product>,
    pub cart_total: f64,
    pub summary: Option<String>,
    pub error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn product_type(&self) -> Option<&str> {
        self.product_type.as_deref()
    }

    pub fn preferences(&self) -> &IndexMap<String, String> {
        &self.preferences
    }

    pub fn recommendations(&self) -> &[Product] {
        &self.recommendations
    }

    pub fn cart(&self) -> &[Product] {
        &self.cart
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    fn set_stage(&mut self, stage: Stage) {
        if self.stage != stage {
            info!("Session stage: {:?} -> {:?}", self.stage, stage);
        }
        self.stage = stage;
    }

    /// Store a (normalized) product type and restart the pipeline.
    ///
    /// Clears everything downstream of the uploader except the cart and
    /// summary, whose lifecycles are cart-scoped. Returns the new
    /// generation; responses from requests issued under an older
    /// generation are dropped on arrival.
    pub fn set_product_type(&mut self, raw: &str) -> u64 {
        let normalized = raw.trim().to_lowercase();
        info!("Product type set: {}", normalized);
        self.product_type = Some(normalized);
        self.questions.clear();
        self.preferences.clear();
        self.recommendations.clear();
        self.search_attempted = false;
        self.confirmed = None;
        self.error = None;
        self.generation += 1;
        self.set_stage(Stage::AwaitingQuestions);
        self.generation
    }

    /// Apply a clarify-preferences response.
    ///
    /// An empty question set counts as a vacuously complete preference map
    /// and moves straight to `ReadyToRecommend` instead of stalling.
    pub fn questions_received(&mut self, generation: u64, questions: Vec<ClarifyingQuestion>) {
        if generation != self.generation {
            info!("Dropping stale question set (generation {})", generation);
            return;
        }
        self.error = None;
        self.preferences.clear();
        self.questions = questions;
        if self.questions.is_empty() {
            self.set_stage(Stage::ReadyToRecommend);
        } else {
            self.set_stage(Stage::Conversing);
        }
    }

    /// Record one answer, keyed by the question text.
    ///
    /// Once every current question has an answer, prior recommendations
    /// and the attempted flag are cleared so a changed answer always
    /// produces a fresh recommendation cycle.
    pub fn record_answer(&mut self, question: &str, answer: &str) -> Result<(), SessionError> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        if !self.questions.iter().any(|q| q.question_text == question) {
            return Err(SessionError::UnknownQuestion(question.to_string()));
        }
        self.preferences.insert(question.to_string(), answer.to_string());

        let complete = self
            .questions
            .iter()
            .all(|q| self.preferences.contains_key(&q.question_text));
        if complete {
            self.recommendations.clear();
            self.search_attempted = false;
            self.confirmed = None;
            self.set_stage(Stage::ReadyToRecommend);
        }
        Ok(())
    }

    /// Mark a recommendation search as started.
    ///
    /// The attempted flag is set before the request goes out so that an
    /// empty result is distinguishable from "never searched".
    pub fn begin_search(&mut self) -> Result<u64, SessionError> {
        match self.stage {
            Stage::ReadyToRecommend => {
                self.search_attempted = true;
                self.set_stage(Stage::Recommending);
                Ok(self.generation)
            }
            Stage::Conversing => Err(SessionError::PreferencesIncomplete),
            _ => Err(SessionError::WrongStage),
        }
    }

    /// Apply a recommend response. The list may be empty.
    pub fn recommendations_received(&mut self, generation: u64, products: Vec<Product>) {
        if generation != self.generation {
            info!("Dropping stale recommendations (generation {})", generation);
            return;
        }
        self.error = None;
        self.recommendations = products;
        self.confirmed = None;
        self.set_stage(Stage::Reviewing);
    }

    /// Record a failed question/recommendation fetch.
    ///
    /// The stage is left wherever it was; retrying means re-invoking the
    /// same user action. Failures from superseded requests are dropped.
    pub fn fetch_failed(&mut self, generation: u64, message: String) {
        if generation != self.generation {
            info!("Dropping stale fetch error (generation {})", generation);
            return;
        }
        self.set_error(message);
    }

    /// Select one product from the recommendation list.
    pub fn confirm(&mut self, index: usize) -> Result<(), SessionError> {
        if !matches!(self.stage(), Stage::Reviewing | Stage::CartActive) {
            return Err(SessionError::WrongStage);
        }
        let product = self
            .recommendations
            .get(index)
            .cloned()
            .ok_or(SessionError::BadProductIndex(index))?;
        self.confirmed = Some(product);
        self.set_stage(Stage::Confirmed);
        Ok(())
    }

    /// Drop the confirmed product and go back to reviewing.
    pub fn refine(&mut self) -> Result<(), SessionError> {
        if self.stage() != Stage::Confirmed {
            return Err(SessionError::WrongStage);
        }
        self.confirmed = None;
        self.set_stage(Stage::Reviewing);
        Ok(())
    }

    /// Move the confirmed product into the cart.
    pub fn add_to_cart(&mut self) -> Result<(), SessionError> {
        let product = self.confirmed.take().ok_or(SessionError::NothingConfirmed)?;
        info!("Added to cart: {}", product.name);
        self.cart.push(product);
        self.set_stage(Stage::CartActive);
        Ok(())
    }

    /// Narrow the recommendation list to candidates similar to one of its
    /// members (by name). Never grows the list.
    pub fn narrow_to_similar(&mut self, index: usize) -> Result<(), SessionError> {
        if !matches!(self.stage(), Stage::Reviewing | Stage::CartActive) {
            return Err(SessionError::WrongStage);
        }
        if index >= self.recommendations.len() {
            return Err(SessionError::BadProductIndex(index));
        }
        self.recommendations = similar::narrow(&self.recommendations, index);
        Ok(())
    }

    /// Empty the cart and clear the summary. The stage does not change.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.summary = None;
    }

    /// Precondition for summarization: a non-empty cart.
    pub fn checkout_context(&self) -> Result<(), SessionError> {
        if self.cart.is_empty() {
            return Err(SessionError::EmptyCart);
        }
        Ok(())
    }

    pub fn summary_received(&mut self, summary: String) {
        self.error = None;
        self.summary = Some(summary);
    }

    /// Replace the single visible error.
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Called at the start of every user-initiated action.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            stage: self.stage(),
            generation: self.generation,
            product_type: self.product_type.clone(),
            questions: self.questions.clone(),
            preferences: self.preferences.clone(),
            recommendations: self.recommendations.clone(),
            search_attempted: self.search_attempted,
            confirmed: self.confirmed.clone(),
            cart: self.cart.clone(),
            cart_total: self.cart.iter().map(|p| p.price).sum(),
            summary: self.summary.clone(),
            error: self.error.clone(),
        }
    }
}
