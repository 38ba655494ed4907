//! Wire types for the assistant service.
//!
//! These mirror the committed request/response contracts. The clarify
//! endpoint historically had a second shape (`{questions: string[]}`);
//! only the structured array form is parsed here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single clarifying question from `/clarify-preferences`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    /// Question as shown to the user; also the preference-map key.
    pub question_text: String,
    /// Short machine key supplied by the service (may be empty).
    #[serde(default)]
    pub key: String,
}

/// A recommendation candidate, also reused as a cart line item.
///
/// Only `name` and `price` are guaranteed by the service; everything else
/// is tolerated as absent and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Response body of `/analyze-image`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeImageResponse {
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub vision_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClarifyRequest<'a> {
    pub product_type: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RecommendRequest<'a> {
    pub product_type: &'a str,
    pub preferences: &'a IndexMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendResponse {
    #[serde(default)]
    pub recommendations: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeRequest<'a> {
    pub product_type: &'a str,
    pub preferences: &'a IndexMap<String, String>,
    pub recommendations: &'a [Product],
    pub cart: &'a [Product],
}

#[derive(Debug, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackRequest<'a> {
    pub feedback: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_tolerates_missing_optional_fields() {
        let json = r#"{"name": "AirX", "price": 2999}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "AirX");
        assert_eq!(product.price, 2999.0);
        assert!(product.id.is_none());
        assert!(product.brand.is_empty());
        assert!(product.category.is_none());
    }

    #[test]
    fn product_ignores_unknown_fields() {
        let json = r#"{"name": "AirX", "price": 10.5, "image_url": "http://x/y.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, 10.5);
    }

    #[test]
    fn clarifying_question_defaults_key() {
        let json = r#"[{"question_text": "What size?"}, {"question_text": "What color?", "key": "color"}]"#;
        let questions: Vec<ClarifyingQuestion> = serde_json::from_str(json).unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions[0].key.is_empty());
        assert_eq!(questions[1].key, "color");
    }

    #[test]
    fn analyze_response_with_empty_body() {
        let response: AnalyzeImageResponse = serde_json::from_str("{}").unwrap();
        assert!(response.product_type.is_none());
        assert!(response.vision_description.is_none());
    }

    #[test]
    fn recommend_request_serializes_preferences_in_order() {
        let mut preferences = IndexMap::new();
        preferences.insert("size?".to_string(), "10".to_string());
        preferences.insert("color?".to_string(), "black".to_string());
        let request = RecommendRequest {
            product_type: "sneakers",
            preferences: &preferences,
        };
        let json = serde_json::to_string(&request).unwrap();
        let size_pos = json.find("size?").unwrap();
        let color_pos = json.find("color?").unwrap();
        assert!(size_pos < color_pos, "question order lost: {}", json);
    }
}
