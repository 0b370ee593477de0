//! # Book Documents
//!
//! The catalog is read-only from this service: books are seeded out of band
//! and only ever listed or fetched by id here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalog book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Remaining descriptive fields, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_fields_survive() {
        let book: Book = serde_json::from_value(json!({
            "_id": "b1",
            "title": "The Rust Programming Language",
            "author": "Klabnik & Nichols",
            "price": 29.99,
            "pages": 560
        }))
        .unwrap();

        assert_eq!(book.id.as_deref(), Some("b1"));
        assert_eq!(book.extra["pages"], json!(560));

        let back = serde_json::to_value(&book).unwrap();
        assert_eq!(back["pages"], json!(560));
        assert_eq!(back["_id"], json!("b1"));
    }
}
