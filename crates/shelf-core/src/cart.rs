//! # Cart and Donation Documents
//!
//! Both are owner-scoped by email. Cart items reference a catalog book and
//! are deleted one at a time or in bulk when a payment settles; donated
//! books are append-only.

use crate::error::{ShelfError, ShelfResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A book placed in a user's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owner email
    pub email: String,

    /// Referenced catalog book. Existence is not checked on insert.
    pub book_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CartItem {
    pub fn validate(&self) -> ShelfResult<()> {
        if self.email.trim().is_empty() {
            return Err(ShelfError::Validation("cart item email is required".into()));
        }
        if self.book_id.trim().is_empty() {
            return Err(ShelfError::Validation(
                "cart item must reference a book".into(),
            ));
        }
        Ok(())
    }
}

/// A second-hand book donated by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonatedBook {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owner email
    pub email: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DonatedBook {
    pub fn validate(&self) -> ShelfResult<()> {
        if self.email.trim().is_empty() {
            return Err(ShelfError::Validation("donation email is required".into()));
        }
        if self.title.trim().is_empty() {
            return Err(ShelfError::Validation("donation title is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_item_wire_names() {
        let item: CartItem = serde_json::from_value(json!({
            "email": "reader@example.com",
            "bookId": "b1",
            "title": "Dune",
            "price": 12.50
        }))
        .unwrap();

        assert!(item.validate().is_ok());
        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["bookId"], json!("b1"));
    }

    #[test]
    fn test_cart_item_requires_owner_and_book() {
        let item: CartItem =
            serde_json::from_value(json!({ "email": "", "bookId": "b1" })).unwrap();
        assert!(item.validate().is_err());

        let item: CartItem =
            serde_json::from_value(json!({ "email": "a@b.c", "bookId": "" })).unwrap();
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_donation_requires_title() {
        let donation: DonatedBook =
            serde_json::from_value(json!({ "email": "a@b.c", "title": "" })).unwrap();
        assert!(donation.validate().is_err());
    }
}
