//! Catalog product records.
//!
//! Products are immutable once loaded. Session state (cart lines, wishlist
//! entries) refers to them by [`ProductId`] or shares them behind an `Arc`,
//! never by copying fields that could drift from the catalog.

use core::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use super::attributes::{Collection, Finish, WoodType};
use super::id::{ProductId, ReviewId, UserId};
use super::price::{CurrencyCode, Price};

/// Outer dimensions of a piece, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub depth: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {} × {} cm", self.width, self.depth, self.height)
    }
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub user_name: String,
    /// Star rating, 1 to 5.
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
}

impl Review {
    /// Lowest accepted star rating.
    pub const MIN_RATING: u8 = 1;
    /// Highest accepted star rating.
    pub const MAX_RATING: u8 = 5;
}

/// A purchasable piece of furniture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub short_description: String,
    pub description: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Gallery images, first one is the primary image.
    pub images: Vec<Url>,
    pub wood_type: WoodType,
    pub finish: Finish,
    pub collection: Collection,
    pub dimensions: Dimensions,
    /// Weight in kilograms.
    pub weight: u32,
    pub in_stock: bool,
    pub featured: bool,
    /// Maker's story shown on the product page.
    pub story: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crafting_video: Option<Url>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// The unit price tagged with a currency.
    #[must_use]
    pub const fn price_in(&self, currency_code: CurrencyCode) -> Price {
        Price::new(self.price, currency_code)
    }

    /// The first gallery image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&Url> {
        self.images.first()
    }

    /// Mean star rating across all reviews, `None` when unreviewed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        Some(f64::from(sum) / self.reviews.len() as f64)
    }

    /// Number of filled stars to show (average rounded half up, 0 when unreviewed).
    #[must_use]
    pub fn rounded_rating(&self) -> u8 {
        self.average_rating().map_or(0, |avg| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let stars = (avg + 0.5).floor() as u8;
            stars.min(Review::MAX_RATING)
        })
    }

    /// "1 review" / "3 reviews".
    #[must_use]
    pub fn review_count_label(&self) -> String {
        match self.reviews.len() {
            1 => "1 review".to_string(),
            n => format!("{n} reviews"),
        }
    }
}
