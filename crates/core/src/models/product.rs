//! Catalog products and their reviews.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, require};
use crate::types::{Price, ProductId, ReviewId};

/// A product in the shop's catalog.
///
/// Products are always saved as a whole record; editing means re-submitting
/// the full entity. Orders keep their own snapshot of name, image and price,
/// so editing or deleting a product never rewrites order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable product ID.
    pub id: ProductId,
    /// Display name, also the key used to match order lines.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Image URL or data URI.
    pub image: String,
    /// Free-text category tag (e.g. "Mặn", "Ngọt").
    pub category: String,
    /// Number of units needed before a batch goes in the oven.
    pub target_qty: u32,
    /// Display flag.
    #[serde(default)]
    pub is_best_seller: bool,
    /// Display flag.
    #[serde(default)]
    pub is_new: bool,
    /// Optional video showing the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Related articles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub article_links: Vec<ArticleLink>,
    /// Customer reviews, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<ProductReview>,
}

/// A link to an article about a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleLink {
    pub title: String,
    pub url: String,
}

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReview {
    pub id: ReviewId,
    pub user_name: String,
    /// 1-5 stars.
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
}

impl ProductReview {
    /// Build a validated review.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRating` if `rating` is outside 1-5 and `MissingField` if
    /// the reviewer name or comment is blank.
    pub fn new(
        user_name: &str,
        rating: u8,
        comment: &str,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::InvalidRating(rating));
        }
        Ok(Self {
            id: ReviewId::generate(),
            user_name: require(user_name, "reviewer name")?,
            rating,
            comment: require(comment, "comment")?,
            date,
        })
    }

    /// Whether the reviewer was unhappy (two stars or fewer).
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.rating <= 2
    }
}

impl Product {
    /// Check the fields an admin must fill in before saving.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for a blank name and `NegativeAmount` for a
    /// negative price.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "product name")?;
        if self.price.as_i64() < 0 {
            return Err(ValidationError::NegativeAmount("price"));
        }
        Ok(())
    }

    /// Append a review.
    pub fn add_review(&mut self, review: ProductReview) {
        self.reviews.push(review);
    }

    /// Most recent review left by `user_name`, if any.
    #[must_use]
    pub fn latest_review_by(&self, user_name: &str) -> Option<&ProductReview> {
        self.reviews
            .iter()
            .filter(|r| r.user_name == user_name)
            .max_by_key(|r| r.date)
    }

    /// Average star rating, or `None` without reviews.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // review counts are tiny
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        Some(f64::from(sum) / self.reviews.len() as f64)
    }
}

/// The catalog written on first launch when the products store is empty.
#[must_use]
pub fn default_catalog() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("1"),
            name: "Bánh Mì Phô Mai Chảy".to_string(),
            description: "Vỏ bánh mềm mịn, nhân kem phô mai béo ngậy tan chảy từ bên trong."
                .to_string(),
            price: Price::new(45_000),
            image: "https://images.mianbakery.vn/banh-mi-pho-mai-chay.jpg".to_string(),
            category: "Mặn".to_string(),
            target_qty: 10,
            is_best_seller: true,
            is_new: false,
            video_url: None,
            article_links: Vec::new(),
            reviews: Vec::new(),
        },
        Product {
            id: ProductId::new("2"),
            name: "Bánh Kem Dâu Tây".to_string(),
            description: "Cốt bông lan mềm ẩm, kết hợp cùng dâu tây Đà Lạt chín mọng."
                .to_string(),
            price: Price::new(55_000),
            image: "https://images.mianbakery.vn/banh-kem-dau-tay.jpg".to_string(),
            category: "Ngọt".to_string(),
            target_qty: 5,
            is_best_seller: false,
            is_new: true,
            video_url: None,
            article_links: Vec::new(),
            reviews: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date")
    }

    #[test]
    fn test_review_rating_bounds() {
        assert!(ProductReview::new("Minh Anh", 0, "ngon", day(1)).is_err());
        assert!(ProductReview::new("Minh Anh", 6, "ngon", day(1)).is_err());
        assert!(ProductReview::new("Minh Anh", 5, "ngon", day(1)).is_ok());
    }

    #[test]
    fn test_review_requires_comment() {
        assert_eq!(
            ProductReview::new("Minh Anh", 4, "  ", day(1)),
            Err(ValidationError::MissingField("comment"))
        );
    }

    #[test]
    fn test_latest_review_by() {
        let mut product = default_catalog().remove(0);
        product.add_review(ProductReview::new("Minh Anh", 5, "ngon", day(1)).expect("review"));
        product.add_review(ProductReview::new("Lan", 4, "ok", day(5)).expect("review"));
        product.add_review(ProductReview::new("Minh Anh", 2, "hơi ngọt", day(3)).expect("review"));

        let latest = product.latest_review_by("Minh Anh").expect("has review");
        assert_eq!(latest.comment, "hơi ngọt");
        assert!(latest.is_negative());
        assert!(product.latest_review_by("Hoàng").is_none());
    }

    #[test]
    fn test_average_rating() {
        let mut product = default_catalog().remove(1);
        assert!(product.average_rating().is_none());
        product.add_review(ProductReview::new("A", 5, "x", day(1)).expect("review"));
        product.add_review(ProductReview::new("B", 4, "y", day(1)).expect("review"));
        let avg = product.average_rating().expect("avg");
        assert!((avg - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate() {
        let mut product = default_catalog().remove(0);
        assert!(product.validate().is_ok());

        product.name = " ".to_string();
        assert_eq!(
            product.validate(),
            Err(ValidationError::MissingField("product name"))
        );

        product.name = "Bánh".to_string();
        product.price = Price::new(-1);
        assert_eq!(
            product.validate(),
            Err(ValidationError::NegativeAmount("price"))
        );
    }

    #[test]
    fn test_serde_omits_empty_optionals() {
        let product = default_catalog().remove(0);
        let json = serde_json::to_value(&product).expect("serialize");
        assert_eq!(json["targetQty"], 10);
        assert!(json.get("reviews").is_none());
        assert!(json.get("videoUrl").is_none());

        let parsed: Product = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, product);
    }
}
