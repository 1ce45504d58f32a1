use serde::{Deserialize, Serialize};

pub type ProductId = i32;

pub const GREETING: &str = "Hello from ProductAPi";

/// The three downstream services feeding a composite, in fetch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Product,
    Recommendations,
    Reviews,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Product, Source::Recommendations, Source::Reviews];

    pub fn label(&self) -> &'static str {
        match self {
            Source::Product => "product",
            Source::Recommendations => "recommendation",
            Source::Reviews => "review",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub weight: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product_id: ProductId,
    pub recommendation_id: i32,
    pub author: String,
    pub rate: i32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub product_id: ProductId,
    pub review_id: i32,
    pub author: String,
    pub subject: String,
    pub content: String,
}

/// The aggregated view of one product.
///
/// Each field is `None` when the matching downstream source failed under a
/// tolerate-and-null policy. Absent fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeResult {
    pub product: Option<Product>,
    pub recommendations: Option<Vec<Recommendation>>,
    pub reviews: Option<Vec<Review>>,
    pub service_address: String,
}

impl CompositeResult {
    pub fn new(
        product: Option<Product>,
        recommendations: Option<Vec<Recommendation>>,
        reviews: Option<Vec<Review>>,
        service_address: impl Into<String>,
    ) -> Self {
        Self {
            product,
            recommendations,
            reviews,
            service_address: service_address.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.product.is_some() && self.recommendations.is_some() && self.reviews.is_some()
    }
}

/// Body of the liveness route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Greeting {
    pub timestamp: String,
    pub content: String,
}

impl Greeting {
    pub fn now() -> Self {
        Self {
            timestamp: chrono::Local::now().to_rfc2822(),
            content: GREETING.to_string(),
        }
    }
}
