use serde::{Deserialize, Serialize};
use std::fmt;

/// Product identifier, which the remote source sends as either a number or a string
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

/// Aggregate customer rating
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

/// A single catalog entry as returned by the remote source
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
}

impl Product {
    pub fn new(id: i64, title: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Product {
            id: ProductId::Number(id),
            title: title.into(),
            price,
            image: image.into(),
            description: None,
            category: None,
            rating: None,
        }
    }

    /// Price formatted to two decimal places
    pub fn price_label(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Prices must be finite and non-negative
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}
