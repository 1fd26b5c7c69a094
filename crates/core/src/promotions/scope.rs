//! Promotion Scope
//!
//! Which cart lines a promotion covers.

use serde::{Deserialize, Serialize};

use crate::carts::CartLine;

/// Product scope a promotion applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductScope {
    /// Every product.
    AllProducts,

    /// Products of a single brand.
    ByBrand {
        /// Brand name
        brand: String,
    },

    /// Products in a single category.
    ByCategory {
        /// Category name
        category: String,
    },
}

impl ProductScope {
    /// Scope covering a brand.
    pub fn brand(brand: impl Into<String>) -> Self {
        Self::ByBrand {
            brand: brand.into(),
        }
    }

    /// Scope covering a category.
    pub fn category(category: impl Into<String>) -> Self {
        Self::ByCategory {
            category: category.into(),
        }
    }

    /// Evaluate the scope against a cart line. Names compare ASCII case-insensitively.
    #[must_use]
    pub fn matches(&self, line: &CartLine) -> bool {
        match self {
            Self::AllProducts => true,
            Self::ByBrand { brand } => line.brand.eq_ignore_ascii_case(brand),
            Self::ByCategory { category } => line.category.eq_ignore_ascii_case(category),
        }
    }
}
