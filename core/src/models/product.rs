// cartflow/src/models/product.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
  Beat,
  Merch,
  Nft,
}

impl ProductCategory {
  pub fn as_str(self) -> &'static str {
    match self {
      ProductCategory::Beat => "beat",
      ProductCategory::Merch => "merch",
      ProductCategory::Nft => "nft",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
  Active,
  Draft,
  SoldOut,
  Archived,
}

impl ProductStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      ProductStatus::Active => "active",
      ProductStatus::Draft => "draft",
      ProductStatus::SoldOut => "sold_out",
      ProductStatus::Archived => "archived",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: '{value}'")]
pub struct ParseEnumError {
  pub kind: &'static str,
  pub value: String,
}

impl FromStr for ProductCategory {
  type Err = ParseEnumError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "beat" => Ok(ProductCategory::Beat),
      "merch" => Ok(ProductCategory::Merch),
      "nft" => Ok(ProductCategory::Nft),
      _ => Err(ParseEnumError {
        kind: "product category",
        value: s.to_string(),
      }),
    }
  }
}

impl FromStr for ProductStatus {
  type Err = ParseEnumError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "active" => Ok(ProductStatus::Active),
      "draft" => Ok(ProductStatus::Draft),
      "sold_out" => Ok(ProductStatus::SoldOut),
      "archived" => Ok(ProductStatus::Archived),
      _ => Err(ParseEnumError {
        kind: "product status",
        value: s.to_string(),
      }),
    }
  }
}

impl fmt::Display for ProductCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl fmt::Display for ProductStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A catalog product as joined into each cart row. Read-only from the cart's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Unit price in minor currency units.
  pub price_cents: i64,
  pub category: ProductCategory,
  pub status: ProductStatus,
  /// Free-form metadata (image URL, BPM, token id...).
  #[serde(default)]
  pub metadata: serde_json::Value,
}

impl Product {
  pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: i64, category: ProductCategory) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      description: None,
      price_cents,
      category,
      status: ProductStatus::Active,
      metadata: serde_json::Value::Null,
    }
  }

  pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
    self.metadata = metadata;
    self
  }

  pub fn image_url(&self) -> Option<&str> {
    self.metadata.get("image_url").and_then(|v| v.as_str())
  }
}
