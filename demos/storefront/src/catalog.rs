// demos/storefront/src/catalog.rs

use cartflow::{Product, ProductCategory, ProductStatus};
use serde_json::json;

/// Products served by the demo store and seeded into Postgres with `SEED_DB=true`.
pub fn demo_products() -> Vec<Product> {
  vec![
    Product::new("beat-42", "Midnight Drive", 2_999, ProductCategory::Beat).with_metadata(json!({
      "bpm": 92,
      "key": "F minor",
      "image_url": "/static/beats/midnight-drive.png"
    })),
    Product::new("beat-77", "Neon Skyline", 3_499, ProductCategory::Beat).with_metadata(json!({
      "bpm": 128,
      "key": "A minor",
      "image_url": "/static/beats/neon-skyline.png"
    })),
    Product::new("merch-tee", "Logo Tee", 3_500, ProductCategory::Merch)
      .with_metadata(json!({ "sizes": ["S", "M", "L", "XL"], "image_url": "/static/merch/tee.png" })),
    Product::new("merch-cap", "Snapback Cap", 2_500, ProductCategory::Merch)
      .with_metadata(json!({ "image_url": "/static/merch/cap.png" })),
    Product::new("nft-genesis", "Genesis Pass", 120_000, ProductCategory::Nft)
      .with_metadata(json!({ "token_id": 1, "image_url": "/static/nft/genesis.png" })),
    Product {
      status: ProductStatus::SoldOut,
      ..Product::new("nft-founders", "Founders Edition", 250_000, ProductCategory::Nft)
    },
  ]
}
