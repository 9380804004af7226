// cartflow/src/models/mod.rs

//! Rows as the remote cart store returns them.

pub mod cart_item;
pub mod product;

pub use cart_item::CartItem;
pub use product::{ParseEnumError, Product, ProductCategory, ProductStatus};
