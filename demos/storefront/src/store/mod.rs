// demos/storefront/src/store/mod.rs

pub mod pg;

pub use pg::PgCartStore;
