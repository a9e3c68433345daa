//! Organisation (tenant) entity.

pub mod model;

pub use model::Organisation;
