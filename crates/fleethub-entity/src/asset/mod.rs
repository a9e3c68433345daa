//! Asset (vehicle/plant) entity.

pub mod model;

pub use model::{Asset, AssetStatus};
