//! The rated resource: identity, descriptive fields, scores and staleness clock.

pub mod entity;
pub mod input;
pub mod types;

#[cfg(test)]
mod tests;

pub use entity::Resource;
pub use input::{RatingInput, RatingResult, ResourceInput};
pub use types::{META_HAS_CTA, META_REVIEW_COUNT, ResourceId, ResourceMetadata};
