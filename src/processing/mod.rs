//! Input validation and normalization ahead of metrics gathering.

pub mod error;
pub mod normalize;
pub mod validate;

#[cfg(test)]
mod tests;

pub use error::{ValidationError, ValidationReport};
pub use normalize::{
    clean_text_content, normalize_input, normalize_keywords, normalize_metadata,
    normalize_resource, normalize_url,
};
pub use validate::{
    ValidatedInput, is_valid_url, parse_publication_date, validate_input, validate_resource,
};

use crate::resource::{RatingInput, Resource};

/// Validates and normalizes either input variant into an unrated entity.
///
/// A raw input's identity is derived from the fields as received, so the cache key
/// does not depend on normalization.
pub fn prepare(input: RatingInput) -> Result<Resource, ValidationError> {
    match input {
        RatingInput::Raw(raw) => {
            let id = raw.resource_id();
            let validated = validate_input(&raw)?;
            Ok(normalize_input(id, validated))
        }
        RatingInput::Entity(resource) => {
            let mut resource = *resource;
            validate_resource(&resource)?;
            normalize_resource(&mut resource);
            resource.reset_rating();
            Ok(resource)
        }
    }
}
