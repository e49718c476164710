//! Transformation module.
//!
//! - Categories: technology label → category lookup
//! - Transformer: column operations on a candidate table
//! - Pipeline: the full batch run

pub mod categories;
pub mod pipeline;
pub mod transformer;

pub use categories::{categorize, mapping_description, OTHER_CATEGORY, TECHNOLOGY_CATEGORIES};
pub use pipeline::*;
pub use transformer::*;
