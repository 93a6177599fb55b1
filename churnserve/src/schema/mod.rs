//! Request schema: the exact input contract of the prediction endpoint.

pub mod fields;
mod record;
mod validate;

pub use fields::{FieldKind, FieldSpec, FIELDS};
pub use record::{CustomerRecord, FeatureValue};
pub use validate::validate;
