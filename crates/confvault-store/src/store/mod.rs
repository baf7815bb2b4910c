//! Storage backend abstraction.
//!
//! This module defines the trait every backend implements and the record
//! type exchanged with it.

mod record;
mod traits;

pub use record::StoredRecord;
pub use traits::ConfigStore;
