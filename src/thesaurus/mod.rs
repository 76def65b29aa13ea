//! Reference vocabulary (thesaurus) loading and lookup.
//!
//! A thesaurus document declares groups of annotation statements; each
//! statement has a code and a display name. The store keeps document order
//! for both groups and statements, since reports list conclusions in that
//! order.

pub mod store;

pub use store::{Thesaurus, ThesaurusError};
