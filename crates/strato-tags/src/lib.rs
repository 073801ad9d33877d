//! strato-tags
//!
//! Logical tag sets and their reconciliation against remote services.
//!
//! A `KeyValueTagSet` is the in-process representation of a resource's tags;
//! the wire codec converts it to and from the list-of-pairs shape remote APIs
//! speak, and `reconcile` drives the minimal set of remote calls needed to
//! converge remote state to a desired set, through either separate tag/untag
//! calls or a single full-replace call, depending on what the backing service
//! offers.

pub mod error;
pub mod policy;
pub mod reconcile;
pub mod set;
pub mod wire;

pub use crate::error::TagError;
pub use crate::policy::{DefaultTags, IgnoreTags, TagPolicy};
pub use crate::reconcile::{reconcile, AdditiveTagging, ReplaceAllTagging, TaggingStyle};
pub use crate::set::{KeyValueTagSet, Provenance, TagValue};
pub use crate::wire::WireTag;
