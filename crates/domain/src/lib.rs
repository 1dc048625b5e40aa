//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod acl;
mod fact;
mod security;

pub use acl::{AclEntry, AclEntryId};
pub use fact::{AccessMode, Fact, FactId};
pub use security::Permission;
