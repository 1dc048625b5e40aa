//! Application services and ports.

#![forbid(unsafe_code)]

mod access_grant_service;
mod acl_ports;
mod authorization_service;

pub use access_grant_service::AccessGrantService;
pub use acl_ports::{AclInsertOutcome, AclStore, FactLookup, GrantFactAccessInput};
pub use authorization_service::{
    AuthorizationChecker, AuthorizationRepository, AuthorizationService,
};
