//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_acl_store;
mod in_memory_fact_repository;
mod postgres_acl_store;
mod postgres_authorization_repository;
mod postgres_fact_repository;

pub use in_memory_acl_store::InMemoryAclStore;
pub use in_memory_fact_repository::InMemoryFactRepository;
pub use postgres_acl_store::PostgresAclStore;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_fact_repository::PostgresFactRepository;
