//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, password changes and bearer token handling live here,
//! independent of the web framework.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use service::AuthService;
