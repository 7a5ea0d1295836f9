//! # Blogicum Core
//!
//! The domain layer of the Blogicum blogging platform.
//! This crate contains the entities, the visibility and ownership rules,
//! the repository ports and the application services. It has zero
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;
mod validation;

pub use error::{DomainError, DomainResult};
pub use pagination::{POSTS_PER_PAGE, Page, PageRequest};
