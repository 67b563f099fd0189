//! User Management API Library
//!
//! This library provides a small REST service for managing users, including
//! the domain model, repository adapters, the user service and the HTTP layer.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod service;
