// User domain module
// Contains the user entity as it is persisted

#![allow(clippy::module_inception)]

pub mod user;

pub use user::{User, FIRST_USER_ID};
