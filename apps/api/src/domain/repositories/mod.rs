// Repository ports implemented by the infrastructure layer

pub mod user_repository;

pub use user_repository::{RepositoryError, UserRepository, UserStore, UserTransaction};
