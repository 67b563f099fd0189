// Domain layer module exports
// Domain is independent of infrastructure and transport concerns

pub mod repositories;
pub mod user;
