// Infrastructure layer module
// Contains the storage adapters behind the domain repository ports

pub mod repositories;
