// Application service layer
// Business rules over the repository ports and the wire <-> storage mapping

pub mod dto;
pub mod errors;
pub mod user_service;

pub use dto::UserDto;
pub use errors::{ServiceError, ServiceResult};
pub use user_service::UserService;
