pub mod access_jwt;
pub mod challenge;
pub mod claims;
pub mod credential;
pub mod error;
pub mod factory;
pub mod gateway;
pub mod identity;
pub mod policy;

pub use error::{AuthError, Stage};
pub use factory::build_gateway;
pub use gateway::Gateway;
pub use identity::Identity;
