// Authentication: token issuance, verification, credential hashing

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;

pub use jwt::*;
pub use middleware::*;
pub use models::*;
pub use service::*;
