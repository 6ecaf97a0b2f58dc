pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod validation;

pub use error::*;
pub use handlers::*;
pub use routes::*;
