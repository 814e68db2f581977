pub mod controller;
pub mod crud;
pub mod interface;
pub mod memory;
pub mod middleware;
pub mod model;
pub mod routes;
pub mod schema;
pub mod session;
pub mod verification;

pub use routes::auth_routes;
