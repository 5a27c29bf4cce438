pub mod cats;
pub mod handlers;
pub mod likes;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
