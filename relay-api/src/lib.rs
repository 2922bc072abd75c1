pub mod handlers;
pub mod server;

pub use server::{cors_layer, create_router, run_server};
