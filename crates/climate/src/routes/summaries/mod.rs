pub mod summary_routes;

pub use summary_routes::*;
