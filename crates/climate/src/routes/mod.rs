pub mod home;
pub mod observations;
pub mod summaries;

pub use home::*;
pub use observations::*;
pub use summaries::*;
