mod config;
mod router;

pub use config::*;
pub use router::*;
