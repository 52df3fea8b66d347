mod rules;
mod technology;

pub use rules::*;
pub use technology::*;
