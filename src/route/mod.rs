mod cardinal;
mod element;
mod lroute;
mod normalize;
mod offset;
mod planner;
mod state;
mod tracer;
mod waypoint;

pub use cardinal::*;
pub use element::*;
pub use lroute::*;
pub use normalize::*;
pub use offset::*;
pub use planner::*;
pub use state::*;
pub use tracer::*;
pub use waypoint::*;
