mod direction;
mod point;
mod rect;
mod shape;

pub use direction::*;
pub use point::*;
pub use rect::*;
pub use shape::*;
