mod command;
mod history;
mod invoker;

pub use command::*;
pub use history::*;
pub use invoker::*;
