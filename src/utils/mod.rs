pub mod command;
pub mod time;

pub use command::*;
pub use time::*;
