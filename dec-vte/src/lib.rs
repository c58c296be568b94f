mod actor;
mod enums;
mod params;
mod parser;
mod reader;
mod transitions;

pub use actor::{Actor, Context};
pub use enums::{Action, State};
pub use params::{Param, Params};
pub use parser::{Error, Parser};
