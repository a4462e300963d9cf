//! Configuration loader and schema types.
//!
//! Settings provide the defaults for every source option the command line
//! accepts, plus the argv of the filesystem flush command.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;
