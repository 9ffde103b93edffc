//! CLI command implementations

pub mod get;
pub mod list;
pub mod path;

pub use get::execute as get;
pub use list::execute as list;
pub use path::execute as path;
