pub mod command;
pub mod convert;
pub mod list;
mod progress;
