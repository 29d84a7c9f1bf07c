pub mod command_line;
pub mod constants;
pub mod deserialize;
pub mod manifest;
