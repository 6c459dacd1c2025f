pub mod blocks;
pub mod content;
pub mod host_files;
pub mod logging;
pub mod page;
pub mod query;
pub mod server;
pub mod url_command;
