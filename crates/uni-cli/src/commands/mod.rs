pub mod filter;
pub mod list;
pub mod options;
pub mod saved;
pub mod watch;
