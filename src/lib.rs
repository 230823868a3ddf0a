pub mod api;
pub mod client;
pub mod config;
pub mod console;
pub mod dirs;
pub mod dispatch;
pub mod display;
pub mod feedback;
pub mod filelock;
pub mod logs;
pub mod session;
pub mod table;
pub mod time;
