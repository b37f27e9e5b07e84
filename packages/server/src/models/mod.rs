pub mod assignment;
pub mod auth;
pub mod category;
pub mod chat;
pub mod file;
pub mod shared;
pub mod user;
pub mod writing;
