//! Request and response bodies

pub mod settings;
pub mod hooks;
pub mod admin;
