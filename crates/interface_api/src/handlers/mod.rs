//! Request handlers

pub mod health;
pub mod settings;
pub mod admin;
pub mod hooks;
