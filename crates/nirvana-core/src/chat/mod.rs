//! Chat: per-session conversation logs and the turn-taking service.

pub mod conversation;
pub mod service;
