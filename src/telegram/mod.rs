//! Telegram surface: transport implementation, update dispatch, and
//! keyboard construction.

pub mod client;
pub mod dispatch;
pub mod keyboards;
