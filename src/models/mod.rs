//! Domain model module declarations.

pub mod ids;
pub mod inbox;
pub mod session;
