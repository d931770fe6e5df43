//! Sign hola tokens and send them to a server.

pub mod cmd;
pub mod error;
