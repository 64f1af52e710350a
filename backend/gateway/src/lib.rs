//! `recibo-gateway` — HTTP entry point for inbox provider webhooks.

pub mod server;
pub mod signature;
pub mod webhook;

pub use server::{router, start_server, GatewayState};
pub use signature::{sign, verify_signature};
