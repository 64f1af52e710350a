//! `recibo-inbox` — inbox provider access and attachment resolution.

pub mod client;
pub mod resolver;

pub use client::{AttachmentFetch, InboxApi, InboxHttpClient, InboxSdk};
pub use resolver::{select_image, AttachmentResolver, Sleeper, TokioSleeper};
