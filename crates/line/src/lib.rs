//! LINE Messaging API adapter.
//!
//! Inbound: verify `X-Line-Signature` and normalize webhook events.
//! Outbound: encode reply templates and deliver them with a reply token.

pub mod client;
pub mod error;
pub mod message;
pub mod signature;
pub mod webhook;

pub use {
    client::{LineClient, Messenger, UNKNOWN_DISPLAY_NAME},
    error::LineError,
    message::OutboundMessage,
    signature::{SIGNATURE_HEADER, sign, verify},
    webhook::parse_request,
};
