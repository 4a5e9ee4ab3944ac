#![warn(clippy::pedantic)]

pub mod assembler;
pub mod config;
pub mod decoder;
pub mod error;
pub mod payload;

mod decompression;

pub use config::DecoderConfig;
pub use decoder::TicketDecoder;
pub use error::{DecodeError, Stage};
pub use payload::decode_payload;
