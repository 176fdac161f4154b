// The bridge process the browser spawns for each session: native messaging
// on stdio toward the extension, one socket toward the controller, schema
// validation on every hop.

pub mod bridge;
pub mod config;
pub mod native_messaging;

pub use bridge::{run, RelayError};
pub use native_messaging::NativeMessagingHost;
