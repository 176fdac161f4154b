// This crate centralizes Inter-Process Communication definitions and logic
// shared by the relay and the controller plugin.

pub mod frame; // Length-prefixed JSON framing over any byte stream
pub mod messages; // Command and StatusUpdate schemas
pub mod transport; // Socket address selection
pub mod validate; // Schema validation gate between the two peers

pub use frame::{ChannelError, FramedReader, FramedWriter, FramingError, MAX_FRAME_BYTES};
pub use messages::{ActionCommand, Control, ControlState, MeetAction, StatusTag, StatusUpdate};
pub use transport::{default_socket_path, IpcAddress, DEFAULT_TCP_PORT};
pub use validate::{validate_command, validate_status, ValidationError};
