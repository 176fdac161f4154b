// Controller-resident half of the bridge: the socket endpoint the relay
// connects to, the registry of deck actions, and the reconciliation logic
// that maps status updates onto them.

pub mod actions;
pub mod config;
pub mod ipc_server;
pub mod plugin;
pub mod registry;

pub use actions::{ActionDescriptor, ActionInstance, ActionKind, IconSurface, TriState, CATALOG};
pub use ipc_server::{ServerError, SocketIpcServer};
pub use plugin::{CommandError, MeetPlugin};
pub use registry::DeckRegistry;
