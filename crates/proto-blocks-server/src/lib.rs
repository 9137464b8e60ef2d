//! Development server for proto block patterns.
//!
//! Serves pattern pages in preview mode, a block rendering API for editors, and
//! live reload over a WebSocket driven by a file watcher.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{router, DevServer, DevServerConfig, RenderRequest, ServerError, ServerState};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
