//! Camp announcement system: a websocket hub that fans out event and
//! schedule changes, and an announcer daemon that joins an event,
//! compiles its schedule into spoken alerts and plays them on time.

pub mod announcer;
pub mod common;
pub mod config;
pub mod model;
pub mod protocol;
pub mod server;
pub mod sounds;
pub mod store;
pub mod transport;
