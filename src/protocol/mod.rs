pub mod messages;

pub use messages::{ClientRequest, PlayerControl, ServerMessage};
