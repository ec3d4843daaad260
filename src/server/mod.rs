pub mod broadcast;
pub mod connection;
pub mod handler;
pub mod state;

pub use broadcast::{
    broadcast_to_room, mark_session_as_updated, trigger_activities_update, trigger_event_update,
};
pub use connection::Connection;
pub use handler::handle_request;
pub use state::AppState;
