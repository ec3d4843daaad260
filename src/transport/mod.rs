pub mod websocket_server;

pub use websocket_server::router;
