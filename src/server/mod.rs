// Server module entry
// Listener setup, connection serving and shutdown signals

pub mod connection;
pub mod listener;
pub mod serve;
pub mod signal;

pub use listener::create_listener;
pub use serve::run_server;
pub use signal::start_signal_handler;
