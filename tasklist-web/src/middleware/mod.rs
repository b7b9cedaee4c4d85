/// Middleware for the web server
///
/// The session auth gate lives next to the router in `app`, since it needs
/// the application state.

pub mod security;
