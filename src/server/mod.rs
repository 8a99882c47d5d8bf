pub mod console;
pub mod rejection;
pub mod routes;

pub use console::ConsoleServer;
pub use rejection::handle_rejection;
