pub mod dot;

pub use dot::start_dot_server;
