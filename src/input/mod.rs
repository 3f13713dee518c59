pub mod handler;
pub mod mapper;

pub use handler::{InputHandler, KeyAction};
pub use mapper::{InputMapper, request_direction};
