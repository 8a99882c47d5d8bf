pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use client::CancellableRequest;
pub use request::build_chat_request;
pub use response::{HttpReply, json_response, read_json_reply};
