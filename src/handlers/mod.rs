pub mod chat;
pub mod history;
pub mod parameters;
pub mod status;

pub use chat::handle_chat_submit;
pub use history::{CarouselMove, handle_carousel_move, handle_clear_history, handle_get_history};
pub use parameters::{
    handle_get_parameters, handle_parameter_ranges, handle_reset_parameters, handle_set_parameter,
};
pub use status::{handle_list_models, handle_session_state};
