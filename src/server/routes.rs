use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;
use warp::Filter;

use crate::backend::CompletionBackend;
use crate::constants::MAX_JSON_BODY_SIZE_BYTES;
use crate::error::ChatError;
use crate::handlers::{self, CarouselMove};
use crate::orchestrator::Orchestrator;

pub fn create_routes<B: CompletionBackend + 'static>(
    orchestrator: Arc<Orchestrator<B>>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_orchestrator = warp::any().map(move || orchestrator.clone());

    let state_route = warp::path!("api" / "state")
        .and(warp::get())
        .and(with_orchestrator.clone())
        .and_then(|o: Arc<Orchestrator<B>>| async move {
            handlers::handle_session_state(o)
                .await
                .map_err(warp::reject::custom)
        });

    let chat_route = warp::path!("api" / "chat")
        .and(warp::post())
        .and(tolerant_json_body())
        .and(with_orchestrator.clone())
        .and_then(|body: Value, o: Arc<Orchestrator<B>>| async move {
            handlers::handle_chat_submit(o, body)
                .await
                .map_err(warp::reject::custom)
        });

    let get_parameters_route = warp::path!("api" / "parameters")
        .and(warp::get())
        .and(with_orchestrator.clone())
        .and_then(|o: Arc<Orchestrator<B>>| async move {
            handlers::handle_get_parameters(o)
                .await
                .map_err(warp::reject::custom)
        });

    let parameter_ranges_route = warp::path!("api" / "parameters" / "ranges")
        .and(warp::get())
        .map(handlers::handle_parameter_ranges);

    let reset_parameters_route = warp::path!("api" / "parameters" / "reset")
        .and(warp::post())
        .and(with_orchestrator.clone())
        .and_then(|o: Arc<Orchestrator<B>>| async move {
            handlers::handle_reset_parameters(o)
                .await
                .map_err(warp::reject::custom)
        });

    let set_parameter_route = warp::path!("api" / "parameters" / String)
        .and(warp::put())
        .and(tolerant_json_body())
        .and(with_orchestrator.clone())
        .and_then(|key: String, body: Value, o: Arc<Orchestrator<B>>| async move {
            handlers::handle_set_parameter(o, key, body)
                .await
                .map_err(warp::reject::custom)
        });

    let get_history_route = warp::path!("api" / "history")
        .and(warp::get())
        .and(with_orchestrator.clone())
        .and_then(|o: Arc<Orchestrator<B>>| async move {
            handlers::handle_get_history(o)
                .await
                .map_err(warp::reject::custom)
        });

    let clear_history_route = warp::path!("api" / "history")
        .and(warp::delete())
        .and(with_orchestrator.clone())
        .and_then(|o: Arc<Orchestrator<B>>| async move {
            handlers::handle_clear_history(o)
                .await
                .map_err(warp::reject::custom)
        });

    let next_endpoint = warp::path!("api" / "history" / "next").map(|| CarouselMove::Next);
    let previous_endpoint =
        warp::path!("api" / "history" / "previous").map(|| CarouselMove::Previous);
    let jump_endpoint = warp::path!("api" / "history" / "jump" / usize).map(CarouselMove::Jump);

    let carousel_route = next_endpoint
        .or(previous_endpoint)
        .unify()
        .or(jump_endpoint)
        .unify()
        .and(warp::post())
        .and(with_orchestrator.clone())
        .and_then(|movement: CarouselMove, o: Arc<Orchestrator<B>>| async move {
            handlers::handle_carousel_move(o, movement)
                .await
                .map_err(warp::reject::custom)
        });

    let models_route = warp::path!("api" / "models")
        .and(warp::get())
        .and(with_orchestrator.clone())
        .and_then(|o: Arc<Orchestrator<B>>| async move {
            handlers::handle_list_models(o)
                .await
                .map_err(warp::reject::custom)
        });

    state_route
        .or(chat_route)
        .or(parameter_ranges_route)
        .or(reset_parameters_route)
        .or(get_parameters_route)
        .or(set_parameter_route)
        .or(carousel_route)
        .or(get_history_route)
        .or(clear_history_route)
        .or(models_route)
}

/// JSON body parser that does not insist on a Content-Type header.
pub fn tolerant_json_body() -> impl Filter<Extract = (Value,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_JSON_BODY_SIZE_BYTES)
        .and(warp::body::bytes())
        .and_then(|body: Bytes| async move {
            if body.is_empty() {
                return Err(warp::reject::custom(ChatError::validation(
                    "missing JSON body",
                )));
            }
            serde_json::from_slice::<Value>(&body).map_err(|err| {
                warp::reject::custom(ChatError::validation(&format!(
                    "invalid JSON payload: {}",
                    err
                )))
            })
        })
}
