use std::sync::Arc;

use serde::Serialize;

use crate::backend::CompletionBackend;
use crate::error::ChatError;
use crate::http::json_response;
use crate::orchestrator::{Orchestrator, ResponseRecord};

#[derive(Debug, Serialize)]
struct CarouselPosition {
    current_index: usize,
    current: Option<ResponseRecord>,
}

#[derive(Debug, Clone, Copy)]
pub enum CarouselMove {
    Next,
    Previous,
    Jump(usize),
}

pub async fn handle_get_history<B: CompletionBackend>(
    orchestrator: Arc<Orchestrator<B>>,
) -> Result<warp::reply::Response, ChatError> {
    Ok(json_response(&orchestrator.history().await))
}

pub async fn handle_carousel_move<B: CompletionBackend>(
    orchestrator: Arc<Orchestrator<B>>,
    movement: CarouselMove,
) -> Result<warp::reply::Response, ChatError> {
    let current = match movement {
        CarouselMove::Next => orchestrator.next().await,
        CarouselMove::Previous => orchestrator.previous().await,
        CarouselMove::Jump(index) => orchestrator.jump_to(index).await?,
    };
    let position = CarouselPosition {
        current_index: orchestrator.current_index().await,
        current,
    };
    Ok(json_response(&position))
}

pub async fn handle_clear_history<B: CompletionBackend>(
    orchestrator: Arc<Orchestrator<B>>,
) -> Result<warp::reply::Response, ChatError> {
    orchestrator.clear_history().await;
    Ok(json_response(&orchestrator.snapshot().await))
}
