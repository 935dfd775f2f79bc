use std::sync::Arc;

use crate::pipeline::ChatPipeline;

#[derive(Clone)]
pub struct HandlerState {
    pub pipeline: Arc<ChatPipeline>,
}

impl HandlerState {
    pub fn new(pipeline: Arc<ChatPipeline>) -> Self {
        Self { pipeline }
    }
}
