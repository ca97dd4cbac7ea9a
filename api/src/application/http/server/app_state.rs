use std::sync::Arc;

use plateful_core::application::PlatefulService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: PlatefulService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: PlatefulService) -> Self {
        Self { args, service }
    }
}
