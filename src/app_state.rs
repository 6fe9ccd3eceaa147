use crate::service::TitleService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub titles: Arc<TitleService>,
}

impl AppState {
    pub fn new(titles: TitleService) -> Self {
        Self {
            titles: Arc::new(titles),
        }
    }
}
