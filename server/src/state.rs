use std::sync::Arc;

use crate::analyzer::Analyzer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn Analyzer>,
}
