//! Shared application state.

use std::sync::Arc;

use zepp_ocr::TextRecognizer;
use zepp_store::{JobStore, UserStore};

use crate::config::Settings;
use crate::runner::JobRunner;

/// Everything the request handlers need, injected at startup.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub jobs: Arc<dyn JobStore>,
    pub users: Arc<dyn UserStore>,
    pub runner: JobRunner,
    /// OCR front-end; `None` when no model directory is configured.
    pub ocr: Option<Arc<dyn TextRecognizer>>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        jobs: Arc<dyn JobStore>,
        users: Arc<dyn UserStore>,
        ocr: Option<Arc<dyn TextRecognizer>>,
    ) -> Self {
        let runner = JobRunner::new(jobs.clone(), users.clone());
        Self {
            settings: Arc::new(settings),
            jobs,
            users,
            runner,
            ocr,
        }
    }
}
