use std::sync::Arc;

use catalog::Tab;
use minijinja::Environment;
use tokio::task::spawn_blocking;

use super::{
    cache::TabCache,
    config::Config,
    database::{Rows, Settings, fetch_rows, fetch_settings},
    error::AppError,
    render::init_templates,
};

pub struct State {
    pub config: Config,
    pub cache: TabCache,
    pub templates: Environment<'static>,
}

impl State {
    pub fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let templates = init_templates()?;

        Ok(Arc::new(Self {
            config,
            cache: TabCache::new(),
            templates,
        }))
    }

    pub async fn rows(self: &Arc<Self>, tab: Tab) -> Result<Rows, AppError> {
        let state = self.clone();

        let rows = spawn_blocking(move || {
            state
                .cache
                .get_or_try_insert_with(tab, || fetch_rows(&state.config.db_path, tab))
        })
        .await??;

        Ok(rows)
    }

    pub async fn settings(&self) -> Result<Settings, AppError> {
        let db_path = self.config.db_path.clone();

        let settings = spawn_blocking(move || fetch_settings(&db_path)).await??;

        Ok(settings)
    }
}
