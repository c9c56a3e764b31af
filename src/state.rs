use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Database;
use crate::users::{MongoUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, database: &Database) -> Self {
        let users = Arc::new(MongoUserStore::new(database.users())) as Arc<dyn UserStore>;
        Self::from_parts(config, users)
    }

    pub fn from_parts(config: Arc<AppConfig>, users: Arc<dyn UserStore>) -> Self {
        Self { config, users }
    }

    #[cfg(test)]
    pub fn fake() -> (Self, Arc<crate::users::repo::memory::MemoryUserStore>) {
        let config = AppConfig::from_lookup(|key| match key {
            "DOCS_URL" => Some("https://docs.test.local".into()),
            _ => None,
        })
        .expect("test config");
        let store = Arc::new(crate::users::repo::memory::MemoryUserStore::default());
        let state = Self::from_parts(Arc::new(config), store.clone() as Arc<dyn UserStore>);
        (state, store)
    }
}
