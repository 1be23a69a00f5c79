use std::sync::Arc;

use crate::bitquery::BitqueryClient;
use crate::respository::RepositoryWrapper;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<RepositoryWrapper>,
    pub bitquery: BitqueryClient,
}

impl AppState {
    pub fn new(repository: Arc<RepositoryWrapper>, bitquery: BitqueryClient) -> Self {
        Self {
            repository,
            bitquery,
        }
    }
}
