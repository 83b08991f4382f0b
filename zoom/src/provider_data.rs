//! Provider data structure passed to resources

use crate::api::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct ZoomProviderData {
    pub client: Arc<Client>,
}

impl ZoomProviderData {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}
