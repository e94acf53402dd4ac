use crate::client::{ClientFactory, IstioClient};
use crate::Result;
use std::sync::Arc;
use tracing::trace;

/// Client factory that ignores credentials and always hands out one client
#[derive(Clone)]
pub struct ClientFactoryMock {
    client: Arc<dyn IstioClient>,
}

impl ClientFactoryMock {
    pub fn new(client: Arc<dyn IstioClient>) -> Self {
        Self { client }
    }
}

impl ClientFactory for ClientFactoryMock {
    fn get_client(&self, _token: &str) -> Result<Arc<dyn IstioClient>> {
        trace!("handing out mocked client");
        Ok(Arc::clone(&self.client))
    }
}
