//! Shared application state for the gateway

use std::sync::Arc;
use std::time::Duration;

use tollgate_users::{AuthUseCase, RequestContext};

/// Services and limits shared by every handler
#[derive(Clone)]
pub struct GatewayState {
    pub auth: Arc<AuthUseCase>,
    pub request_timeout: Duration,
}

impl GatewayState {
    pub fn new(auth: Arc<AuthUseCase>, request_timeout: Duration) -> Self {
        Self {
            auth,
            request_timeout,
        }
    }

    /// Fresh cancellation/deadline handle for one request.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout)
    }
}
