use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::AppResult;
use crate::protocol::{Request, Response, TabInfo};

#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// The tab the user is currently looking at.
    ///
    /// # Errors
    ///
    /// Returns an error when the broker cannot be reached.
    async fn active_tab(&self) -> AppResult<TabInfo>;

    /// Delivers a request to the page context and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be delivered or no response
    /// arrives.
    async fn send(&self, request: Request) -> AppResult<Response>;

    /// Stream of tab updates, when the broker reports them.
    fn tab_events(&self) -> Option<broadcast::Receiver<TabInfo>> {
        None
    }
}
