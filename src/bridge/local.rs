use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::MessageChannel;
use crate::error::AppResult;
use crate::host::HostPage;
use crate::looper::LooperHandle;
use crate::protocol::{Request, Response, TabInfo};

/// In-process broker: the page and its Looper live in this process.
pub struct LocalChannel {
    looper: LooperHandle,
    page: Arc<dyn HostPage>,
    tab_tx: Option<broadcast::Sender<TabInfo>>,
}

impl LocalChannel {
    #[must_use]
    pub const fn new(
        looper: LooperHandle,
        page: Arc<dyn HostPage>,
        tab_tx: Option<broadcast::Sender<TabInfo>>,
    ) -> Self {
        Self {
            looper,
            page,
            tab_tx,
        }
    }
}

#[async_trait]
impl MessageChannel for LocalChannel {
    async fn active_tab(&self) -> AppResult<TabInfo> {
        Ok(TabInfo::new(Some(self.page.location())))
    }

    async fn send(&self, request: Request) -> AppResult<Response> {
        self.looper.request(request).await
    }

    fn tab_events(&self) -> Option<broadcast::Receiver<TabInfo>> {
        self.tab_tx.as_ref().map(broadcast::Sender::subscribe)
    }
}
