use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::args::{PageArgs, default_playlist};
use crate::error::AppResult;
use crate::host::ToggleState;
use crate::host::sim::{SimPage, SimPlayerConfig, spawn_sim_player};
use crate::looper::{LooperHandle, LooperTiming, spawn_looper};
use crate::shutdown::ShutdownSender;
use crate::storage::{LoopStore, MemoryStore, SqliteStore};

/// Address the simulated tab shows before the first video loads.
const START_LOCATION: &str = "https://www.youtube.com/";

/// The simulated tab with its Looper and player tasks.
pub(super) struct PageRuntime {
    pub(super) page: Arc<SimPage>,
    pub(super) looper: LooperHandle,
    tasks: Vec<JoinHandle<()>>,
}

impl PageRuntime {
    /// Waits for the page tasks after shutdown has been signalled.
    pub(super) async fn join(self) {
        for task in self.tasks {
            if let Err(err) = task.await {
                debug!("Page task ended abnormally: {}", err);
            }
        }
    }
}

async fn open_store(args: &PageArgs) -> AppResult<Arc<dyn LoopStore>> {
    if args.memory_store {
        info!("Keeping loop records in memory.");
        return Ok(Arc::new(MemoryStore::new()));
    }
    info!("Loop records stored in {}", args.db);
    Ok(Arc::new(SqliteStore::open(Path::new(&args.db)).await?))
}

pub(super) async fn start_page(
    args: &PageArgs,
    timing: LooperTiming,
    shutdown_tx: &ShutdownSender,
) -> AppResult<PageRuntime> {
    let store = open_store(args).await?;
    let playlist = if args.videos.is_empty() {
        default_playlist()
    } else {
        args.videos.clone()
    };
    let toggle = if args.autoplay {
        ToggleState::On
    } else {
        ToggleState::Off
    };
    let page = Arc::new(SimPage::new(START_LOCATION).with_autoplay(toggle, args.autoplay));

    let (looper, looper_task) = spawn_looper(page.clone(), store, timing, shutdown_tx);
    let config = SimPlayerConfig {
        tick: args.tick,
        autonav_delay: args.autonav_delay,
        ..SimPlayerConfig::default()
    };
    let player_task = spawn_sim_player(
        Arc::clone(&page),
        playlist,
        config,
        looper.clone(),
        shutdown_tx,
    );

    Ok(PageRuntime {
        page,
        looper,
        tasks: vec![looper_task, player_task],
    })
}
