use std::time::Duration;

use crate::storage::LoopRecord;
use crate::video::VideoId;

/// Inputs to the Looper other than command requests.
#[derive(Debug, Clone, PartialEq)]
pub enum LooperEvent {
    /// The page finished its initial load.
    PageReady,
    /// The document structure changed; the address may have changed too.
    DomMutated,
    /// The video's position advanced.
    TimeUpdate,
    /// The video reached its end.
    Ended,
    Timer(LooperTimer),
    RecordLoaded {
        video_id: VideoId,
        record: Option<LoopRecord>,
    },
    ResumeFailed {
        attempt: u32,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LooperTimer {
    SearchRetry { generation: u64 },
    Settle { generation: u64 },
    EndedRestart,
    ResumeRetry { attempt: u32 },
}

/// Work the runtime performs on the Looper's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum LooperEffect {
    Schedule { delay: Duration, timer: LooperTimer },
    Persist { video_id: VideoId, record: LoopRecord },
    Load { video_id: VideoId },
    Resume { attempt: u32 },
    Notify { message: &'static str },
}
