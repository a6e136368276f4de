//! Periodic refresh trigger.

use std::time::Duration;

use roster_core::{
  store::{PageFetcher, SnapshotStore},
  Error,
};
use tokio::{
  task::JoinHandle,
  time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::SyncController;

/// Call [`SyncController::start`] every `period`, skipping ticks that land
/// while a session is still running.
///
/// The first tick fires one full `period` after spawning. Abort the returned
/// handle to stop refreshing; an in-flight session runs to completion.
pub fn spawn_auto_refresh<F, S>(controller: SyncController<F, S>, period: Duration) -> JoinHandle<()>
where
  F: PageFetcher + 'static,
  S: SnapshotStore + 'static,
{
  tokio::spawn(async move {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
      ticker.tick().await;

      if controller.is_in_progress() {
        debug!("auto-refresh skipped, session in progress");
        continue;
      }
      match controller.start() {
        Ok(session) => info!(%session, "auto-refresh started a session"),
        // Lost a race with another trigger between the check and the start.
        Err(Error::AlreadyInProgress) => debug!("auto-refresh skipped, session in progress"),
        Err(e) => warn!(error = %e, "auto-refresh could not start a session"),
      }
    }
  })
}
