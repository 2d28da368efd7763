//! Periodic expired-session sweep.
//!
//! Session lookups already filter on expiry, so this job is pure
//! storage reclamation; the system is correct with it disabled.

use anyhow::Result;
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::db::Store;

pub struct SessionSweeper {
    store: Store,
    interval_minutes: u32,
}

impl SessionSweeper {
    #[must_use]
    pub const fn new(store: Store, interval_minutes: u32) -> Self {
        Self {
            store,
            interval_minutes,
        }
    }

    /// Start the sweep schedule. Returns the scheduler handle so the
    /// caller can shut it down; `None` when the sweep is disabled.
    pub async fn start(self) -> Result<Option<JobScheduler>> {
        if self.interval_minutes == 0 {
            info!("Session sweep disabled");
            return Ok(None);
        }

        let sched = JobScheduler::new().await?;
        let cron_expr = format!("0 */{} * * * *", self.interval_minutes.min(59));

        let store = self.store;
        let job = Job::new_async(cron_expr.as_str(), move |_uuid, _lock| {
            let store = store.clone();
            Box::pin(async move {
                match store.purge_expired_sessions(&Utc::now().to_rfc3339()).await {
                    Ok(0) => {}
                    Ok(purged) => info!(purged, "Swept expired sessions"),
                    Err(e) => error!("Session sweep failed: {e}"),
                }
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!(
            interval_minutes = self.interval_minutes,
            "Session sweeper running"
        );

        Ok(Some(sched))
    }
}
