use chrono::{DateTime, Duration, Utc};
use pkg_constants::expiry::FAR_FUTURE_DAYS;
use pkg_constants::registry;
use pkg_state::client::StateStore;
use pkg_state::watch::{EventType, WatchEvent};
use pkg_types::delegation::DelegationRequest;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::delegation::DelegationController;

/// How many times a reclamation triggered by a delete event is attempted
/// before giving up until the next resync. Failing to reclaim quota is
/// worse than retrying a delete.
const RECLAIM_ATTEMPTS: u32 = 3;

/// Cluster-wide expiry coordinator. One instance per process.
///
/// A single task owns `next_deadline` and alternates between waiting for
/// the timer and waiting for the delegation change stream, so the state
/// needs no lock. Put events with an earlier expiry pull the deadline in;
/// Delete events trigger reclamation; the timer firing scans and deletes
/// every elapsed request, which the stream then redelivers as deletes.
pub struct ExpiryScheduler {
    store: StateStore,
    delegations: DelegationController,
}

enum LoopExit {
    Shutdown,
    SubscriptionLost,
}

impl ExpiryScheduler {
    pub fn new(store: StateStore) -> Self {
        Self {
            delegations: DelegationController::new(store.clone()),
            store,
        }
    }

    /// Blocking entry point. Returns only when `shutdown` flips to true.
    ///
    /// A lost subscription restarts the loop with a fresh subscription and
    /// a full rescan: a coordinator that quietly stopped would stop
    /// reclaiming expired delegations cluster-wide, and `next_deadline`
    /// cannot be trusted across a stream disconnection.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            match self.run_loop(&mut shutdown).await {
                LoopExit::Shutdown => {
                    info!("ExpiryScheduler shut down");
                    return;
                }
                LoopExit::SubscriptionLost => {
                    warn!("ExpiryScheduler subscription lost; restarting");
                }
            }
        }
    }

    async fn run_loop(&self, shutdown: &mut watch::Receiver<bool>) -> LoopExit {
        // Subscribe before the initial scan so a request racing the scan is
        // seen by one of the two.
        let mut events = self.store.event_log.subscribe();
        let now = Utc::now();
        let mut next_deadline = match self.scan(now).await {
            Ok(deadline) => deadline,
            Err(e) => {
                warn!("ExpiryScheduler initial scan failed: {}", e);
                far_future(now)
            }
        };
        info!("ExpiryScheduler started (next deadline {})", next_deadline);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return LoopExit::Shutdown;
                    }
                }
                _ = tokio::time::sleep(until(next_deadline)) => {
                    let now = Utc::now();
                    next_deadline = match self.scan(now).await {
                        Ok(deadline) => deadline,
                        Err(e) => {
                            warn!("ExpiryScheduler scan failed: {}", e);
                            far_future(now)
                        }
                    };
                }
                result = events.recv() => {
                    match result {
                        Ok(event) if event.key.starts_with(registry::DELEGATION_PREFIX) => {
                            self.handle_event(event, &mut next_deadline).await;
                        }
                        Ok(_) => {}
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                            warn!("ExpiryScheduler lagged {} events; rescanning", missed);
                            let now = Utc::now();
                            next_deadline = match self.scan(now).await {
                                Ok(deadline) => deadline,
                                Err(e) => {
                                    warn!("ExpiryScheduler scan failed: {}", e);
                                    far_future(now)
                                }
                            };
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                            return LoopExit::SubscriptionLost;
                        }
                    }
                }
            }
        }
    }

    async fn handle_event(&self, event: WatchEvent, next_deadline: &mut DateTime<Utc>) {
        let bytes = event.value.unwrap_or_default();
        let req = match serde_json::from_slice::<DelegationRequest>(&bytes) {
            Ok(req) => req,
            Err(e) => {
                warn!("Malformed delegation request at {}: {}", event.key, e);
                return;
            }
        };

        match event.event_type {
            EventType::Put => {
                if let Some(expiry) = req.expiry {
                    if expiry < *next_deadline {
                        *next_deadline = expiry;
                        info!("ExpiryScheduler: closest expiry is now {}", expiry);
                    }
                }
            }
            EventType::Delete => {
                // Deletion outside the normal request lifecycle (manual
                // removal included) must still release the quota.
                self.reclaim_with_retry(&req).await;
            }
        }
    }

    async fn reclaim_with_retry(&self, req: &DelegationRequest) {
        for attempt in 1..=RECLAIM_ATTEMPTS {
            match self.delegations.reclaim(req).await {
                Ok(()) => return,
                Err(e) if attempt < RECLAIM_ATTEMPTS => {
                    warn!(
                        "Reclaim of delegation {}/{} failed (attempt {}): {}",
                        req.compartment, req.name, attempt, e
                    );
                }
                Err(e) => {
                    warn!(
                        "Reclaim of delegation {}/{} gave up after {} attempts: {}",
                        req.compartment, req.name, RECLAIM_ATTEMPTS, e
                    );
                }
            }
        }
    }

    /// One scan pass over all live delegation requests: delete every one
    /// whose expiry has elapsed (the subscription redelivers those as
    /// delete events, which drive reclamation) and return the nearest
    /// deadline among the remainder.
    async fn scan(&self, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
        let mut remaining = Vec::new();
        for (key, req) in self.list_requests().await? {
            if is_elapsed(&req, now) {
                info!(
                    "Delegation {}/{} expired at {}; deleting",
                    req.compartment,
                    req.name,
                    req.expiry.unwrap_or(now)
                );
                self.store.delete(&key).await?;
            } else {
                remaining.push(req);
            }
        }
        Ok(closest_expiry(&remaining, now))
    }

    async fn list_requests(&self) -> anyhow::Result<Vec<(String, DelegationRequest)>> {
        Ok(self
            .store
            .list_prefix(registry::DELEGATION_PREFIX)
            .await?
            .into_iter()
            .filter_map(|(key, bytes)| {
                serde_json::from_slice::<DelegationRequest>(&bytes)
                    .ok()
                    .map(|req| (key, req))
            })
            .collect())
    }
}

/// The "effectively never" sentinel: finite so the wait primitive always
/// has a deadline to sleep toward.
pub fn far_future(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(FAR_FUTURE_DAYS)
}

/// True once the request's expiry timestamp has passed. Requests without
/// an expiry never elapse.
pub fn is_elapsed(req: &DelegationRequest, now: DateTime<Utc>) -> bool {
    req.expiry.is_some_and(|expiry| expiry <= now)
}

/// Nearest future expiry among `requests`, or the far-future sentinel when
/// none of them carries one.
pub fn closest_expiry(requests: &[DelegationRequest], now: DateTime<Utc>) -> DateTime<Utc> {
    requests
        .iter()
        .filter_map(|req| req.expiry)
        .filter(|expiry| *expiry > now)
        .min()
        .unwrap_or_else(|| far_future(now))
}

fn until(deadline: DateTime<Utc>) -> std::time::Duration {
    (deadline - Utc::now())
        .to_std()
        .unwrap_or(std::time::Duration::ZERO)
}
