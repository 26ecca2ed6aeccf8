use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info_span, warn, Instrument};

use super::ProfileView;
use crate::api::{fetch_user_data, StatsApi};

/// Drives a [`ProfileView`] against an injected [`StatsApi`].
///
/// Every navigation spawns its own fetch task. The view lock is only taken to
/// hand out a ticket and to commit the outcome, never across the request.
pub struct ProfileSession<A> {
    api: Arc<A>,
    view: Arc<Mutex<ProfileView>>,
}

impl<A: StatsApi + 'static> ProfileSession<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            view: Arc::new(Mutex::new(ProfileView::new())),
        }
    }

    pub fn view(&self) -> Arc<Mutex<ProfileView>> {
        Arc::clone(&self.view)
    }

    /// Switch to `username` and start loading it. The returned handle resolves
    /// to whether the outcome was committed (false if a newer navigation won).
    pub async fn navigate(&self, username: &str) -> JoinHandle<bool> {
        let ticket = self.view.lock().await.navigate(username);
        let api = Arc::clone(&self.api);
        let view = Arc::clone(&self.view);
        let span = info_span!(
            "profile_fetch",
            username = %ticket.username,
            generation = ticket.generation
        );

        tokio::spawn(
            async move {
                let outcome = fetch_user_data(api.as_ref(), &ticket.username).await;
                if let Err(e) = &outcome {
                    warn!(error = %e, "profile fetch failed");
                }

                let applied = view.lock().await.apply(&ticket, outcome);
                if !applied {
                    debug!("discarded stale profile response");
                }
                applied
            }
            .instrument(span),
        )
    }
}
