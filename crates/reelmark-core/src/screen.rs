//! Controller for a single movie detail screen.
//!
//! On every appearance the screen fetches the account's favorites and the
//! poster concurrently; the two requests race and whichever finishes first
//! is shown first. The add/remove buttons submit a favorite write and only
//! change the controls once the server confirms.
//!
//! All results reach the view as [`ViewUpdate`] messages, so the view is only
//! ever mutated by the task draining the channel. A failed request is logged
//! and produces no message. Requests belong to the appearance that started
//! them and are cancelled by [`DetailScreen::disappear`] or by dropping the
//! screen.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use reelmark_api::{FavoriteService, Movie};

use crate::error::CoreError;
use crate::poster::Poster;
use crate::state::FavoriteStatus;
use crate::view::ViewUpdate;

pub struct DetailScreen<S> {
    worker: Worker<S>,
    lifetime: CancellationToken,
    appearance: Option<CancellationToken>,
}

impl<S: FavoriteService + 'static> DetailScreen<S> {
    /// Create the screen and show the movie's title.
    pub fn new(
        service: Arc<S>,
        movie: Movie,
        updates: mpsc::UnboundedSender<ViewUpdate>,
    ) -> Self {
        let worker = Worker {
            service,
            movie: Arc::new(movie),
            updates,
            in_flight: Arc::new(AtomicUsize::new(0)),
        };
        worker.publish(ViewUpdate::Title(worker.movie.title.clone()));
        Self {
            worker,
            lifetime: CancellationToken::new(),
            appearance: None,
        }
    }

    /// Requests currently running, for an activity indicator. Counted from
    /// the moment a request is started, not when its task is first polled.
    pub fn in_flight(&self) -> usize {
        self.worker.in_flight.load(Ordering::SeqCst)
    }

    /// The screen became visible: refresh favorite status and load the poster.
    ///
    /// Requests still running from an earlier appearance are cancelled.
    pub fn appear(&mut self) -> Appearance {
        if let Some(previous) = self.appearance.take() {
            previous.cancel();
        }
        let token = self.lifetime.child_token();
        self.appearance = Some(token.clone());

        let mut tasks = vec![self.spawn_reconcile(token.clone())];
        if self.worker.movie.poster_path.is_some() {
            tasks.push(self.spawn_poster(token));
        } else {
            tracing::debug!(movie_id = self.worker.movie.id, "No poster path, skipping image");
        }
        Appearance { tasks }
    }

    /// The screen was navigated away from. In-flight requests are dropped
    /// without touching the view.
    pub fn disappear(&mut self) {
        if let Some(token) = self.appearance.take() {
            token.cancel();
        }
    }

    /// "Add to favorites" was pressed.
    pub fn favorite_pressed(&self) -> JoinHandle<()> {
        self.spawn_toggle(true)
    }

    /// "Remove from favorites" was pressed.
    pub fn unfavorite_pressed(&self) -> JoinHandle<()> {
        self.spawn_toggle(false)
    }

    /// Fetch the favorites list and update the controls.
    ///
    /// Unlike [`appear`](Self::appear), the error is returned to the caller.
    /// The view is left untouched on failure either way.
    pub async fn reconcile(&self) -> Result<FavoriteStatus, CoreError> {
        let status = self.worker.fetch_status().await?;
        self.worker.publish(ViewUpdate::Favorite(status));
        Ok(status)
    }

    /// Fetch and show the poster. Returns `false` if the movie has none.
    pub async fn load_poster(&self) -> Result<bool, CoreError> {
        match self.worker.fetch_poster().await? {
            Some(poster) => {
                self.worker.publish(ViewUpdate::Poster(poster));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Submit a favorite write and apply the confirmed state.
    ///
    /// Returns `None` when the server answered with a status code that does
    /// not confirm either direction; the controls stay as they were.
    pub async fn toggle_favorite(
        &self,
        favorite: bool,
    ) -> Result<Option<FavoriteStatus>, CoreError> {
        let status = self.worker.submit_favorite(favorite).await?;
        if let Some(status) = status {
            self.worker.publish(ViewUpdate::Favorite(status));
        }
        Ok(status)
    }

    fn spawn_reconcile(&self, token: CancellationToken) -> JoinHandle<()> {
        let worker = self.worker.clone();
        let busy = worker.busy();
        tokio::spawn(async move {
            let _busy = busy;
            let work = worker.fetch_status();
            if let Some(status) = guarded(&token, "favorite_movies", worker.movie.id, work).await {
                worker.publish(ViewUpdate::Favorite(status));
            }
        })
    }

    fn spawn_poster(&self, token: CancellationToken) -> JoinHandle<()> {
        let worker = self.worker.clone();
        let busy = worker.busy();
        tokio::spawn(async move {
            let _busy = busy;
            let work = worker.fetch_poster();
            if let Some(Some(poster)) = guarded(&token, "poster", worker.movie.id, work).await {
                worker.publish(ViewUpdate::Poster(poster));
            }
        })
    }

    fn spawn_toggle(&self, favorite: bool) -> JoinHandle<()> {
        let token = self
            .appearance
            .clone()
            .unwrap_or_else(|| self.lifetime.child_token());
        let worker = self.worker.clone();
        let busy = worker.busy();
        tokio::spawn(async move {
            let _busy = busy;
            let work = worker.submit_favorite(favorite);
            let confirmed = guarded(&token, "set_favorite", worker.movie.id, work).await;
            if let Some(Some(status)) = confirmed {
                worker.publish(ViewUpdate::Favorite(status));
            }
        })
    }
}

impl<S> Drop for DetailScreen<S> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

/// Requests started by one appearance.
#[derive(Debug)]
pub struct Appearance {
    tasks: Vec<JoinHandle<()>>,
}

impl Appearance {
    /// Number of requests this appearance started (1 or 2).
    pub fn request_count(&self) -> usize {
        self.tasks.len()
    }

    /// Wait until every request has finished, failed or been cancelled.
    pub async fn settled(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                if e.is_panic() {
                    tracing::error!(error = %e, "Detail screen task panicked");
                }
            }
        }
    }
}

/// Run `work` unless `token` is cancelled first. Failures are logged and
/// swallowed.
async fn guarded<T>(
    token: &CancellationToken,
    operation: &'static str,
    movie_id: u64,
    work: impl Future<Output = Result<T, CoreError>>,
) -> Option<T> {
    tokio::select! {
        biased;
        () = token.cancelled() => {
            tracing::debug!(operation, movie_id, "Request cancelled");
            None
        }
        result = work => match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(operation, movie_id, error = %e, "Request failed, view left unchanged");
                None
            }
        },
    }
}

struct Worker<S> {
    service: Arc<S>,
    movie: Arc<Movie>,
    updates: mpsc::UnboundedSender<ViewUpdate>,
    in_flight: Arc<AtomicUsize>,
}

impl<S> Clone for Worker<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            movie: Arc::clone(&self.movie),
            updates: self.updates.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<S: FavoriteService> Worker<S> {
    fn publish(&self, update: ViewUpdate) {
        if self.updates.send(update).is_err() {
            tracing::debug!(movie_id = self.movie.id, "View is gone, dropping update");
        }
    }

    fn busy(&self) -> InFlight {
        InFlight::new(Arc::clone(&self.in_flight))
    }

    async fn fetch_status(&self) -> Result<FavoriteStatus, CoreError> {
        let favorites = self
            .service
            .favorite_movies()
            .await
            .map_err(CoreError::service)?;
        let status = FavoriteStatus::from_favorites(self.movie.id, &favorites);
        tracing::debug!(
            movie_id = self.movie.id,
            favorites = favorites.len(),
            %status,
            "Favorites reconciled"
        );
        Ok(status)
    }

    async fn fetch_poster(&self) -> Result<Option<Poster>, CoreError> {
        let Some(path) = self.movie.poster_path.as_deref() else {
            return Ok(None);
        };
        let raw = self.service.poster(path).await.map_err(CoreError::service)?;
        let poster = Poster::decode(raw)?;
        tracing::debug!(
            movie_id = self.movie.id,
            width = poster.width,
            height = poster.height,
            "Poster decoded"
        );
        Ok(Some(poster))
    }

    async fn submit_favorite(&self, favorite: bool) -> Result<Option<FavoriteStatus>, CoreError> {
        let outcome = self
            .service
            .set_favorite(self.movie.id, favorite)
            .await
            .map_err(CoreError::service)?;
        let status = FavoriteStatus::from_outcome(outcome);
        match status {
            Some(status) => {
                tracing::info!(movie_id = self.movie.id, %status, "Favorite updated");
            }
            None => {
                tracing::warn!(
                    movie_id = self.movie.id,
                    favorite,
                    ?outcome,
                    "Unrecognized favorite status, view left unchanged"
                );
            }
        }
        Ok(status)
    }
}

/// Counts a running request for as long as it is alive.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
