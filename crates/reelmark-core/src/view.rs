//! The UI surface the detail screen writes into.
//!
//! Network completions never touch a view directly. They send
//! [`ViewUpdate`]s over a channel, and [`run_view`] applies them on the one
//! task that owns the view, in arrival order.

use tokio::sync::mpsc;

use crate::poster::Poster;
use crate::state::{ControlVisibility, FavoriteStatus};

/// What a detail view must be able to display.
pub trait DetailView {
    fn set_title(&mut self, title: &str);
    fn set_poster(&mut self, poster: Poster);
    fn set_controls(&mut self, controls: ControlVisibility);
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Title(String),
    Poster(Poster),
    Favorite(FavoriteStatus),
}

impl ViewUpdate {
    pub fn apply<V: DetailView + ?Sized>(self, view: &mut V) {
        match self {
            Self::Title(title) => view.set_title(&title),
            Self::Poster(poster) => view.set_poster(poster),
            Self::Favorite(status) => view.set_controls(status.controls()),
        }
    }
}

/// Drain `updates` into `view` until every sender is gone, then hand the
/// view back.
pub async fn run_view<V: DetailView>(
    mut updates: mpsc::UnboundedReceiver<ViewUpdate>,
    mut view: V,
) -> V {
    while let Some(update) = updates.recv().await {
        tracing::trace!(?update, "applying view update");
        update.apply(&mut view);
    }
    view
}

/// In-memory view. Used by the CLI and by tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessView {
    pub title: Option<String>,
    pub poster: Option<Poster>,
    pub controls: ControlVisibility,
    /// Number of writes applied, of any kind.
    pub writes: usize,
}

impl HeadlessView {
    /// Favorite status as implied by the visible controls.
    pub fn status(&self) -> FavoriteStatus {
        match (self.controls.add_visible, self.controls.remove_visible) {
            (false, true) => FavoriteStatus::Favorited,
            (true, false) => FavoriteStatus::NotFavorited,
            _ => FavoriteStatus::Unknown,
        }
    }
}

impl DetailView for HeadlessView {
    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
        self.writes += 1;
    }

    fn set_poster(&mut self, poster: Poster) {
        self.poster = Some(poster);
        self.writes += 1;
    }

    fn set_controls(&mut self, controls: ControlVisibility) {
        self.controls = controls;
        self.writes += 1;
    }
}
