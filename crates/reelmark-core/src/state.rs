//! Favorite state of the displayed movie and its projection onto the
//! add/remove controls.

use std::fmt;

use reelmark_api::{FavoriteOutcome, Movie};

/// Whether the displayed movie is one of the account's favorites.
///
/// Starts as `Unknown` for every screen instance and converges once the
/// favorites list has been fetched. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteStatus {
    #[default]
    Unknown,
    Favorited,
    NotFavorited,
}

impl FavoriteStatus {
    /// Membership of `movie_id` in the fetched favorites list.
    pub fn from_favorites(movie_id: u64, favorites: &[Movie]) -> Self {
        if favorites.iter().any(|m| m.id == movie_id) {
            Self::Favorited
        } else {
            Self::NotFavorited
        }
    }

    /// New status after a favorite write, or `None` if the server's answer
    /// does not say the state changed.
    pub fn from_outcome(outcome: FavoriteOutcome) -> Option<Self> {
        match outcome {
            FavoriteOutcome::Added => Some(Self::Favorited),
            FavoriteOutcome::Removed => Some(Self::NotFavorited),
            FavoriteOutcome::Unrecognized(_) => None,
        }
    }

    pub fn controls(self) -> ControlVisibility {
        match self {
            Self::Unknown => ControlVisibility {
                add_visible: false,
                remove_visible: false,
            },
            Self::Favorited => ControlVisibility {
                add_visible: false,
                remove_visible: true,
            },
            Self::NotFavorited => ControlVisibility {
                add_visible: true,
                remove_visible: false,
            },
        }
    }
}

impl fmt::Display for FavoriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Favorited => write!(f, "favorited"),
            Self::NotFavorited => write!(f, "not favorited"),
        }
    }
}

/// Visibility of the two mutually exclusive favorite controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlVisibility {
    pub add_visible: bool,
    pub remove_visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies(ids: &[u64]) -> Vec<Movie> {
        ids.iter()
            .map(|id| Movie::new(*id, format!("Movie {id}"), None))
            .collect()
    }

    #[test]
    fn test_membership() {
        assert_eq!(
            FavoriteStatus::from_favorites(550, &movies(&[13, 550, 603])),
            FavoriteStatus::Favorited
        );
        assert_eq!(
            FavoriteStatus::from_favorites(550, &movies(&[13, 603])),
            FavoriteStatus::NotFavorited
        );
        assert_eq!(
            FavoriteStatus::from_favorites(550, &[]),
            FavoriteStatus::NotFavorited
        );
    }

    #[test]
    fn test_membership_is_by_id_not_title() {
        let list = vec![Movie::new(1, "Fight Club", None)];
        assert_eq!(
            FavoriteStatus::from_favorites(550, &list),
            FavoriteStatus::NotFavorited
        );
    }

    #[test]
    fn test_outcome_transitions() {
        assert_eq!(
            FavoriteStatus::from_outcome(FavoriteOutcome::Added),
            Some(FavoriteStatus::Favorited)
        );
        assert_eq!(
            FavoriteStatus::from_outcome(FavoriteOutcome::Removed),
            Some(FavoriteStatus::NotFavorited)
        );
        assert_eq!(
            FavoriteStatus::from_outcome(FavoriteOutcome::Unrecognized(34)),
            None
        );
    }

    #[test]
    fn test_controls_are_exclusive() {
        let fav = FavoriteStatus::Favorited.controls();
        assert!(fav.remove_visible && !fav.add_visible);

        let not = FavoriteStatus::NotFavorited.controls();
        assert!(not.add_visible && !not.remove_visible);

        assert_eq!(FavoriteStatus::Unknown.controls(), ControlVisibility::default());
    }
}
