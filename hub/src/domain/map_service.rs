//! Survival map queries, discovery and persisted favourites.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, warn};

use super::map::{
    Favourites, LocationKind, MapLocation, SurvivalTip, TipCategory, jackson_locations,
    survival_tips,
};
use super::session_store::{SessionStore, StorageKey, StoreError};

/// Failures raised by favourite toggles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// No location has the id.
    #[error("unknown location '{id}'")]
    UnknownLocation { id: String },
    /// No tip has the id.
    #[error("unknown tip '{id}'")]
    UnknownTip { id: String },
    /// The favourites could not be persisted.
    #[error("could not save favourites: {0}")]
    Storage(#[from] StoreError),
}

/// Map catalogue with per-survivor-device favourites.
#[derive(Debug)]
pub struct MapService {
    store: SessionStore,
    locations: RwLock<Vec<MapLocation>>,
    tips: Vec<SurvivalTip>,
    favourites: Mutex<Favourites>,
}

impl MapService {
    /// Load the catalogue and any saved favourites.
    pub fn start(store: SessionStore) -> Self {
        let favourites = store
            .load::<Favourites>(StorageKey::MapFavourites)
            .unwrap_or_default();
        debug!(
            locations = favourites.locations.len(),
            tips = favourites.tips.len(),
            "map favourites loaded"
        );
        Self {
            store,
            locations: RwLock::new(jackson_locations()),
            tips: survival_tips(),
            favourites: Mutex::new(favourites),
        }
    }

    fn filtered(&self, keep: impl Fn(&MapLocation) -> bool) -> Vec<MapLocation> {
        self.locations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|location| keep(location))
            .cloned()
            .collect()
    }

    /// Every location.
    #[must_use]
    pub fn locations(&self) -> Vec<MapLocation> {
        self.filtered(|_| true)
    }

    /// Locations of one kind.
    #[must_use]
    pub fn locations_of_kind(&self, kind: LocationKind) -> Vec<MapLocation> {
        self.filtered(|location| location.kind == kind)
    }

    /// Locations already discovered.
    #[must_use]
    pub fn discovered_locations(&self) -> Vec<MapLocation> {
        self.filtered(|location| location.discovered)
    }

    /// Look up one location.
    #[must_use]
    pub fn location(&self, id: &str) -> Option<MapLocation> {
        self.filtered(|location| location.id == id).pop()
    }

    /// Locations whose name or description contains `term`, ignoring case.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<MapLocation> {
        self.filtered(|location| location.matches(term))
    }

    /// Mark a location discovered. Returns `false` for unknown ids.
    pub fn discover(&self, id: &str) -> bool {
        let mut locations = self
            .locations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match locations.iter_mut().find(|location| location.id == id) {
            Some(location) => {
                location.discovered = true;
                debug!(id, "location discovered");
                true
            }
            None => false,
        }
    }

    /// Every survival tip.
    #[must_use]
    pub fn tips(&self) -> &[SurvivalTip] {
        &self.tips
    }

    /// Tips in one category.
    #[must_use]
    pub fn tips_in_category(&self, category: TipCategory) -> Vec<&SurvivalTip> {
        self.tips
            .iter()
            .filter(|tip| tip.category == category)
            .collect()
    }

    /// Snapshot of the favourites.
    #[must_use]
    pub fn favourites(&self) -> Favourites {
        self.lock_favourites().clone()
    }

    /// Flip a location favourite; returns whether it is now a favourite.
    pub fn toggle_location_favourite(&self, id: &str) -> Result<bool, MapError> {
        if self.location(id).is_none() {
            return Err(MapError::UnknownLocation { id: id.to_owned() });
        }
        self.toggle(id, |favourites| &mut favourites.locations)
    }

    /// Flip a tip favourite; returns whether it is now a favourite.
    pub fn toggle_tip_favourite(&self, id: &str) -> Result<bool, MapError> {
        if !self.tips.iter().any(|tip| tip.id == id) {
            return Err(MapError::UnknownTip { id: id.to_owned() });
        }
        self.toggle(id, |favourites| &mut favourites.tips)
    }

    fn toggle(
        &self,
        id: &str,
        list: impl Fn(&mut Favourites) -> &mut Vec<String>,
    ) -> Result<bool, MapError> {
        let mut favourites = self.lock_favourites();
        let mut next = favourites.clone();
        let ids = list(&mut next);
        let now_favourite = if let Some(position) = ids.iter().position(|entry| entry == id) {
            ids.remove(position);
            false
        } else {
            ids.push(id.to_owned());
            true
        };
        if let Err(err) = self.store.save(StorageKey::MapFavourites, &next) {
            warn!(id, error = %err, "favourites not persisted");
            return Err(err.into());
        }
        *favourites = next;
        Ok(now_favourite)
    }

    fn lock_favourites(&self) -> MutexGuard<'_, Favourites> {
        self.favourites.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
