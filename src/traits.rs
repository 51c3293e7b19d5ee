//! Seams to the planner's external collaborators.
//!
//! The engine reads POIs from a catalog and hands finished itineraries to a
//! store. Both are kept minimal so services can back them with whatever they
//! already run.

use crate::catalog::CatalogFilter;
use crate::error::CatalogError;
use crate::itinerary::Itinerary;
use crate::poi::{Poi, PoiId};
use crate::store::ItineraryId;

/// Read-only source of points of interest.
pub trait PoiCatalog {
    /// All POIs passing `filter`, in catalog order.
    fn list_pois(&self, filter: &CatalogFilter) -> Result<Vec<Poi>, CatalogError>;

    /// A single POI by identity.
    fn poi(&self, id: PoiId) -> Result<Poi, CatalogError>;
}

/// Persistence of finished itineraries.
pub trait ItineraryStore {
    fn get(&self, id: ItineraryId) -> Option<Itinerary>;

    /// Save `itinerary`, assigning an id when it has none. Returns the id.
    fn put(&self, itinerary: Itinerary) -> ItineraryId;
}

impl<T: PoiCatalog + ?Sized> PoiCatalog for &T {
    fn list_pois(&self, filter: &CatalogFilter) -> Result<Vec<Poi>, CatalogError> {
        (**self).list_pois(filter)
    }

    fn poi(&self, id: PoiId) -> Result<Poi, CatalogError> {
        (**self).poi(id)
    }
}
