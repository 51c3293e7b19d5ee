//! POI catalog adapters: an in-memory snapshot and a blocking HTTP client.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::CatalogError;
use crate::itinerary::CostBounds;
use crate::poi::{Poi, PoiId};
use crate::traits::PoiCatalog;

/// Catalog query narrowing the POIs a plan may use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    /// A POI passes when it shares at least one tag. `None` admits all.
    pub categories: Option<BTreeSet<String>>,
    pub cost: Option<CostBounds>,
}

impl CatalogFilter {
    pub fn matches(&self, poi: &Poi) -> bool {
        let category_ok = self
            .categories
            .as_ref()
            .is_none_or(|categories| poi.has_any_category(categories));
        let cost_ok = self.cost.is_none_or(|bounds| bounds.contains(poi.cost));
        category_ok && cost_ok
    }
}

/// Immutable snapshot of the catalog, shared cheaply between planners.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    pois: Arc<[Poi]>,
}

impl MemoryCatalog {
    pub fn new(pois: Vec<Poi>) -> Self {
        Self { pois: pois.into() }
    }

    /// Replace the whole snapshot.
    pub fn refresh(&mut self, pois: Vec<Poi>) {
        self.pois = pois.into();
    }

    /// Load a snapshot from another catalog, e.g. at service start.
    pub fn load_from<C: PoiCatalog>(source: &C) -> Result<Self, CatalogError> {
        Ok(Self::new(source.list_pois(&CatalogFilter::default())?))
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }
}

impl PoiCatalog for MemoryCatalog {
    fn list_pois(&self, filter: &CatalogFilter) -> Result<Vec<Poi>, CatalogError> {
        Ok(self.pois.iter().filter(|poi| filter.matches(poi)).cloned().collect())
    }

    fn poi(&self, id: PoiId) -> Result<Poi, CatalogError> {
        self.pois
            .iter()
            .find(|poi| poi.id == id)
            .cloned()
            .ok_or(CatalogError::Unknown(id))
    }
}

#[derive(Debug, Clone)]
pub struct HttpCatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for HttpCatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Catalog service reached over HTTP.
///
/// Categories are filtered server side; cost bounds are applied to the
/// response. There is no retry policy.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    config: HttpCatalogConfig,
    client: reqwest::blocking::Client,
}

impl HttpCatalog {
    pub fn new(config: HttpCatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn pois_url(&self, filter: &CatalogFilter) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match &filter.categories {
            Some(categories) if !categories.is_empty() => {
                let joined = categories.iter().map(String::as_str).collect::<Vec<_>>().join(",");
                format!("{base}/pois?categories={joined}")
            }
            _ => format!("{base}/pois"),
        }
    }

    fn poi_url(&self, id: PoiId) -> String {
        format!("{}/pois/{id}", self.config.base_url.trim_end_matches('/'))
    }
}

impl PoiCatalog for HttpCatalog {
    fn list_pois(&self, filter: &CatalogFilter) -> Result<Vec<Poi>, CatalogError> {
        let url = self.pois_url(filter);
        let pois: Vec<Poi> = self
            .client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json())?;

        debug!(url = %url, count = pois.len(), "fetched catalog");
        Ok(pois.into_iter().filter(|poi| filter.matches(poi)).collect())
    }

    fn poi(&self, id: PoiId) -> Result<Poi, CatalogError> {
        let response = self.client.get(self.poi_url(id)).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::Unknown(id));
        }
        Ok(response.error_for_status()?.json()?)
    }
}
