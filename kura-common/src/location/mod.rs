//! Location catalog and hierarchy validation
//!
//! The catalog is the static county → constituency → ward reference hierarchy.
//! It is loaded once from a JSON file and treated as immutable afterwards.
//!
//! Lookups are exact, case-sensitive name matches. When the source data holds
//! duplicate names at the same level, the first occurrence wins; duplicates are
//! kept as-is.
//!
//! The narrowing lookups ([`constituencies_of`], [`wards_of`]) return an empty
//! slice for an unknown name, which is the normal "nothing selected yet" state
//! for a cascading form. [`validate_triple`] is the server-side counterpart and
//! reports the first failing level as an error.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::{Error, Result};

pub mod selection;

pub use selection::LocationSelection;

/// A county and its constituencies, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
    #[serde(rename = "county_name")]
    pub name: String,
    #[serde(default)]
    pub constituencies: Vec<Constituency>,
}

/// A constituency and its ward names, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constituency {
    #[serde(rename = "constituency_name")]
    pub name: String,
    #[serde(default)]
    pub wards: Vec<String>,
}

/// Ordered sequence of counties
///
/// Serialises to the same top-level array as the reference file, so the
/// catalog can be handed to clients unchanged. Deserialising goes through
/// [`LocationCatalog::new`] and rejects an empty array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<County>", into = "Vec<County>")]
pub struct LocationCatalog {
    counties: Vec<County>,
}

impl TryFrom<Vec<County>> for LocationCatalog {
    type Error = Error;

    fn try_from(counties: Vec<County>) -> Result<Self> {
        Self::new(counties)
    }
}

impl From<LocationCatalog> for Vec<County> {
    fn from(catalog: LocationCatalog) -> Self {
        catalog.counties
    }
}

impl LocationCatalog {
    /// Build a catalog from already-parsed counties
    ///
    /// Fails with [`Error::CatalogUnavailable`] when `counties` is empty, since
    /// no registration can validate against an empty hierarchy.
    pub fn new(counties: Vec<County>) -> Result<Self> {
        if counties.is_empty() {
            return Err(Error::CatalogUnavailable(
                "catalog contains no counties".to_string(),
            ));
        }
        Ok(Self { counties })
    }

    /// Parse a catalog from the reference JSON format
    pub fn from_json_str(json: &str) -> Result<Self> {
        let counties: Vec<County> = serde_json::from_str(json)
            .map_err(|e| Error::CatalogUnavailable(format!("invalid catalog JSON: {}", e)))?;
        Self::new(counties)
    }

    pub fn counties(&self) -> &[County] {
        &self.counties
    }

    /// First county whose name matches exactly
    pub fn county(&self, name: &str) -> Option<&County> {
        self.counties.iter().find(|c| c.name == name)
    }

    /// Count of (counties, constituencies, wards) for startup logging
    pub fn totals(&self) -> (usize, usize, usize) {
        let constituencies = self.counties.iter().map(|c| c.constituencies.len()).sum();
        let wards = self
            .counties
            .iter()
            .flat_map(|c| c.constituencies.iter())
            .map(|k| k.wards.len())
            .sum();
        (self.counties.len(), constituencies, wards)
    }
}

/// Read and parse the reference dataset
///
/// Any read or parse failure is reported as [`Error::CatalogUnavailable`];
/// there is no partially loaded catalog.
pub async fn load_catalog(path: &Path) -> Result<LocationCatalog> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::CatalogUnavailable(format!("failed to read {}: {}", path.display(), e))
    })?;

    let catalog = LocationCatalog::from_json_str(&contents)?;

    let (counties, constituencies, wards) = catalog.totals();
    info!(
        "Loaded location catalog from {}: {} counties, {} constituencies, {} wards",
        path.display(),
        counties,
        constituencies,
        wards
    );

    Ok(catalog)
}

/// Constituencies of the named county, or an empty slice if no county matches
pub fn constituencies_of<'a>(catalog: &'a LocationCatalog, county_name: &str) -> &'a [Constituency] {
    catalog
        .county(county_name)
        .map(|c| c.constituencies.as_slice())
        .unwrap_or(&[])
}

/// Wards of the named constituency, or an empty slice if none matches
pub fn wards_of<'a>(constituencies: &'a [Constituency], constituency_name: &str) -> &'a [String] {
    constituencies
        .iter()
        .find(|k| k.name == constituency_name)
        .map(|k| k.wards.as_slice())
        .unwrap_or(&[])
}

/// Location triple validation failure
///
/// Reported for the first failing level only, county before constituency
/// before ward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Invalid County")]
    InvalidCounty,

    #[error("Invalid Constituency for selected County")]
    InvalidConstituency,

    #[error("Invalid Ward for selected Constituency")]
    InvalidWard,
}

/// Confirm that (county, constituency, ward) is a path through the catalog
pub fn validate_triple(
    catalog: &LocationCatalog,
    county_name: &str,
    constituency_name: &str,
    ward_name: &str,
) -> std::result::Result<(), LocationError> {
    let county = catalog
        .county(county_name)
        .ok_or(LocationError::InvalidCounty)?;

    let constituency = county
        .constituencies
        .iter()
        .find(|k| k.name == constituency_name)
        .ok_or(LocationError::InvalidConstituency)?;

    if !constituency.wards.iter().any(|w| w == ward_name) {
        debug!(
            county = county_name,
            constituency = constituency_name,
            ward = ward_name,
            "ward not found under constituency"
        );
        return Err(LocationError::InvalidWard);
    }

    Ok(())
}
