//! Cascading county → constituency → ward selection
//!
//! A selection is replaced as a whole on every change. Changing an upstream
//! level clears everything below it, so a half-updated triple never exists.

use serde::{Deserialize, Serialize};

use super::{constituencies_of, wards_of, Constituency, LocationCatalog};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSelection {
    county: Option<String>,
    constituency: Option<String>,
    ward: Option<String>,
}

impl LocationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn county(&self) -> Option<&str> {
        self.county.as_deref()
    }

    pub fn constituency(&self) -> Option<&str> {
        self.constituency.as_deref()
    }

    pub fn ward(&self) -> Option<&str> {
        self.ward.as_deref()
    }

    /// Select a county, clearing constituency and ward
    ///
    /// Re-selecting the current county keeps the selection unchanged.
    pub fn select_county(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        if self.county.as_deref() == Some(name.as_str()) {
            return self.clone();
        }
        Self {
            county: Some(name),
            constituency: None,
            ward: None,
        }
    }

    /// Select a constituency, clearing the ward
    ///
    /// Ignored while no county is selected.
    pub fn select_constituency(&self, name: impl Into<String>) -> Self {
        if self.county.is_none() {
            return self.clone();
        }
        let name = name.into();
        if self.constituency.as_deref() == Some(name.as_str()) {
            return self.clone();
        }
        Self {
            county: self.county.clone(),
            constituency: Some(name),
            ward: None,
        }
    }

    /// Select a ward; ignored while no constituency is selected
    pub fn select_ward(&self, name: impl Into<String>) -> Self {
        if self.constituency.is_none() {
            return self.clone();
        }
        Self {
            county: self.county.clone(),
            constituency: self.constituency.clone(),
            ward: Some(name.into()),
        }
    }

    /// Options for the constituency field under the current county
    pub fn constituency_options<'a>(&self, catalog: &'a LocationCatalog) -> &'a [Constituency] {
        match &self.county {
            Some(county) => constituencies_of(catalog, county),
            None => &[],
        }
    }

    /// Options for the ward field under the current constituency
    pub fn ward_options<'a>(&self, catalog: &'a LocationCatalog) -> &'a [String] {
        match &self.constituency {
            Some(constituency) => wards_of(self.constituency_options(catalog), constituency),
            None => &[],
        }
    }

    /// The full triple, once every level is selected
    pub fn complete(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.county.as_deref()?,
            self.constituency.as_deref()?,
            self.ward.as_deref()?,
        ))
    }
}
