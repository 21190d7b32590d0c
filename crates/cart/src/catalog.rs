//! Service catalog.
//!
//! The list of services and prices site admins maintain. Stored as YAML:
//!
//! ```yaml
//! - name: Logo Design
//!   price: "150.00"
//!   description: Custom logo with three revisions
//! - name: Business Cards
//!   price: "25.50"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use logos_core::Price;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur when working with the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading or writing the catalog file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The catalog file is not valid YAML for a service list.
    #[error("Invalid catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Two services share a name.
    #[error("Service already exists: {0}")]
    DuplicateService(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),
}

/// One service offered on the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceListing {
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServiceListing {
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
            description: None,
        }
    }
}

/// Ordered list of services with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    services: Vec<ServiceListing>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate names.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateService`] on a repeated name.
    pub fn from_services(services: Vec<ServiceListing>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for service in services {
            catalog.add(service)?;
        }
        Ok(catalog)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or names repeat.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let services: Vec<ServiceListing> = serde_yaml::from_str(yaml)?;
        Self::from_services(services)
    }

    /// Serialize the catalog to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String, CatalogError> {
        Ok(serde_yaml::to_string(&self.services)?)
    }

    /// Load a catalog file. A missing file is an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let yaml = match fs::read_to_string(path) {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Catalog file missing, starting empty");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CatalogError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_yaml_str(&yaml)
    }

    /// Write the catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    #[instrument(skip(self), fields(services = self.services.len()))]
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let yaml = self.to_yaml_string()?;
        fs::write(path, yaml).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Services in listing order.
    #[must_use]
    pub fn services(&self) -> &[ServiceListing] {
        &self.services
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Look up a service by exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ServiceListing> {
        self.services.iter().find(|service| service.name == name)
    }

    /// Append a service.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateService`] if the name is taken.
    pub fn add(&mut self, service: ServiceListing) -> Result<(), CatalogError> {
        if self.find(&service.name).is_some() {
            return Err(CatalogError::DuplicateService(service.name));
        }
        self.services.push(service);
        Ok(())
    }

    /// Change a service's price. Returns the old price.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ServiceNotFound`] if there is no such service.
    pub fn set_price(&mut self, name: &str, price: Price) -> Result<Price, CatalogError> {
        let service = self
            .services
            .iter_mut()
            .find(|service| service.name == name)
            .ok_or_else(|| CatalogError::ServiceNotFound(name.to_owned()))?;
        Ok(std::mem::replace(&mut service.price, price))
    }

    /// Remove a service.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ServiceNotFound`] if there is no such service.
    pub fn remove(&mut self, name: &str) -> Result<ServiceListing, CatalogError> {
        let index = self
            .services
            .iter()
            .position(|service| service.name == name)
            .ok_or_else(|| CatalogError::ServiceNotFound(name.to_owned()))?;
        Ok(self.services.remove(index))
    }
}
