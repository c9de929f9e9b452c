//! Loading PMML documents.
//!
//! A document is parsed once into a [`Pmml`] registry of [`TreeModel`]s
//! keyed by model name. Everything in the document that the tree scorer
//! does not use (data dictionary, transformations, other model kinds) is
//! skipped.

mod parser;

use crate::error::PmmlError;
use crate::tree::TreeModel;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// The tree models of one or more PMML documents.
#[derive(Debug, Clone, Default)]
pub struct Pmml {
    pub version: Option<String>,
    /// `description` attribute of the document header.
    pub description: Option<String>,
    models: BTreeMap<String, TreeModel>,
}

impl FromStr for Pmml {
    type Err = PmmlError;

    fn from_str(xml: &str) -> Result<Self, Self::Err> {
        parser::parse_document(xml)
    }
}

impl Pmml {
    /// Read and parse a PMML file.
    pub fn load(path: &Path) -> Result<Self, PmmlError> {
        let xml = std::fs::read_to_string(path).map_err(|source| PmmlError::Io {
            path: path.display().to_string(),
            source,
        })?;
        xml.parse()
    }

    /// Look up a model by name. Unnamed models are registered as
    /// `model-<n>`, counting tree models in document order from zero.
    pub fn get_by_name(&self, name: &str) -> Option<&TreeModel> {
        self.models.get(name)
    }

    /// Mutable lookup, for changing a model's strategies in place.
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut TreeModel> {
        self.models.get_mut(name)
    }

    /// Models ordered by name.
    pub fn models(&self) -> impl Iterator<Item = (&str, &TreeModel)> {
        self.models.iter().map(|(name, model)| (name.as_str(), model))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// The only model, if there is exactly one.
    pub fn single(&self) -> Option<&TreeModel> {
        match self.models.len() {
            1 => self.models.values().next(),
            _ => None,
        }
    }

    /// Move every model of `other` into this registry.
    ///
    /// Fails on the first name already present; models merged before the
    /// clash stay merged.
    pub fn merge(&mut self, other: Pmml) -> Result<(), PmmlError> {
        for (name, model) in other.models {
            if self.models.contains_key(&name) {
                return Err(PmmlError::DuplicateModel(name));
            }
            self.models.insert(name, model);
        }
        if self.version.is_none() {
            self.version = other.version;
        }
        if self.description.is_none() {
            self.description = other.description;
        }
        Ok(())
    }
}
