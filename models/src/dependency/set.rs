use crate::error::model_error::ModelError;
use crate::{DependencySpec, ErrorLocation};

use std::panic::Location;

/// Dependencies keyed by the local directory they are installed into.
///
/// Keeps insertion order. Installation and log output follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    entries: Vec<(String, DependencySpec)>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `name`.
    ///
    /// A replaced entry keeps its original position. Returns the previous spec.
    #[track_caller]
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        spec: DependencySpec,
    ) -> Result<Option<DependencySpec>, ModelError> {
        let name = name.into();
        validate_directory_name(&name)?;

        if let Some((_, existing)) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            return Ok(Some(std::mem::replace(existing, spec)));
        }

        self.entries.push((name, spec));
        Ok(None)
    }

    pub fn get(&self, name: &str) -> Option<&DependencySpec> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DependencySpec)> {
        self.into_iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Right-biased union: entries from `overrides` win on name collisions.
    pub fn merged_with(&self, overrides: &DependencySet) -> DependencySet {
        let mut merged = self.clone();
        for (name, spec) in &overrides.entries {
            match merged.entries.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => *existing = spec.clone(),
                None => merged.entries.push((name.clone(), spec.clone())),
            }
        }
        merged
    }
}

type Entry = (String, DependencySpec);

impl<'a> IntoIterator for &'a DependencySet {
    type Item = (&'a str, &'a DependencySpec);
    type IntoIter = std::iter::Map<std::slice::Iter<'a, Entry>, fn(&'a Entry) -> Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(entry_ref as fn(&'a Entry) -> Self::Item)
    }
}

fn entry_ref(entry: &Entry) -> (&str, &DependencySpec) {
    (entry.0.as_str(), &entry.1)
}

/// A dependency name becomes a directory directly under the workspace root.
#[track_caller]
fn validate_directory_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation {
            message: String::from("Dependency name cannot be empty"),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ModelError::Validation {
            message: format!("Dependency name '{name}' must be a single directory name"),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(())
}
