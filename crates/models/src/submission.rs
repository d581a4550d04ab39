//! The submitted field set of a create or update request.
//!
//! Forms and JSON objects both arrive here as plain string fields; presence
//! is what counts for "required", an empty string is still present.

use std::collections::BTreeMap;

use crate::errors::ModelError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    fields: BTreeMap<String, String>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fails with `EmptySubmission` when nothing was sent, otherwise with
    /// the list of absent names.
    pub fn require(&self, names: &[&'static str]) -> Result<(), ModelError> {
        if self.is_empty() {
            return Err(ModelError::EmptySubmission);
        }
        let missing: Vec<&'static str> = names
            .iter()
            .copied()
            .filter(|name| !self.fields.contains_key(*name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ModelError::MissingFields(missing))
        }
    }

    pub fn text(&self, name: &'static str) -> Result<String, ModelError> {
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| ModelError::MissingFields(vec![name]))
    }

    pub fn integer(&self, name: &'static str) -> Result<i32, ModelError> {
        let raw = self.get(name).ok_or_else(|| ModelError::MissingFields(vec![name]))?;
        parse_integer(raw).ok_or(ModelError::InvalidField(name))
    }
}

impl<K, V> FromIterator<(K, V)> for Submission
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Integer coercion shared by field parsing and path identifiers.
pub fn parse_integer(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_reports_every_missing_name() {
        let s: Submission = [("title", "Dune")].into_iter().collect();
        match s.require(&["title", "author", "year"]) {
            Err(ModelError::MissingFields(names)) => assert_eq!(names, vec!["author", "year"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_submission_is_distinct_from_missing() {
        let s = Submission::new();
        assert!(matches!(s.require(&["title"]), Err(ModelError::EmptySubmission)));
    }

    #[test]
    fn empty_string_counts_as_present() {
        let s: Submission = [("comment", "")].into_iter().collect();
        assert!(s.require(&["comment"]).is_ok());
        assert_eq!(s.text("comment").unwrap(), "");
    }

    #[test]
    fn integer_trims_and_rejects_garbage() {
        let s: Submission = [("year", " 1965 "), ("rating", "four")].into_iter().collect();
        assert_eq!(s.integer("year").unwrap(), 1965);
        assert!(matches!(s.integer("rating"), Err(ModelError::InvalidField("rating"))));
    }
}
