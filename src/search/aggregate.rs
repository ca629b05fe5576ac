use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::sources::{SourceKind, SourceResult};

/// Source-keyed results of one aggregation call. Iteration and serialization
/// follow the order the sources were requested in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateResult {
    entries: Vec<(SourceKind, SourceResult)>,
}

impl AggregateResult {
    pub fn get(&self, kind: SourceKind) -> Option<&SourceResult> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, result)| result)
    }

    pub fn keys(&self) -> impl Iterator<Item = SourceKind> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceKind, &SourceResult)> {
        self.entries.iter().map(|(k, r)| (*k, r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_error()).count()
    }
}

/// Later duplicates of a key are dropped.
impl FromIterator<(SourceKind, SourceResult)> for AggregateResult {
    fn from_iter<I: IntoIterator<Item = (SourceKind, SourceResult)>>(iter: I) -> Self {
        let mut entries: Vec<(SourceKind, SourceResult)> = Vec::new();
        for (kind, result) in iter {
            if !entries.iter().any(|(k, _)| *k == kind) {
                entries.push((kind, result));
            }
        }
        Self { entries }
    }
}

impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, result) in &self.entries {
            map.serialize_entry(kind.key(), result)?;
        }
        map.end()
    }
}
