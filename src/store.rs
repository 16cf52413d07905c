//! The read-only script store.
//!
//! Every record is loaded into memory once at startup and never mutated, so
//! handlers share the store behind a plain `Arc` with no locking. The store
//! owns the two orders the API exposes: records sorted by `index` (original
//! row order) and the sketch index in first-appearance order.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::script::{EpisodeScript, ScriptRecord, Sketch, SketchBlock};

/// Identity of one sketch: the `(episode, segment)` pair.
///
/// Keys exist only for named segments; the unnamed block at the top of an
/// episode is reachable through [`ScriptStore::episode`] but is not a sketch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SketchKey {
    pub episode: u32,
    pub name: String,
}

/// The loaded dataset.
pub struct ScriptStore {
    /// All records, sorted by `index`.
    records: Vec<ScriptRecord>,
    /// Distinct named `(episode, segment)` pairs, first-appearance order.
    sketch_keys: Vec<SketchKey>,
}

impl ScriptStore {
    /// Loads the dataset from a JSON array of records.
    ///
    /// This is the one blocking read of the process, done before the server
    /// binds. Any failure here aborts startup.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|source| Error::DatasetRead {
            path: path.to_owned(),
            source,
        })?;
        let records = serde_json::from_slice(&raw).map_err(|source| Error::DatasetParse {
            path: path.to_owned(),
            source,
        })?;
        Self::from_records(records)
    }

    /// Builds a store from records already in memory. Fails on an empty set:
    /// a quote service with no quotes can only ever answer 404.
    pub fn from_records(mut records: Vec<ScriptRecord>) -> Result<Self, Error> {
        if records.is_empty() {
            return Err(Error::EmptyDataset);
        }
        records.sort_by_key(|record| record.index);

        let mut sketch_keys = Vec::new();
        let mut seen: HashSet<(u32, &str)> = HashSet::new();
        for record in &records {
            if let Some(name) = record.segment.as_deref() {
                if seen.insert((record.episode, name)) {
                    sketch_keys.push(SketchKey {
                        episode: record.episode,
                        name: name.to_owned(),
                    });
                }
            }
        }

        Ok(Self { records, sketch_keys })
    }

    /// Every record, in row order.
    pub fn records(&self) -> &[ScriptRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The sketch index: every named sketch, first-appearance order.
    pub fn sketch_keys(&self) -> &[SketchKey] {
        &self.sketch_keys
    }

    /// Distinct sketch names across the whole run, first-appearance order.
    pub fn sketch_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut seen = HashSet::new();
        for key in &self.sketch_keys {
            if seen.insert(key.name.as_str()) {
                names.push(key.name.as_str());
            }
        }
        names
    }

    /// Distinct episode numbers present in the dataset, ascending.
    pub fn episodes(&self) -> Vec<u32> {
        let numbers: BTreeSet<u32> = self.records.iter().map(|record| record.episode).collect();
        numbers.into_iter().collect()
    }

    pub fn has_episode(&self, number: u32) -> bool {
        self.records.iter().any(|record| record.episode == number)
    }

    /// Sketch names of one episode, first-appearance order.
    pub fn sketches_in_episode(&self, number: u32) -> Vec<&str> {
        self.sketch_keys
            .iter()
            .filter(|key| key.episode == number)
            .map(|key| key.name.as_str())
            .collect()
    }

    /// Materializes the sketch behind a key from the store's own index.
    pub fn sketch<'a>(&'a self, key: &'a SketchKey) -> Sketch<'a> {
        let lines: Vec<&ScriptRecord> = self
            .records
            .iter()
            .filter(|record| {
                record.episode == key.episode && record.segment.as_deref() == Some(key.name.as_str())
            })
            .collect();
        let episode_name = lines
            .iter()
            .find_map(|record| record.episode_name.as_deref())
            .or_else(|| self.episode_name(key.episode));
        Sketch {
            episode: key.episode,
            episode_name,
            name: key.name.as_str(),
            lines,
        }
    }

    /// Looks a sketch up by name, case-insensitively.
    ///
    /// A name that appears in several episodes resolves to its first
    /// `(episode, segment)` group in row order.
    pub fn find_sketch(&self, name: &str) -> Option<Sketch<'_>> {
        let wanted = name.to_lowercase();
        let key = self
            .sketch_keys
            .iter()
            .find(|key| key.name.to_lowercase() == wanted)?;
        Some(self.sketch(key))
    }

    /// The full script of one episode, grouped by sketch in first-appearance
    /// order. The unnamed opening block is included with `name: None`.
    pub fn episode(&self, number: u32) -> Option<EpisodeScript<'_>> {
        let rows: Vec<&ScriptRecord> = self
            .records
            .iter()
            .filter(|record| record.episode == number)
            .collect();
        if rows.is_empty() {
            return None;
        }
        let episode_name = rows.iter().find_map(|record| record.episode_name.as_deref());

        let mut sketches: Vec<SketchBlock<'_>> = Vec::new();
        for row in rows {
            let name = row.segment.as_deref();
            match sketches.iter_mut().find(|block| block.name == name) {
                Some(block) => block.lines.push(row),
                None => sketches.push(SketchBlock { name, lines: vec![row] }),
            }
        }

        Some(EpisodeScript {
            episode: number,
            episode_name,
            sketches,
        })
    }

    fn episode_name(&self, number: u32) -> Option<&str> {
        self.records
            .iter()
            .filter(|record| record.episode == number)
            .find_map(|record| record.episode_name.as_deref())
    }
}
