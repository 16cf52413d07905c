//! Filtering and random selection over the store.
//!
//! Filters combine with AND semantics. Selection is uniform over the
//! candidate set and takes the RNG as a parameter, so handlers pass a fresh
//! thread RNG (never a fixed process seed) and tests pass a seeded one.
//! An empty candidate set is a `None`, never an error.

use rand::Rng;
use rand::seq::{IteratorRandom, SliceRandom};

use crate::script::{EpisodeScript, LineKind, ScriptRecord, Sketch};
use crate::store::ScriptStore;

/// Optional quote filters, combined with AND.
#[derive(Clone, Debug, Default)]
pub struct QuoteFilter {
    /// Exact episode number.
    pub episode: Option<u32>,
    /// Case-insensitive substring of the actor's name.
    pub actor: Option<String>,
    /// Case-insensitive substring of the sketch name.
    pub sketch: Option<String>,
    /// Upper bound on the quote length, in characters.
    pub max_length: Option<usize>,
}

impl QuoteFilter {
    /// Whether `record` is a quotable line passing every set filter.
    ///
    /// Only `Dialogue` records with text qualify as quotes at all.
    pub fn matches(&self, record: &ScriptRecord) -> bool {
        if record.kind != LineKind::Dialogue {
            return false;
        }
        let Some(text) = record.detail.as_deref() else {
            return false;
        };
        if let Some(episode) = self.episode {
            if record.episode != episode {
                return false;
            }
        }
        if let Some(actor) = self.actor.as_deref() {
            if !record.actor.as_deref().is_some_and(|a| contains_fold(a, actor)) {
                return false;
            }
        }
        if let Some(sketch) = self.sketch.as_deref() {
            if !record.segment.as_deref().is_some_and(|s| contains_fold(s, sketch)) {
                return false;
            }
        }
        if let Some(max) = self.max_length {
            if text.chars().count() > max {
                return false;
            }
        }
        true
    }
}

/// Case-insensitive substring match.
fn contains_fold(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// One uniformly random record among those passing `filter`.
pub fn random_quote<'a, R: Rng>(
    store: &'a ScriptStore,
    filter: &QuoteFilter,
    rng: &mut R,
) -> Option<&'a ScriptRecord> {
    store
        .records()
        .iter()
        .filter(|record| filter.matches(record))
        .choose(rng)
}

/// One uniformly random named sketch.
pub fn random_sketch<'a, R: Rng>(store: &'a ScriptStore, rng: &mut R) -> Option<Sketch<'a>> {
    store
        .sketch_keys()
        .iter()
        .choose(rng)
        .map(|key| store.sketch(key))
}

/// One uniformly random episode present in the dataset.
pub fn random_episode<'a, R: Rng>(
    store: &'a ScriptStore,
    rng: &mut R,
) -> Option<EpisodeScript<'a>> {
    let number = *store.episodes().as_slice().choose(rng)?;
    store.episode(number)
}
