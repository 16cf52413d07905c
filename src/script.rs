//! The script data model.
//!
//! One [`ScriptRecord`] is one row of the Flying Circus scripts dataset: a
//! single line of dialogue or a single stage direction, tagged with its
//! episode and sketch. A [`Sketch`] is a view over the records that share one
//! `(episode, segment)` pair, in original row order. Records never change
//! after load.

use serde::{Deserialize, Serialize};

// ── LineKind ─────────────────────────────────────────────────────────────────

/// What a script line is: spoken dialogue, or everything else.
///
/// The dataset tags rows with a free-form `type` column. Only `"Dialogue"`
/// carries a quotable line; any other tag is treated as a stage direction,
/// which is also how unknown tags deserialize.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LineKind {
    Dialogue,
    #[serde(other)]
    Direction,
}

// ── ScriptRecord ─────────────────────────────────────────────────────────────

/// One row of the scripts dataset.
///
/// `index` is the record's identity and fixes the original row order. The
/// text lives in `detail`; `segment` names the sketch the line belongs to and
/// is absent for the unnamed block at the top of an episode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub index: u32,
    pub episode: u32,
    pub episode_name: Option<String>,
    pub segment: Option<String>,
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub actor: Option<String>,
    pub character: Option<String>,
    pub detail: Option<String>,
    pub series: Option<String>,
    pub transmission_date: Option<String>,
}

impl ScriptRecord {
    /// The line as a single display string.
    ///
    /// Dialogue renders as `"CHARACTER: text"` (bare text when no character
    /// is named); anything else renders as `"*text*"`.
    pub fn render(&self) -> String {
        let text = self.detail.as_deref().unwrap_or("");
        match (self.kind, self.character.as_deref()) {
            (LineKind::Dialogue, Some(character)) => format!("{character}: {text}"),
            (LineKind::Dialogue, None) => text.to_owned(),
            (LineKind::Direction, _) => format!("*{text}*"),
        }
    }

    /// The line as a structured object, for the `detailed` view.
    pub fn detailed(&self) -> DetailedLine<'_> {
        DetailedLine {
            kind: self.kind,
            actor: self.actor.as_deref(),
            character: self.character.as_deref(),
            detail: self.detail.as_deref(),
        }
    }
}

/// One line of a sketch in the `detailed` view: who said what, and how.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DetailedLine<'a> {
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub actor: Option<&'a str>,
    pub character: Option<&'a str>,
    pub detail: Option<&'a str>,
}

// ── Sketch views ─────────────────────────────────────────────────────────────

/// A named sketch: every record of one `(episode, segment)` pair, row order.
#[derive(Clone, Debug)]
pub struct Sketch<'a> {
    pub episode: u32,
    pub episode_name: Option<&'a str>,
    pub name: &'a str,
    pub lines: Vec<&'a ScriptRecord>,
}

impl<'a> Sketch<'a> {
    pub fn body(&self, detailed: bool) -> SketchBody<'a> {
        render_body(&self.lines, detailed)
    }
}

/// A whole episode: its sketches (the unnamed opening block included) in
/// first-appearance order.
#[derive(Clone, Debug)]
pub struct EpisodeScript<'a> {
    pub episode: u32,
    pub episode_name: Option<&'a str>,
    pub sketches: Vec<SketchBlock<'a>>,
}

/// One sketch's worth of lines inside an [`EpisodeScript`]. `name` is `None`
/// for the unnamed block.
#[derive(Clone, Debug)]
pub struct SketchBlock<'a> {
    pub name: Option<&'a str>,
    pub lines: Vec<&'a ScriptRecord>,
}

impl<'a> SketchBlock<'a> {
    pub fn body(&self, detailed: bool) -> SketchBody<'a> {
        render_body(&self.lines, detailed)
    }
}

/// A sketch body ready for serialization: plain display strings, or the
/// structured per-line objects of the `detailed` view.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum SketchBody<'a> {
    Plain(Vec<String>),
    Detailed(Vec<DetailedLine<'a>>),
}

fn render_body<'a>(lines: &[&'a ScriptRecord], detailed: bool) -> SketchBody<'a> {
    if detailed {
        SketchBody::Detailed(lines.iter().map(|line| line.detailed()).collect())
    } else {
        SketchBody::Plain(lines.iter().map(|line| line.render()).collect())
    }
}

// ── Test fixtures ────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod sample {
    use super::*;

    pub(crate) fn line(
        index: u32,
        episode: u32,
        segment: Option<&str>,
        kind: LineKind,
        actor: Option<&str>,
        character: Option<&str>,
        detail: &str,
    ) -> ScriptRecord {
        ScriptRecord {
            index,
            episode,
            episode_name: match episode {
                8 => Some("Full Frontal Nudity".to_owned()),
                15 => Some("The Spanish Inquisition".to_owned()),
                _ => None,
            },
            segment: segment.map(str::to_owned),
            kind,
            actor: actor.map(str::to_owned),
            character: character.map(str::to_owned),
            detail: Some(detail.to_owned()),
            series: None,
            transmission_date: None,
        }
    }

    /// Two episodes, three named sketches, one unnamed opening block.
    pub(crate) fn records() -> Vec<ScriptRecord> {
        use LineKind::{Dialogue, Direction};
        vec![
            line(0, 8, None, Direction, None, None, "Animated titles."),
            line(
                1,
                8,
                Some("Dead Parrot"),
                Direction,
                None,
                None,
                "A customer enters a pet shop.",
            ),
            line(
                2,
                8,
                Some("Dead Parrot"),
                Dialogue,
                Some("John Cleese"),
                Some("Praline"),
                "I wish to complain about this parrot what I purchased not half an hour ago from this very boutique.",
            ),
            line(
                3,
                8,
                Some("Dead Parrot"),
                Dialogue,
                Some("Michael Palin"),
                Some("Shopkeeper"),
                "Oh yes, the Norwegian Blue. What's wrong with it?",
            ),
            line(
                4,
                8,
                Some("Dead Parrot"),
                Dialogue,
                Some("John Cleese"),
                Some("Praline"),
                "This parrot is no more.",
            ),
            line(
                5,
                8,
                Some("Hell's Grannies"),
                Dialogue,
                Some("Eric Idle"),
                Some("Reporter"),
                "These layabouts in lace are a growing problem.",
            ),
            line(
                6,
                15,
                Some("The Spanish Inquisition"),
                Dialogue,
                Some("Michael Palin"),
                Some("Ximénez"),
                "Nobody expects the Spanish Inquisition!",
            ),
            line(
                7,
                15,
                Some("The Spanish Inquisition"),
                Dialogue,
                Some("Terry Jones"),
                Some("Biggles"),
                "I didn't expect a kind of Spanish Inquisition.",
            ),
            line(
                8,
                15,
                Some("The Spanish Inquisition"),
                Direction,
                None,
                None,
                "The door flies open and Cardinal Ximénez of Spain enters.",
            ),
        ]
    }
}
