//! The shared event-code → funnel-stage lookup.
//!
//! Every aggregator that needs to label or order event types goes through
//! one injected [`StageMap`] instance, so the code/label/order triples
//! exist in exactly one place.

use indexmap::IndexMap;
use serde::Serialize;

/// One named point in the funnel with its fixed position (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub label: String,
    pub order: u32,
}

/// Ordered lookup from event-type code to funnel stage.
///
/// Iteration order is the canonical funnel order, independent of counts.
#[derive(Debug, Clone)]
pub struct StageMap {
    entries: IndexMap<i64, Stage>,
}

impl StageMap {
    /// Build a map from `(code, label)` pairs; order is assigned by
    /// position, starting at 1.
    pub fn new<L: Into<String>>(entries: impl IntoIterator<Item = (i64, L)>) -> Self {
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(i, (code, label))| {
                (
                    code,
                    Stage {
                        label: label.into(),
                        order: i as u32 + 1,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// The recruitment funnel: view → screened → chat → contact-exchange.
    pub fn standard() -> Self {
        Self::new([
            (1, "View"),
            (2, "Screened"),
            (12, "Chat"),
            (13, "Contact-exchange"),
        ])
    }

    pub fn get(&self, code: i64) -> Option<&Stage> {
        self.entries.get(&code)
    }

    /// Display label for a code; unmapped codes pass through as
    /// `type-<code>` rather than failing.
    pub fn label_for(&self, code: i64) -> String {
        match self.entries.get(&code) {
            Some(stage) => stage.label.clone(),
            None => format!("type-{code}"),
        }
    }

    /// Stages in canonical funnel order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &Stage)> {
        self.entries.iter().map(|(code, stage)| (*code, stage))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
