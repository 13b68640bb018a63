//! Scalar KPI percentages derived from the funnel counts.

use serde::Serialize;

use crate::funnel::{round1, FunnelStage};

/// Dashboard KPI card values. Every rate guards its division: a zero
/// denominator yields 0.0, never NaN or infinity.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct KeyMetrics {
    pub views: i64,
    pub screened: i64,
    pub chats: i64,
    pub contacts: i64,
    /// screened / views, as a percentage.
    pub screening_rate: f64,
    /// chats / screened.
    pub chat_rate: f64,
    /// contacts / screened.
    pub contact_rate: f64,
    /// contacts / chats.
    pub chat_conversion_rate: f64,
}

impl KeyMetrics {
    /// Pure derivation from a funnel result; an empty or zeroed funnel
    /// produces all-zero metrics.
    pub fn from_funnel(funnel: &[FunnelStage]) -> Self {
        let count_at = |order: u32| {
            funnel
                .iter()
                .find(|s| s.order == order)
                .map(|s| s.count)
                .unwrap_or(0)
        };

        let views = count_at(1);
        let screened = count_at(2);
        let chats = count_at(3);
        let contacts = count_at(4);

        Self {
            views,
            screened,
            chats,
            contacts,
            screening_rate: percentage(screened, views),
            chat_rate: percentage(chats, screened),
            contact_rate: percentage(contacts, screened),
            chat_conversion_rate: percentage(contacts, chats),
        }
    }
}

fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator > 0 {
        round1(100.0 * numerator as f64 / denominator as f64)
    } else {
        0.0
    }
}
