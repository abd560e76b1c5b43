use serde::{Serialize, Serializer};

use crate::config::AppConfig;
use crate::parser::types::OrderRecord;

pub const CATEGORY_FNB: &str = "F&B";
pub const CATEGORY_GROCERY: &str = "Grocery";

/// Delivery SLA verdict for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlaStatus {
    Within,
    Breached,
    /// Creation or delivery timestamp missing.
    NotApplicable,
    /// Timestamps present but inconsistent (delivered before created).
    Invalid,
}

impl SlaStatus {
    pub const ALL: [SlaStatus; 4] = [
        SlaStatus::Within,
        SlaStatus::Breached,
        SlaStatus::NotApplicable,
        SlaStatus::Invalid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SlaStatus::Within => "Within SLA",
            SlaStatus::Breached => "SLA Breached",
            SlaStatus::NotApplicable => "NA",
            SlaStatus::Invalid => "Invalid",
        }
    }

    /// Within or Breached: the order counts towards compliance figures.
    pub fn is_defined(self) -> bool {
        matches!(self, SlaStatus::Within | SlaStatus::Breached)
    }
}

impl Serialize for SlaStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// Verdict plus the figures it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaOutcome {
    pub status: SlaStatus,
    pub elapsed_hours: Option<f64>,
    pub threshold_hours: f64,
    /// Set for `Invalid` outcomes.
    pub reason: Option<String>,
}

/// SLA threshold in hours for an order category.
/// F&B and Grocery have dedicated thresholds; every other category,
/// including a missing one, gets the default.
pub fn threshold_hours(category: Option<&str>, config: &AppConfig) -> f64 {
    match category {
        Some(CATEGORY_FNB) => config.sla_fnb_hours,
        Some(CATEGORY_GROCERY) => config.sla_grocery_hours,
        _ => config.sla_default_hours,
    }
}

/// Classify an order against its category SLA.
///
/// The threshold is inclusive: delivering in exactly `threshold` hours is
/// within SLA.
pub fn classify_sla(order: &OrderRecord, config: &AppConfig) -> SlaOutcome {
    let threshold = threshold_hours(order.category.as_deref(), config);

    let (created, delivered) = match (order.created_at, order.delivered_at) {
        (Some(c), Some(d)) => (c, d),
        _ => {
            return SlaOutcome {
                status: SlaStatus::NotApplicable,
                elapsed_hours: None,
                threshold_hours: threshold,
                reason: None,
            }
        }
    };

    // milliseconds keep the sub-second part of `.sssZ` stamps
    let elapsed = (delivered - created).num_milliseconds() as f64 / 3_600_000.0;

    if elapsed < 0.0 {
        let reason = format!(
            "delivered {:.2}h before creation ({} < {})",
            -elapsed,
            delivered.format("%Y-%m-%d %H:%M"),
            created.format("%Y-%m-%d %H:%M")
        );
        log::warn!("line {}: invalid SLA input, {}", order.line, reason);
        return SlaOutcome {
            status: SlaStatus::Invalid,
            elapsed_hours: Some(elapsed),
            threshold_hours: threshold,
            reason: Some(reason),
        };
    }

    let status = if elapsed <= threshold {
        SlaStatus::Within
    } else {
        SlaStatus::Breached
    };

    SlaOutcome {
        status,
        elapsed_hours: Some(elapsed),
        threshold_hours: threshold,
        reason: None,
    }
}

/// Classify every order, preserving order.
pub fn classify_all(orders: &[OrderRecord], config: &AppConfig) -> Vec<SlaOutcome> {
    orders.iter().map(|o| classify_sla(o, config)).collect()
}
