pub mod aggregate;
pub mod classify;
pub mod compose;
pub mod impact;

pub use aggregate::{aggregate, round2, Aggregate, Contribution};
pub use classify::{classify, EfficiencyScore, SCORE_THRESHOLDS};
pub use compose::{calculate_footprint, category_subtotal, compose_total, CategorySubtotal, Footprint};
pub use impact::{project, ImpactConstants, ImpactProjection};
