use std::fmt;

/// Inclusive upper bounds (kgCO2e) and the score they earn.
/// Anything above the last bound scores 1.
pub const SCORE_THRESHOLDS: [(f64, u8); 4] = [(5.0, 5), (13.0, 4), (24.0, 3), (42.0, 2)];

/// Efficiency rating from 1 (heaviest) to 5 (lightest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EfficiencyScore(u8);

impl EfficiencyScore {
    pub const MAX: u8 = 5;

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            5 => "Excellent",
            4 => "Good",
            3 => "Fair",
            2 => "Heavy",
            _ => "Very heavy",
        }
    }

    /// Filled and empty stars, e.g. "★★★☆☆"
    pub fn stars(&self) -> String {
        let filled = self.0 as usize;
        let empty = Self::MAX as usize - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl fmt::Display for EfficiencyScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Map a daily total, or an average of totals, onto a score.
/// Lower emissions score higher. NaN falls through to 1.
pub fn classify(value: f64) -> EfficiencyScore {
    for (bound, score) in SCORE_THRESHOLDS {
        if value <= bound {
            return EfficiencyScore(score);
        }
    }
    EfficiencyScore(1)
}
