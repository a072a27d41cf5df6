use crate::{
    model::{Assessment, FraudLabel, Transaction},
    scorers::Scorer,
};

pub const LOW_RISK_EXPLANATION: &str = "Low-risk pattern";
pub const RISK_DRIVERS_PREFIX: &str = "Risk drivers: ";

/// Weights and ratio divisors of the weighted-sum heuristic.
///
/// Ratio signals contribute `min(value / divisor, 1) * weight`, flags
/// contribute their full weight. The weights add up to 1.20, so the summed
/// score is clamped into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub amount: f64,
    pub amount_divisor: f64,
    pub distance_from_home: f64,
    pub distance_from_home_divisor: f64,
    pub distance_from_last_transaction: f64,
    pub distance_from_last_transaction_divisor: f64,
    pub new_merchant: f64,
    pub online_order: f64,
    pub no_chip: f64,
    pub no_pin: f64,
    pub international: f64,
    pub velocity: f64,
    pub velocity_divisor: f64,
    pub night_time: f64,
    /// Inclusive range of hours counted as night time.
    pub night_start_hour: u8,
    pub night_end_hour: u8,
    pub fraud_threshold: f64,
}

impl ScoringWeights {
    pub const DEFAULT: ScoringWeights = ScoringWeights {
        amount: 0.25,
        amount_divisor: 500.0,
        distance_from_home: 0.10,
        distance_from_home_divisor: 1000.0,
        distance_from_last_transaction: 0.10,
        distance_from_last_transaction_divisor: 500.0,
        new_merchant: 0.10,
        online_order: 0.10,
        no_chip: 0.08,
        no_pin: 0.08,
        international: 0.10,
        velocity: 0.19,
        velocity_divisor: 20.0,
        night_time: 0.10,
        night_start_hour: 0,
        night_end_hour: 4,
        fraud_threshold: 0.5,
    };

    pub fn max_raw_score(&self) -> f64 {
        self.amount
            + self.distance_from_home
            + self.distance_from_last_transaction
            + self.new_merchant
            + self.online_order
            + self.no_chip
            + self.no_pin
            + self.international
            + self.velocity
            + self.night_time
    }

    pub fn is_night(&self, hour: u8) -> bool {
        (self.night_start_hour..=self.night_end_hour).contains(&hour)
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Cut-offs for the human-readable reasons.
///
/// These are not derived from `ScoringWeights`: an amount of 400 raises the
/// score without producing "high amount", and a velocity of 6 produces
/// "high velocity" while adding little to the score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplanationThresholds {
    pub high_amount: f64,
    pub high_velocity: u32,
    pub far_from_home: f64,
}

impl ExplanationThresholds {
    pub const DEFAULT: ExplanationThresholds = ExplanationThresholds {
        high_amount: 500.0,
        high_velocity: 5,
        far_from_home: 200.0,
    };
}

impl Default for ExplanationThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn ratio(value: f64, divisor: f64) -> f64 {
    (value / divisor).min(1.0)
}

#[derive(Debug, Clone, Default)]
pub struct WeightedSumScorer {
    weights: ScoringWeights,
    thresholds: ExplanationThresholds,
}

impl WeightedSumScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(weights: ScoringWeights, thresholds: ExplanationThresholds) -> Self {
        Self { weights, thresholds }
    }

    /// Sum of all contributions before clamping. Can exceed 1.0.
    pub fn raw_score(&self, tx: &Transaction) -> f64 {
        let w = &self.weights;
        let mut risk = 0.0;

        risk += ratio(tx.amount, w.amount_divisor) * w.amount;
        risk += ratio(tx.distance_from_home, w.distance_from_home_divisor) * w.distance_from_home;
        risk += ratio(
            tx.distance_from_last_transaction,
            w.distance_from_last_transaction_divisor,
        ) * w.distance_from_last_transaction;
        if !tx.repeat_retailer {
            risk += w.new_merchant;
        }
        if tx.online_order {
            risk += w.online_order;
        }
        if !tx.used_chip {
            risk += w.no_chip;
        }
        if !tx.used_pin_number {
            risk += w.no_pin;
        }
        if tx.international {
            risk += w.international;
        }
        risk += ratio(f64::from(tx.velocity_24h), w.velocity_divisor) * w.velocity;
        if w.is_night(tx.hour) {
            risk += w.night_time;
        }

        risk
    }

    pub fn reasons(&self, tx: &Transaction) -> Vec<&'static str> {
        let t = &self.thresholds;
        let mut reasons = Vec::new();

        if tx.amount > t.high_amount {
            reasons.push("high amount");
        }
        if tx.international {
            reasons.push("international");
        }
        if tx.online_order {
            reasons.push("online order");
        }
        if !tx.repeat_retailer {
            reasons.push("new merchant");
        }
        if !tx.used_chip {
            reasons.push("no chip");
        }
        if !tx.used_pin_number {
            reasons.push("no PIN");
        }
        if tx.velocity_24h > t.high_velocity {
            reasons.push("high velocity");
        }
        if tx.distance_from_home > t.far_from_home {
            reasons.push("far from home");
        }
        if self.weights.is_night(tx.hour) {
            reasons.push("night time");
        }

        reasons
    }

    pub fn explain(&self, tx: &Transaction) -> String {
        let reasons = self.reasons(tx);
        if reasons.is_empty() {
            LOW_RISK_EXPLANATION.to_string()
        } else {
            format!("{}{}", RISK_DRIVERS_PREFIX, reasons.join(", "))
        }
    }
}

impl Scorer for WeightedSumScorer {
    fn score(&self, transaction: &Transaction) -> Assessment {
        let score = self.raw_score(transaction).clamp(0.0, 1.0);
        Assessment {
            score,
            label: FraudLabel::from_score(score, self.weights.fraud_threshold),
            explanation: self.explain(transaction),
        }
    }
}
