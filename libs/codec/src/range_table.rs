//! Range table: the empirically validated value ranges for each field kind
//!
//! Classification is a first-match walk over an ordered list of rules. The
//! order is load-bearing: ranges overlap numerically (volume, liquidity and
//! market cap all cover 1e5), and whichever rule comes first absorbs the
//! ambiguous values. The allowed encodings per rule are what keep the later
//! rules reachable, e.g. liquidity is only ever reported as an f32 while volume
//! is an f64.
//!
//! The table is plain data and deserializes from TOML, so recalibrating against
//! a drifted upstream format does not need a code change.

use serde::{Deserialize, Serialize};
use types::{Encoding, FieldKind};

/// Acceptable error when comparing a decoded value with a known reference value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Tolerance {
    /// Fraction of the expected value
    Relative(f64),
    /// Fixed distance from the expected value
    Absolute(f64),
}

impl Tolerance {
    pub fn accepts(&self, expected: f64, actual: f64) -> bool {
        let allowed = match *self {
            Tolerance::Relative(fraction) => expected.abs() * fraction,
            Tolerance::Absolute(distance) => distance,
        };
        (actual - expected).abs() <= allowed
    }
}

/// One row of the range table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRule {
    pub kind: FieldKind,
    pub min: f64,
    pub max: f64,
    /// Lower bound is exclusive when set
    #[serde(default)]
    pub min_exclusive: bool,
    /// Values whose magnitude is at or below this are rejected
    #[serde(default)]
    pub min_magnitude: Option<f64>,
    pub encodings: Vec<Encoding>,
    #[serde(default)]
    pub tolerance: Option<Tolerance>,
}

impl RangeRule {
    pub fn matches(&self, value: f64, encoding: Encoding) -> bool {
        if !self.encodings.contains(&encoding) {
            return false;
        }

        let above_min = if self.min_exclusive {
            value > self.min
        } else {
            value >= self.min
        };

        above_min
            && value <= self.max
            && self.min_magnitude.map_or(true, |floor| value.abs() > floor)
    }
}

/// Ordered classification rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeTable {
    rules: Vec<RangeRule>,
}

impl Default for RangeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RangeTable {
    pub fn new(rules: Vec<RangeRule>) -> Self {
        Self { rules }
    }

    /// Ranges observed on the Solana pairs stream
    pub fn standard() -> Self {
        use Encoding::{F32, F64, U32};

        Self::new(vec![
            RangeRule {
                kind: FieldKind::Price,
                min: 1e-6,
                max: 0.1,
                min_exclusive: true,
                min_magnitude: None,
                encodings: vec![F32, F64],
                tolerance: Some(Tolerance::Relative(0.02)),
            },
            RangeRule {
                kind: FieldKind::Volume,
                min: 1e3,
                max: 1e7,
                min_exclusive: false,
                min_magnitude: None,
                encodings: vec![F64],
                tolerance: Some(Tolerance::Relative(0.05)),
            },
            RangeRule {
                kind: FieldKind::Liquidity,
                min: 1e4,
                max: 1e6,
                min_exclusive: false,
                min_magnitude: None,
                encodings: vec![F32],
                tolerance: Some(Tolerance::Relative(0.05)),
            },
            RangeRule {
                kind: FieldKind::MarketCap,
                min: 1e5,
                max: 5e7,
                min_exclusive: false,
                min_magnitude: None,
                encodings: vec![F32, F64],
                tolerance: Some(Tolerance::Relative(0.05)),
            },
            RangeRule {
                kind: FieldKind::TxCount,
                min: 10.0,
                max: 5e4,
                min_exclusive: false,
                min_magnitude: None,
                encodings: vec![U32],
                tolerance: Some(Tolerance::Absolute(5.0)),
            },
            RangeRule {
                kind: FieldKind::MakerCount,
                min: 10.0,
                max: 1.5e4,
                min_exclusive: false,
                min_magnitude: None,
                encodings: vec![F32, F64, U32],
                tolerance: Some(Tolerance::Absolute(3.0)),
            },
            RangeRule {
                kind: FieldKind::PercentChange,
                min: -100.0,
                max: 1000.0,
                min_exclusive: false,
                min_magnitude: Some(0.01),
                encodings: vec![F32, F64],
                tolerance: None,
            },
        ])
    }

    pub fn rules(&self) -> &[RangeRule] {
        &self.rules
    }

    /// First matching rule wins; no match means `Unclassified`
    pub fn classify(&self, value: f64, encoding: Encoding) -> FieldKind {
        self.rules
            .iter()
            .find(|rule| rule.matches(value, encoding))
            .map(|rule| rule.kind)
            .unwrap_or(FieldKind::Unclassified)
    }

    pub fn rule_for(&self, kind: FieldKind) -> Option<&RangeRule> {
        self.rules.iter().find(|rule| rule.kind == kind)
    }

    pub fn tolerance(&self, kind: FieldKind) -> Option<Tolerance> {
        self.rule_for(kind).and_then(|rule| rule.tolerance)
    }

    /// Checks that every rule is well formed and that no kind appears twice
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            if rule.kind == FieldKind::Unclassified {
                return Err("range table cannot contain a rule for unclassified".to_string());
            }
            if !rule.min.is_finite() || !rule.max.is_finite() || rule.min > rule.max {
                return Err(format!(
                    "range for {} is not a finite ascending interval: [{}, {}]",
                    rule.kind, rule.min, rule.max
                ));
            }
            if rule.encodings.is_empty() {
                return Err(format!("range for {} allows no encodings", rule.kind));
            }
            if seen.contains(&rule.kind) {
                return Err(format!("duplicate range for {}", rule.kind));
            }
            seen.push(rule.kind);
        }

        Ok(())
    }
}
