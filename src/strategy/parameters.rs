use serde::{Deserialize, Serialize};

/// Optimisation space a parameter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    Buy,
    Sell,
}

/// Externally tunable strategy parameter, consumed by the host's
/// hyperparameter optimiser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HyperParameter {
    Int {
        name: String,
        low: i64,
        high: i64,
        default: i64,
        space: Space,
        load: bool,
        optimize: bool,
    },
    Decimal {
        name: String,
        low: f64,
        high: f64,
        default: f64,
        space: Space,
        load: bool,
        optimize: bool,
    },
    Categorical {
        name: String,
        choices: Vec<String>,
        default: String,
        space: Space,
        load: bool,
        optimize: bool,
    },
    Boolean {
        name: String,
        default: bool,
        space: Space,
        load: bool,
        optimize: bool,
    },
}

impl HyperParameter {
    pub fn int(name: &str, low: i64, high: i64, default: i64, space: Space) -> Self {
        HyperParameter::Int {
            name: name.to_string(),
            low,
            high,
            default,
            space,
            load: true,
            optimize: true,
        }
    }

    pub fn decimal(name: &str, low: f64, high: f64, default: f64, space: Space) -> Self {
        HyperParameter::Decimal {
            name: name.to_string(),
            low,
            high,
            default,
            space,
            load: true,
            optimize: true,
        }
    }

    pub fn categorical(name: &str, choices: &[&str], default: &str, space: Space) -> Self {
        HyperParameter::Categorical {
            name: name.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            default: default.to_string(),
            space,
            load: true,
            optimize: true,
        }
    }

    pub fn boolean(name: &str, default: bool, space: Space) -> Self {
        HyperParameter::Boolean {
            name: name.to_string(),
            default,
            space,
            load: true,
            optimize: true,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            HyperParameter::Int { name, .. }
            | HyperParameter::Decimal { name, .. }
            | HyperParameter::Categorical { name, .. }
            | HyperParameter::Boolean { name, .. } => name,
        }
    }

    pub fn space(&self) -> Space {
        match self {
            HyperParameter::Int { space, .. }
            | HyperParameter::Decimal { space, .. }
            | HyperParameter::Categorical { space, .. }
            | HyperParameter::Boolean { space, .. } => *space,
        }
    }

    /// Default lies inside the declared range or choices
    pub fn is_consistent(&self) -> bool {
        match self {
            HyperParameter::Int { low, high, default, .. } => {
                (*low.min(high)..=*low.max(high)).contains(default)
            }
            HyperParameter::Decimal { low, high, default, .. } => {
                low.min(*high) <= *default && *default <= low.max(*high)
            }
            HyperParameter::Categorical { choices, default, .. } => choices.contains(default),
            HyperParameter::Boolean { .. } => true,
        }
    }

    pub fn default_value(&self) -> serde_json::Value {
        match self {
            HyperParameter::Int { default, .. } => serde_json::json!(default),
            HyperParameter::Decimal { default, .. } => serde_json::json!(default),
            HyperParameter::Categorical { default, .. } => serde_json::json!(default),
            HyperParameter::Boolean { default, .. } => serde_json::json!(default),
        }
    }
}

/// Custom exit (dynamic ROI) and custom stoploss parameters shared by the
/// neural-network strategies
pub fn exit_parameters() -> Vec<HyperParameter> {
    use HyperParameter as P;
    vec![
        // Custom exit profit
        P::categorical("cexit_roi_type", &["static", "decay", "step"], "step", Space::Sell),
        P::int("cexit_roi_time", 720, 1440, 720, Space::Sell),
        P::decimal("cexit_roi_start", 0.01, 0.05, 0.01, Space::Sell),
        P::decimal("cexit_roi_end", 0.0, 0.01, 0.0, Space::Sell),
        P::categorical("cexit_trend_type", &["rmi", "ssl", "candle", "any", "none"], "any", Space::Sell),
        P::boolean("cexit_pullback", true, Space::Sell),
        P::decimal("cexit_pullback_amount", 0.005, 0.03, 0.01, Space::Sell),
        P::boolean("cexit_pullback_respect_roi", false, Space::Sell),
        P::boolean("cexit_endtrend_respect_roi", false, Space::Sell),
        // Custom stoploss
        P::decimal("cstop_loss_threshold", -0.05, -0.01, -0.03, Space::Sell),
        P::categorical("cstop_bail_how", &["roc", "time", "any", "none"], "none", Space::Sell),
        P::decimal("cstop_bail_roc", -5.0, -1.0, -3.0, Space::Sell),
        P::int("cstop_bail_time", 60, 1440, 720, Space::Sell),
        P::boolean("cstop_bail_time_trend", true, Space::Sell),
        P::decimal("cstop_max_stoploss", -0.30, -0.01, -0.10, Space::Sell),
    ]
}
