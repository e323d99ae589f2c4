use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Macroeconomic indicator set appended to macro-path feature rows.
///
/// Produced fresh per request; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicators {
    pub interest_rate: f64,
    pub employment_rate: f64,
    pub inflation_rate: f64,
    pub gdp_growth_rate: f64,
}

impl MacroIndicators {
    /// Fixed values substituted whenever the external data source cannot be
    /// reached. Keeping predictions flowing on stale defaults is a
    /// deliberate availability tradeoff, not an incidental error handler.
    pub const fn fallback() -> Self {
        Self {
            interest_rate: 5.0,
            employment_rate: 95.0,
            inflation_rate: 3.0,
            gdp_growth_rate: 2.0,
        }
    }
}

/// Source of macroeconomic indicators.
///
/// Implementations are fail-open: any upstream failure must be absorbed and
/// replaced by [`MacroIndicators::fallback`], so the prediction path never
/// fails solely because the data source is unavailable.
#[async_trait]
pub trait IndicatorProvider: Send + Sync {
    async fn fetch_indicators(&self) -> MacroIndicators;
}

/// Provider returning a fixed indicator set. Used by the offline `score`
/// command and by tests that need deterministic macro features.
#[derive(Debug, Clone)]
pub struct StaticIndicatorProvider {
    indicators: MacroIndicators,
}

impl StaticIndicatorProvider {
    pub fn new(indicators: MacroIndicators) -> Self {
        Self { indicators }
    }
}

impl Default for StaticIndicatorProvider {
    fn default() -> Self {
        Self::new(MacroIndicators::fallback())
    }
}

#[async_trait]
impl IndicatorProvider for StaticIndicatorProvider {
    async fn fetch_indicators(&self) -> MacroIndicators {
        self.indicators
    }
}
