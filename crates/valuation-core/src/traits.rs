use crate::ValuationError;
use async_trait::async_trait;

/// Source of the annualized risk-free rate.
///
/// Implementations perform I/O; the valuation engine never does. Callers own
/// caching and the fallback default when a source fails.
#[async_trait]
pub trait RiskFreeRateSource: Send + Sync {
    async fn latest_rate(&self) -> Result<f64, ValuationError>;
}
