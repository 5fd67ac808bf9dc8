//! # Credit Rate
//!
//! Source of the currency value of one carbon credit. The ledger and the
//! wallet view both read the rate through [`RateProvider`]; every ledger row
//! stores the rate it was written with.

/// Provides the current market rate for one carbon credit.
pub trait RateProvider: Send + Sync {
    fn current_rate(&self) -> f64;
}

/// A rate fixed at startup from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRate(pub f64);

impl RateProvider for FixedRate {
    fn current_rate(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_fixed_rate_behind_trait_object() {
        let rates: Arc<dyn RateProvider> = Arc::new(FixedRate(1500.0));
        assert_eq!(rates.current_rate(), 1500.0);
    }
}
