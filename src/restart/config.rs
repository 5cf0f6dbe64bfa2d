//! Restart scheduler configuration.

/// Configuration for the anytime restart scheduler.
///
/// # Examples
///
/// ```
/// use u_tsp::restart::RestartConfig;
///
/// let config = RestartConfig::default()
///     .with_time_limit_ms(1_900)
///     .with_max_restarts(50)
///     .with_seed(412);
/// assert_eq!(config.max_restarts, 50);
/// assert_eq!(config.seed, Some(412));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestartConfig {
    /// Wall-clock budget in milliseconds.
    ///
    /// Checked before each restart only; a restart that has started always
    /// runs to completion, so a run may overshoot by one restart's worth
    /// of work. A budget of 0 goes straight to the forced fallback.
    pub time_limit_ms: u64,

    /// Upper bound on the number of restarts.
    ///
    /// The effective count is `min(max_restarts, n)`: vertex 0 plus up to
    /// `n - 1` distinct other start vertices.
    pub max_restarts: usize,

    /// Random seed for start-vertex selection and tie-breaking.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 1_800,
            max_restarts: 20,
            seed: None,
        }
    }
}

impl RestartConfig {
    /// Sets the wall-clock budget in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the maximum number of restarts.
    pub fn with_max_restarts(mut self, n: usize) -> Self {
        self.max_restarts = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_restarts == 0 {
            return Err("max_restarts must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RestartConfig::default();
        assert_eq!(config.time_limit_ms, 1_800);
        assert_eq!(config.max_restarts, 20);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder() {
        let config = RestartConfig::default()
            .with_time_limit_ms(500)
            .with_max_restarts(4)
            .with_seed(7);
        assert_eq!(config.time_limit_ms, 500);
        assert_eq!(config.max_restarts, 4);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate_ok() {
        assert!(RestartConfig::default().validate().is_ok());
        assert!(RestartConfig::default()
            .with_time_limit_ms(0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_zero_restarts() {
        let config = RestartConfig::default().with_max_restarts(0);
        assert!(config.validate().is_err());
    }
}
