/// Tunable ceilings and confidence levels for [`crate::analyze`] and
/// [`crate::confidence`] (§10.3).
///
/// The spec states these as approximate values ("≈100 passes", "step cap ≥
/// 10⁵"); this struct holds the concrete defaults so callers can override
/// them without touching the worklist or stepper themselves.
///
/// Use [`AnalyzerConfigurationBuilder`] to construct one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfiguration {
    max_passes: u32,
    step_cap: u32,
    concrete_confidence: f64,
    abstract_confidence: f64,
}

impl AnalyzerConfiguration {
    /// The worklist pass cap passed to the abstract interpreter.
    #[must_use]
    pub fn max_passes(&self) -> u32 {
        self.max_passes
    }

    /// The step cap passed to the concrete interpreter's run loop.
    #[must_use]
    pub fn step_cap(&self) -> u32 {
        self.step_cap
    }

    /// Confidence assigned to an outcome witnessed by the concrete
    /// interpreter (§7, §10.5: always 100% per the spec).
    #[must_use]
    pub fn concrete_confidence(&self) -> f64 {
        self.concrete_confidence
    }

    /// Confidence assigned to an outcome predicted only by abstract
    /// interpretation (§10.5: "a lower fixed confidence").
    #[must_use]
    pub fn abstract_confidence(&self) -> f64 {
        self.abstract_confidence
    }
}

impl Default for AnalyzerConfiguration {
    fn default() -> Self {
        AnalyzerConfiguration {
            max_passes: jpamb_abstract::MAX_PASSES,
            step_cap: jpamb_concrete::DEFAULT_STEP_CAP,
            concrete_confidence: 1.0,
            abstract_confidence: 0.5,
        }
    }
}

/// Fluent builder for [`AnalyzerConfiguration`], grounded in the
/// `ConfigurationBuilder` pattern used for VM configuration: every setter
/// takes `self` by value and returns `Self`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfigurationBuilder {
    config: AnalyzerConfiguration,
}

impl AnalyzerConfigurationBuilder {
    #[must_use]
    pub fn new() -> Self {
        AnalyzerConfigurationBuilder {
            config: AnalyzerConfiguration::default(),
        }
    }

    #[must_use]
    pub fn max_passes(mut self, max_passes: u32) -> Self {
        self.config.max_passes = max_passes;
        self
    }

    #[must_use]
    pub fn step_cap(mut self, step_cap: u32) -> Self {
        self.config.step_cap = step_cap;
        self
    }

    #[must_use]
    pub fn concrete_confidence(mut self, confidence: f64) -> Self {
        self.config.concrete_confidence = confidence;
        self
    }

    #[must_use]
    pub fn abstract_confidence(mut self, confidence: f64) -> Self {
        self.config.abstract_confidence = confidence;
        self
    }

    #[must_use]
    pub fn build(self) -> AnalyzerConfiguration {
        self.config
    }
}

impl Default for AnalyzerConfigurationBuilder {
    fn default() -> Self {
        AnalyzerConfigurationBuilder::new()
    }
}
