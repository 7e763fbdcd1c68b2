/// Invalid scan tuning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanConfigError {
    #[error("min_len must be at least 1")]
    ZeroMinLength,

    #[error("debounce_ms must be greater than zero")]
    ZeroDebounce,
}
