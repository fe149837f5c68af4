//! Structured diagnostics for load and sort milestones.
//!
//! The `log_metric!` macro emits a single `key=value` line through the `log`
//! facade at debug level. The `#[cfg(debug_assertions)]` attribute compiles every
//! call out of release builds, so the timed regions of a benchmark never pay for it.

/// Logs a structured key-value metric line, only in debug builds.
///
/// # Example
/// ```
/// use indisort::log_metric;
/// let rows = 4;
/// log_metric!("event"="index_built", "rows"=&rows);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts: Vec<String> = Vec::new();
            $(
                parts.push(format!("{}={}", $key, $value));
            )+

            log::debug!("INDISORT_METRIC: {}", parts.join(" "));
        }
    };
}
