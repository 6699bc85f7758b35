use log::Level;

#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Tuning knobs for the page controller. Distances are CSS pixels, durations
/// milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Used when `--header-h` is missing or unparsable.
    pub header_fallback: f64,
    pub header_margin: f64,
    /// Viewports at least this wide never show the collapsed menu.
    pub desktop_breakpoint: f64,
    pub spy_lookahead: f64,
    pub back_to_top_after: f64,
    pub submit_latency_ms: u64,
    pub notice_lifetime_ms: u64,
    pub count_up_duration_ms: u64,
    pub frame_ms: u64,
    pub consent_key: String,
    pub confirmation_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            header_fallback: 80.0,
            header_margin: 16.0,
            desktop_breakpoint: 768.0,
            spy_lookahead: 120.0,
            back_to_top_after: 300.0,
            submit_latency_ms: 1500,
            notice_lifetime_ms: 5000,
            count_up_duration_ms: 2000,
            frame_ms: 16,
            consent_key: "cookieConsent".to_string(),
            confirmation_path: "thank_you.html".to_string(),
        }
    }
}
