use serde::{Deserialize, Serialize};

/// Stored answer to the cookie banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookieConsent {
    #[default]
    Unset,
    Accepted,
    Declined,
}

impl CookieConsent {
    /// Reads a stored value. Anything non-empty counts as a decision, so an
    /// unknown value keeps the banner hidden like any other answer would.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            None | Some("") => CookieConsent::Unset,
            Some("accepted") => CookieConsent::Accepted,
            Some(_) => CookieConsent::Declined,
        }
    }

    pub fn as_stored(&self) -> Option<&'static str> {
        match self {
            CookieConsent::Unset => None,
            CookieConsent::Accepted => Some("accepted"),
            CookieConsent::Declined => Some("declined"),
        }
    }

    pub fn is_decided(&self) -> bool {
        *self != CookieConsent::Unset
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub menu_open: bool,
    pub cookie_consent: CookieConsent,
    pub form_submitting: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_values_map_to_decisions() {
        assert_eq!(CookieConsent::from_stored(None), CookieConsent::Unset);
        assert_eq!(CookieConsent::from_stored(Some("")), CookieConsent::Unset);
        assert_eq!(CookieConsent::from_stored(Some("accepted")), CookieConsent::Accepted);
        assert_eq!(CookieConsent::from_stored(Some("declined")), CookieConsent::Declined);
        assert!(CookieConsent::from_stored(Some("whatever")).is_decided());
    }

    #[test]
    fn unset_is_never_written() {
        assert_eq!(CookieConsent::Unset.as_stored(), None);
        assert_eq!(CookieConsent::Declined.as_stored(), Some("declined"));
    }
}
