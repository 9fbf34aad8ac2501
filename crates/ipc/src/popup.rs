//! Popup-side decisions: page eligibility and which toggle command to send.

use crate::messages::{PenCommand, StatusResponse};

/// URL prefixes where content scripts cannot be injected
pub const NON_INJECTABLE_PREFIXES: [&str; 4] = [
    "chrome://",
    "about:",
    "https://chromewebstore.google.com/",
    "edge://",
];

/// Button text shown when the current page cannot host the overlay
pub const UNAVAILABLE_LABEL: &str = "Not Available on This Page";

/// Whether the overlay can run on a page with this URL.
///
/// A tab without a URL is never eligible.
pub fn is_url_injectable(url: Option<&str>) -> bool {
    match url {
        Some(url) if !url.is_empty() => !NON_INJECTABLE_PREFIXES
            .iter()
            .any(|prefix| url.starts_with(prefix)),
        _ => false,
    }
}

/// Pick the command that flips the pen, based on the freshly queried status.
///
/// A missing status is treated as inactive.
pub fn toggle_command(status: Option<&StatusResponse>) -> PenCommand {
    if status.is_some_and(|s| s.is_pen_active) {
        PenCommand::DeactivatePen
    } else {
        PenCommand::ActivatePen
    }
}

/// Toggle button text for the given activation state
pub fn button_label(active: bool) -> &'static str {
    if active {
        "Deactivate Sparkle Pen"
    } else {
        "Activate Sparkle Pen"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SparkleConfig;

    #[test]
    fn test_regular_pages_are_injectable() {
        assert!(is_url_injectable(Some("https://example.com/")));
        assert!(is_url_injectable(Some("http://localhost:8080/index.html")));
    }

    #[test]
    fn test_restricted_pages_are_not_injectable() {
        assert!(!is_url_injectable(Some("chrome://extensions")));
        assert!(!is_url_injectable(Some("about:blank")));
        assert!(!is_url_injectable(Some("edge://settings")));
        assert!(!is_url_injectable(Some(
            "https://chromewebstore.google.com/detail/abc"
        )));
        assert!(!is_url_injectable(Some("")));
        assert!(!is_url_injectable(None));
    }

    #[test]
    fn test_toggle_command_follows_status() {
        let active = StatusResponse {
            is_pen_active: true,
            current_sparkle_config: SparkleConfig::default(),
        };
        let inactive = StatusResponse {
            is_pen_active: false,
            ..active.clone()
        };

        assert_eq!(toggle_command(Some(&active)), PenCommand::DeactivatePen);
        assert_eq!(toggle_command(Some(&inactive)), PenCommand::ActivatePen);
        assert_eq!(toggle_command(None), PenCommand::ActivatePen);
    }

    #[test]
    fn test_button_label() {
        assert_eq!(button_label(true), "Deactivate Sparkle Pen");
        assert_eq!(button_label(false), "Activate Sparkle Pen");
    }
}
