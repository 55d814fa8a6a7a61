//! Admission controls (§4.6): user-activity pause and the in-flight cap.

use chrono::{DateTime, Utc};
use doc_enrich_core::AutoProcessingConfig;

/// True if the tick should be skipped because a manual (UI-initiated)
/// pipeline run was active too recently.
pub fn should_pause_for_user_activity(
    cfg: &AutoProcessingConfig,
    last_manual_activity_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    if !cfg.pause_on_user_activity {
        return false;
    }
    match last_manual_activity_at {
        Some(at) => {
            let elapsed = now.signed_duration_since(at);
            elapsed >= chrono::Duration::zero() && elapsed < chrono::Duration::from_std(cfg.user_activity_window).unwrap_or_default()
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cfg(pause: bool) -> AutoProcessingConfig {
        AutoProcessingConfig {
            enabled: true,
            interval_minutes: 5,
            pause_on_user_activity: pause,
            user_activity_window: Duration::from_secs(30),
        }
    }

    #[test]
    fn pauses_when_manual_activity_within_window() {
        let now = Utc::now();
        let recent = now - chrono::Duration::seconds(10);
        assert!(should_pause_for_user_activity(&cfg(true), Some(recent), now));
    }

    #[test]
    fn does_not_pause_once_outside_the_window() {
        let now = Utc::now();
        let stale = now - chrono::Duration::seconds(60);
        assert!(!should_pause_for_user_activity(&cfg(true), Some(stale), now));
    }

    #[test]
    fn never_pauses_when_feature_disabled() {
        let now = Utc::now();
        assert!(!should_pause_for_user_activity(&cfg(false), Some(now), now));
    }

    #[test]
    fn never_pauses_without_any_recorded_activity() {
        let now = Utc::now();
        assert!(!should_pause_for_user_activity(&cfg(true), None, now));
    }
}
