use coursebell_domain::{CalendarEvent, ReminderConfig, ScanWindow, DAY_SECS};

/// The lead tier a reminder fires at: one of the fixed day counts, or a
/// category's custom seconds-ahead schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeadTier {
    Days(u32),
    Custom { seconds: i64 },
}

impl LeadTier {
    pub fn seconds(&self) -> i64 {
        match self {
            LeadTier::Days(days) => *days as i64 * DAY_SECS,
            LeadTier::Custom { seconds } => *seconds,
        }
    }

    /// Days ahead as shown in message bodies; fractional for custom tiers.
    pub fn days_label(&self) -> String {
        match self {
            LeadTier::Days(days) => days.to_string(),
            LeadTier::Custom { seconds } => {
                let days = *seconds as f64 / DAY_SECS as f64;
                if (days - days.round()).abs() < 1e-9 {
                    format!("{}", days.round() as i64)
                } else {
                    format!("{:.1}", days)
                }
            }
        }
    }
}

/// Assigns the lead tier firing for this event inside the window, or `None`
/// when the event should be skipped this cycle.
///
/// Fixed tiers are checked in priority order 1 > 3 > 7 days, then the
/// category's custom schedule. At most one tier ever fires: the first
/// containment match decides, and a match whose tier is disabled in the
/// configuration skips the event rather than falling through to a lower
/// tier.
pub fn resolve_tier(
    event: &CalendarEvent,
    window: &ScanWindow,
    config: &ReminderConfig,
) -> Option<LeadTier> {
    // The event has effectively elapsed relative to this cycle's "now".
    if event.start_ts - window.end < 0 {
        return None;
    }

    for days in [1u32, 3, 7] {
        if window.contains(event.start_ts - days as i64 * DAY_SECS) {
            let leads = config.lead_settings_for_event(event.category, event.has_module())?;
            if !leads.fixed_enabled(days) {
                return None;
            }
            return Some(LeadTier::Days(days));
        }
    }

    let custom_secs = config
        .lead_settings(event.category)
        .and_then(|leads| leads.effective_custom_secs())?;
    if window.contains(event.start_ts - custom_secs) {
        return Some(LeadTier::Custom {
            seconds: custom_secs,
        });
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use coursebell_domain::EventCategory;

    fn event(category: EventCategory, start_ts: i64) -> CalendarEvent {
        CalendarEvent {
            id: Default::default(),
            category,
            name: "Deadline".into(),
            description: String::new(),
            location: None,
            start_ts,
            duration: 0,
            visible: true,
            module_name: None,
            instance_id: None,
            course_id: None,
            user_id: None,
            group_id: None,
            category_id: None,
        }
    }

    fn module_event(category: EventCategory, start_ts: i64) -> CalendarEvent {
        CalendarEvent {
            module_name: Some("assign".into()),
            ..event(category, start_ts)
        }
    }

    #[test]
    fn one_day_tier_beats_three_day_tier() {
        // Both the 1-day and the 3-day offset land inside the window.
        let window = ScanWindow { start: 0, end: 2 * DAY_SECS };
        let event = event(EventCategory::Course, 3 * DAY_SECS);

        let tier = resolve_tier(&event, &window, &ReminderConfig::default());
        assert_eq!(tier, Some(LeadTier::Days(1)));
    }

    #[test]
    fn fixed_tier_beats_custom_schedule() {
        let window = ScanWindow {
            start: DAY_SECS - 3600,
            end: 2 * DAY_SECS + 3600,
        };
        let mut config = ReminderConfig::default();
        config
            .leads
            .get_mut(&EventCategory::Course)
            .unwrap()
            .custom_secs = Some(2 * DAY_SECS);

        // start - 1d and start - custom(2d) both land inside the window.
        let event = event(EventCategory::Course, 3 * DAY_SECS);
        let tier = resolve_tier(&event, &window, &config);
        assert_eq!(tier, Some(LeadTier::Days(1)));
    }

    #[test]
    fn custom_schedule_equal_to_fixed_tier_never_double_fires() {
        let window = ScanWindow { start: 0, end: DAY_SECS / 2 };
        let mut config = ReminderConfig::default();
        config
            .leads
            .get_mut(&EventCategory::Course)
            .unwrap()
            .custom_secs = Some(3 * DAY_SECS);

        let event = event(EventCategory::Course, 3 * DAY_SECS);
        // Only the fixed 3-day tier fires; the shadowing custom value is
        // discarded entirely.
        assert_eq!(resolve_tier(&event, &window, &config), Some(LeadTier::Days(3)));
    }

    #[test]
    fn disabled_tier_skips_instead_of_falling_through() {
        let window = ScanWindow { start: 0, end: 2 * DAY_SECS };
        let mut config = ReminderConfig::default();
        config.leads.get_mut(&EventCategory::Course).unwrap().days1 = false;

        // The 1-day tier matches first but is disabled; the matching 3-day
        // tier must not fire in its place.
        let event = event(EventCategory::Course, 3 * DAY_SECS);
        assert_eq!(resolve_tier(&event, &window, &config), None);
    }

    #[test]
    fn custom_schedule_fires_when_no_fixed_tier_matches() {
        let window = ScanWindow { start: 0, end: 3600 };
        let mut config = ReminderConfig::default();
        config
            .leads
            .get_mut(&EventCategory::User)
            .unwrap()
            .custom_secs = Some(12 * 3600);

        let event = event(EventCategory::User, 12 * 3600 + 1800);
        let tier = resolve_tier(&event, &window, &config);
        assert_eq!(tier, Some(LeadTier::Custom { seconds: 12 * 3600 }));
        assert_eq!(tier.unwrap().days_label(), "0.5");
    }

    #[test]
    fn elapsed_events_are_skipped() {
        let window = ScanWindow { start: 0, end: 2 * DAY_SECS };
        let event = event(EventCategory::Course, DAY_SECS);
        assert_eq!(resolve_tier(&event, &window, &ReminderConfig::default()), None);
    }

    #[test]
    fn module_events_without_own_config_use_activity_settings() {
        let window = ScanWindow { start: 0, end: DAY_SECS };
        // "open" has no lead settings of its own in the defaults.
        let with_module = module_event(EventCategory::Open, 2 * DAY_SECS);
        let without_module = event(EventCategory::Open, 2 * DAY_SECS);

        let config = ReminderConfig::default();
        assert_eq!(
            resolve_tier(&with_module, &window, &config),
            Some(LeadTier::Days(1))
        );
        assert_eq!(resolve_tier(&without_module, &window, &config), None);
    }

    #[test]
    fn unconfigured_category_is_skipped() {
        let window = ScanWindow { start: 0, end: DAY_SECS };
        let mut config = ReminderConfig::default();
        config.leads.remove(&EventCategory::Group);

        let event = event(EventCategory::Group, 2 * DAY_SECS);
        assert_eq!(resolve_tier(&event, &window, &config), None);
    }
}
