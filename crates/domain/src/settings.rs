use crate::event::EventCategory;
use crate::message::ChangeKind;
use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How far back the very first cycle reaches when no scan log exists yet,
/// so events scheduled before installation still get their reminders.
pub const DEFAULT_FIRST_CYCLE_CUTOFF_DAYS: i64 = 5;

pub const DEFAULT_SUBJECT_PREFIX: &str = "Reminder";

/// Lead-time tiers enabled for one event category. The three fixed tiers
/// fire 7, 3 and 1 days ahead of the event; a custom tier fires
/// `custom_secs` ahead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadTimeSettings {
    pub days7: bool,
    pub days3: bool,
    pub days1: bool,
    pub custom_secs: Option<i64>,
}

impl LeadTimeSettings {
    pub fn fixed_enabled(&self, days: u32) -> bool {
        match days {
            7 => self.days7,
            3 => self.days3,
            1 => self.days1,
            _ => false,
        }
    }

    /// A custom lead only counts when it is positive and does not shadow a
    /// fixed tier.
    pub fn effective_custom_secs(&self) -> Option<i64> {
        self.custom_secs
            .filter(|s| *s > 0 && !crate::scan::is_fixed_lead_offset(*s))
    }
}

impl Default for LeadTimeSettings {
    fn default() -> Self {
        Self {
            days7: true,
            days3: true,
            days1: true,
            custom_secs: None,
        }
    }
}

/// Global visibility filter applied when selecting candidate events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFilterMode {
    All,
    OnlyVisible,
}

/// Restricts which activity events get reminders at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityScope {
    Both,
    OnlyOpenings,
    OnlyClosings,
}

/// Identity reminder messages are sent as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SenderIdentity {
    NoReply,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverdueSettings {
    pub enabled: bool,
    /// Drop users who already completed the activity from the overdue
    /// audience.
    pub exclude_completed: bool,
}

impl Default for OverdueSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            exclude_completed: true,
        }
    }
}

/// Gates for the immediate notices sent when a calendar event is created,
/// updated or removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeEventSettings {
    pub when_added: bool,
    pub when_updated: bool,
    pub when_removed: bool,
    /// Event categories for which change notices are enabled.
    pub categories: Vec<EventCategory>,
}

impl ChangeEventSettings {
    pub fn allows(&self, change: ChangeKind) -> bool {
        match change {
            ChangeKind::Added => self.when_added,
            ChangeKind::Updated => self.when_updated,
            ChangeKind::Removed => self.when_removed,
            // Overdue notices are gated by `OverdueSettings`, not here.
            ChangeKind::Overdue => true,
        }
    }

    pub fn category_enabled(&self, category: EventCategory) -> bool {
        self.categories.contains(&category)
    }
}

/// The full reminder configuration, loaded once per cycle from the settings
/// store and passed immutably through every stage of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub enabled: bool,
    pub first_cycle_cutoff_days: i64,
    /// Per-category lead tiers. Activity categories without an entry fall
    /// back to the `Due` entry when the event carries a module name.
    pub leads: HashMap<EventCategory, LeadTimeSettings>,
    pub filter_mode: EventFilterMode,
    pub activity_scope: ActivityScope,
    pub course_role_ids: Vec<ID>,
    pub activity_role_ids: Vec<ID>,
    pub sender: SenderIdentity,
    /// Display-name override for the sending identity.
    pub send_as_name: Option<String>,
    pub subject_prefix: String,
    /// Category events skip descendant courses whose end date has passed.
    pub category_skip_ended_courses: bool,
    pub overdue: OverdueSettings,
    pub change_events: ChangeEventSettings,
}

impl ReminderConfig {
    pub fn lead_settings(&self, category: EventCategory) -> Option<&LeadTimeSettings> {
        self.leads.get(&category)
    }

    /// Lead settings for an event, falling back to the activity ("due")
    /// configuration for module-bound events of categories that have none of
    /// their own.
    pub fn lead_settings_for_event(
        &self,
        category: EventCategory,
        has_module: bool,
    ) -> Option<&LeadTimeSettings> {
        self.leads.get(&category).or_else(|| {
            if has_module {
                self.leads.get(&EventCategory::Due)
            } else {
                None
            }
        })
    }

    /// Distinct custom lead offsets configured across all categories, used
    /// by the event selector to widen its single query.
    pub fn custom_lead_offsets(&self) -> Vec<i64> {
        let mut offsets: Vec<i64> = Vec::new();
        for settings in self.leads.values() {
            if let Some(secs) = settings.effective_custom_secs() {
                if !offsets.contains(&secs) {
                    offsets.push(secs);
                }
            }
        }
        offsets
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        let mut leads = HashMap::new();
        for category in [
            EventCategory::Site,
            EventCategory::User,
            EventCategory::Course,
            EventCategory::Due,
            EventCategory::Group,
            EventCategory::Category,
        ] {
            leads.insert(category, LeadTimeSettings::default());
        }
        Self {
            enabled: true,
            first_cycle_cutoff_days: DEFAULT_FIRST_CYCLE_CUTOFF_DAYS,
            leads,
            filter_mode: EventFilterMode::All,
            activity_scope: ActivityScope::Both,
            course_role_ids: Vec::new(),
            activity_role_ids: Vec::new(),
            sender: SenderIdentity::NoReply,
            send_as_name: None,
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            category_skip_ended_courses: true,
            overdue: OverdueSettings::default(),
            change_events: ChangeEventSettings::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scan::DAY_SECS;

    #[test]
    fn custom_lead_shadowing_fixed_tier_is_ignored() {
        let settings = LeadTimeSettings {
            custom_secs: Some(3 * DAY_SECS),
            ..Default::default()
        };
        assert_eq!(settings.effective_custom_secs(), None);

        let settings = LeadTimeSettings {
            custom_secs: Some(12 * 3600),
            ..Default::default()
        };
        assert_eq!(settings.effective_custom_secs(), Some(12 * 3600));

        let settings = LeadTimeSettings {
            custom_secs: Some(-60),
            ..Default::default()
        };
        assert_eq!(settings.effective_custom_secs(), None);
    }

    #[test]
    fn module_events_fall_back_to_activity_leads() {
        let config = ReminderConfig::default();
        assert!(config
            .lead_settings_for_event(EventCategory::Open, true)
            .is_some());
        assert!(config
            .lead_settings_for_event(EventCategory::Open, false)
            .is_none());
        assert!(config
            .lead_settings_for_event(EventCategory::Course, false)
            .is_some());
    }

    #[test]
    fn custom_offsets_are_deduplicated() {
        let mut config = ReminderConfig::default();
        config.leads.get_mut(&EventCategory::Course).unwrap().custom_secs = Some(7200);
        config.leads.get_mut(&EventCategory::Group).unwrap().custom_secs = Some(7200);
        config.leads.get_mut(&EventCategory::User).unwrap().custom_secs = Some(600);

        let mut offsets = config.custom_lead_offsets();
        offsets.sort();
        assert_eq!(offsets, vec![600, 7200]);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ReminderConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ReminderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.enabled, config.enabled);
        assert_eq!(parsed.leads.len(), config.leads.len());
        assert_eq!(parsed.subject_prefix, config.subject_prefix);
    }
}
