mod course;
mod event;
mod message;
mod scan;
mod settings;
mod shared;
mod user;

pub use course::{Course, CourseCategory, CourseGroup, CourseModule};
pub use event::{CalendarEvent, EventCategory};
pub use message::{ChangeKind, RenderedMessage};
pub use scan::{
    is_fixed_lead_offset, CourseOverride, OverdueSendMarker, ScanLogRecord, ScanOutcome,
    ScanWindow, DAY_SECS, FIXED_LEAD_OFFSETS,
};
pub use settings::{
    ActivityScope, ChangeEventSettings, EventFilterMode, LeadTimeSettings, OverdueSettings,
    ReminderConfig, SenderIdentity, DEFAULT_FIRST_CYCLE_CUTOFF_DAYS, DEFAULT_SUBJECT_PREFIX,
};
pub use shared::entity::{Entity, ID};
pub use user::User;
