use super::lead_time::LeadTier;
use super::render::{ReminderScope, ReminderTemplate};
use coursebell_domain::{
    ActivityScope, CalendarEvent, ChangeKind, Course, CourseOverride, EventCategory,
    EventFilterMode, ReminderConfig, User, ID,
};
use coursebell_infra::{ReminderContext, RoleScope};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Whether recipients are resolved for a pre-deadline reminder or for the
/// post-deadline overdue pass, which may narrow the audience further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    Scheduled,
    Overdue,
}

/// A reminder ready for dispatch: the shared message skeleton together with
/// its resolved audience. Owned by one scan iteration and dropped right
/// after dispatch.
#[derive(Debug)]
pub struct ReminderRef {
    pub template: ReminderTemplate,
    pub recipients: Vec<User>,
}

/// Resolves the audience and message scope for one event. `Ok(None)` means
/// the event is skipped (missing references, disabled by configuration);
/// errors from the directory or course services bubble up so the caller can
/// isolate the event and continue the cycle.
pub async fn resolve_event_reminder(
    event: &CalendarEvent,
    tier: LeadTier,
    change: Option<ChangeKind>,
    config: &ReminderConfig,
    ctx: &ReminderContext,
    mode: CallMode,
    now: i64,
) -> anyhow::Result<Option<ReminderRef>> {
    match event.category {
        EventCategory::Site => process_site_event(event, tier, change, ctx).await,
        EventCategory::User => process_user_event(event, tier, change, ctx).await,
        EventCategory::Course => process_course_event(event, tier, change, config, ctx).await,
        EventCategory::Open => {
            if config.activity_scope == ActivityScope::OnlyClosings {
                debug!("Reminders for activity openings are restricted in the configuration");
                return Ok(None);
            }
            process_activity_event(event, tier, change, config, ctx, mode).await
        }
        EventCategory::Close => {
            if config.activity_scope == ActivityScope::OnlyOpenings {
                debug!("Reminders for activity closings are restricted in the configuration");
                return Ok(None);
            }
            process_activity_event(event, tier, change, config, ctx, mode).await
        }
        EventCategory::Due | EventCategory::GradingDue => {
            process_activity_event(event, tier, change, config, ctx, mode).await
        }
        EventCategory::Group => process_group_event(event, tier, change, ctx).await,
        EventCategory::Category => {
            process_category_event(event, tier, change, config, ctx, now).await
        }
        EventCategory::Unknown => {
            process_unknown_event(event, tier, change, config, ctx).await
        }
    }
}

async fn override_for(ctx: &ReminderContext, course_id: &ID) -> CourseOverride {
    match ctx.repos.course_overrides.find(course_id).await {
        Some(value) => value,
        None => CourseOverride::permissive(course_id.clone()),
    }
}

fn hidden_and_filtered(course: &Course, config: &ReminderConfig) -> bool {
    !course.visible && config.filter_mode == EventFilterMode::OnlyVisible
}

fn dedup_by_id(users: Vec<User>) -> Vec<User> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    merge_unique(&mut unique, &mut seen, users);
    unique
}

/// Appends users not seen before, keyed by user id. All audience merging
/// goes through here, so overlapping resolution paths can never produce a
/// duplicate recipient.
fn merge_unique(into: &mut Vec<User>, seen: &mut HashSet<ID>, users: Vec<User>) {
    for user in users {
        if seen.insert(user.id.clone()) {
            into.push(user);
        }
    }
}

async fn process_site_event(
    event: &CalendarEvent,
    tier: LeadTier,
    change: Option<ChangeKind>,
    ctx: &ReminderContext,
) -> anyhow::Result<Option<ReminderRef>> {
    let recipients = dedup_by_id(ctx.repos.directory.find_confirmed_users().await?);
    Ok(Some(ReminderRef {
        template: ReminderTemplate {
            event: event.clone(),
            scope: ReminderScope::Site,
            tier,
            change,
        },
        recipients,
    }))
}

async fn process_user_event(
    event: &CalendarEvent,
    tier: LeadTier,
    change: Option<ChangeKind>,
    ctx: &ReminderContext,
) -> anyhow::Result<Option<ReminderRef>> {
    let Some(user_id) = &event.user_id else {
        debug!("User event {} does not reference a user", event.id);
        return Ok(None);
    };
    let Some(user) = ctx.repos.directory.find(user_id).await else {
        debug!("User {} for event {} was not found", user_id, event.id);
        return Ok(None);
    };
    Ok(Some(ReminderRef {
        template: ReminderTemplate {
            event: event.clone(),
            scope: ReminderScope::User(user.clone()),
            tier,
            change,
        },
        recipients: vec![user],
    }))
}

async fn process_course_event(
    event: &CalendarEvent,
    tier: LeadTier,
    change: Option<ChangeKind>,
    config: &ReminderConfig,
    ctx: &ReminderContext,
) -> anyhow::Result<Option<ReminderRef>> {
    let Some(course_id) = &event.course_id else {
        debug!("Course event {} does not reference a course", event.id);
        return Ok(None);
    };
    if !override_for(ctx, course_id).await.enable_course {
        debug!("Reminders for course events are restricted for course {}", course_id);
        return Ok(None);
    }
    let Some(course) = ctx.repos.courses.find(course_id).await else {
        debug!("Course {} for event {} was not found", course_id, event.id);
        return Ok(None);
    };
    if hidden_and_filtered(&course, config) {
        return Ok(None);
    }

    let users = ctx
        .repos
        .directory
        .find_role_users(
            &config.course_role_ids,
            &RoleScope::Course(course_id.clone()),
            false,
        )
        .await?;
    Ok(Some(ReminderRef {
        template: ReminderTemplate {
            event: event.clone(),
            scope: ReminderScope::Course(course),
            tier,
            change,
        },
        recipients: dedup_by_id(users),
    }))
}

async fn process_activity_event(
    event: &CalendarEvent,
    tier: LeadTier,
    change: Option<ChangeKind>,
    config: &ReminderConfig,
    ctx: &ReminderContext,
    mode: CallMode,
) -> anyhow::Result<Option<ReminderRef>> {
    let Some(module_name) = event.module_name.as_deref().filter(|m| !m.trim().is_empty()) else {
        return Ok(None);
    };
    let Some(instance_id) = &event.instance_id else {
        debug!("Activity event {} does not reference a module instance", event.id);
        return Ok(None);
    };

    if let Some(course_id) = &event.course_id {
        if !override_for(ctx, course_id).await.enable_activities {
            debug!("Reminders for activities are restricted for course {}", course_id);
            return Ok(None);
        }
    }

    let Some(module) = ctx
        .repos
        .courses
        .find_module(module_name, instance_id, event.course_id.as_ref())
        .await
    else {
        debug!("Module instance for event {} was not found", event.id);
        return Ok(None);
    };
    let Some(course) = ctx.repos.courses.find(&module.course_id).await else {
        debug!("Course {} for event {} was not found", module.course_id, event.id);
        return Ok(None);
    };
    if hidden_and_filtered(&course, config) {
        return Ok(None);
    }

    let users = match (&event.course_id, &event.user_id, &event.group_id) {
        (None, Some(user_id), _) => {
            // A user-overridden instance: exactly the one referenced
            // account, regardless of role configuration.
            debug!("Event {} is a user overridden {} event", event.id, module_name);
            ctx.repos.directory.find(user_id).await.into_iter().collect()
        }
        (None, None, Some(group_id)) => {
            // A group-overridden instance: everyone in that group.
            debug!("Event {} is a group overridden {} event", event.id, module_name);
            ctx.repos.directory.find_group_members(group_id).await?
        }
        _ => {
            let users = ctx
                .repos
                .directory
                .find_role_users(
                    &config.activity_role_ids,
                    &RoleScope::Module {
                        course_id: module.course_id.clone(),
                        module_id: module.id.clone(),
                    },
                    true,
                )
                .await?;
            ctx.repos
                .directory
                .filter_by_availability(users, &module.id)
                .await?
        }
    };
    let mut recipients = dedup_by_id(users);

    if event.category == EventCategory::GradingDue {
        recipients = ctx
            .repos
            .directory
            .filter_graders(recipients, &module.id)
            .await?;
    }
    if mode == CallMode::Overdue && config.overdue.exclude_completed {
        let completed: HashSet<ID> = ctx
            .repos
            .directory
            .find_completed_user_ids(&module.id)
            .await?
            .into_iter()
            .collect();
        recipients.retain(|user| !completed.contains(&user.id));
    }

    Ok(Some(ReminderRef {
        template: ReminderTemplate {
            event: event.clone(),
            scope: ReminderScope::Activity { course, module },
            tier,
            change,
        },
        recipients,
    }))
}

/// Events of an unrecognized category that still carry a module name are
/// treated as generic activity events. Unlike the regular activity path,
/// no availability filtering applies since the category semantics are
/// unknown.
async fn process_unknown_event(
    event: &CalendarEvent,
    tier: LeadTier,
    change: Option<ChangeKind>,
    config: &ReminderConfig,
    ctx: &ReminderContext,
) -> anyhow::Result<Option<ReminderRef>> {
    let Some(module_name) = event.module_name.as_deref().filter(|m| !m.trim().is_empty()) else {
        warn!("Unknown event category for event {}, skipping", event.id);
        return Ok(None);
    };
    let Some(instance_id) = &event.instance_id else {
        debug!("Event {} does not reference a module instance", event.id);
        return Ok(None);
    };
    let Some(module) = ctx
        .repos
        .courses
        .find_module(module_name, instance_id, event.course_id.as_ref())
        .await
    else {
        debug!("Module instance for event {} was not found", event.id);
        return Ok(None);
    };
    let Some(course) = ctx.repos.courses.find(&module.course_id).await else {
        debug!("Course {} for event {} was not found", module.course_id, event.id);
        return Ok(None);
    };

    let users = ctx
        .repos
        .directory
        .find_role_users(
            &config.activity_role_ids,
            &RoleScope::Module {
                course_id: module.course_id.clone(),
                module_id: module.id.clone(),
            },
            true,
        )
        .await?;

    Ok(Some(ReminderRef {
        template: ReminderTemplate {
            event: event.clone(),
            scope: ReminderScope::Activity { course, module },
            tier,
            change,
        },
        recipients: dedup_by_id(users),
    }))
}

async fn process_group_event(
    event: &CalendarEvent,
    tier: LeadTier,
    change: Option<ChangeKind>,
    ctx: &ReminderContext,
) -> anyhow::Result<Option<ReminderRef>> {
    let Some(group_id) = &event.group_id else {
        debug!("Group event {} does not reference a group", event.id);
        return Ok(None);
    };
    let Some(group) = ctx.repos.courses.find_group(group_id).await else {
        debug!("Group {} for event {} was not found", group_id, event.id);
        return Ok(None);
    };
    if !override_for(ctx, &group.course_id).await.enable_group {
        debug!("Reminders for group events are restricted for course {}", group.course_id);
        return Ok(None);
    }

    let course = ctx.repos.courses.find(&group.course_id).await;
    let module = match (&event.course_id, event.has_module(), &event.instance_id) {
        (Some(course_id), true, Some(instance_id)) => {
            let module_name = event.module_name.as_deref().unwrap_or_default();
            ctx.repos
                .courses
                .find_module(module_name, instance_id, Some(course_id))
                .await
        }
        _ => None,
    };

    let recipients = dedup_by_id(ctx.repos.directory.find_group_members(&group.id).await?);
    Ok(Some(ReminderRef {
        template: ReminderTemplate {
            event: event.clone(),
            scope: ReminderScope::Group {
                group,
                course,
                module,
            },
            tier,
            change,
        },
        recipients,
    }))
}

/// Category events fan out over every descendant course, reusing the course
/// audience rules per course and merging the results into one deduplicated
/// recipient set.
async fn process_category_event(
    event: &CalendarEvent,
    tier: LeadTier,
    change: Option<ChangeKind>,
    config: &ReminderConfig,
    ctx: &ReminderContext,
    now: i64,
) -> anyhow::Result<Option<ReminderRef>> {
    let Some(category_id) = &event.category_id else {
        debug!("Category event {} does not reference a category", event.id);
        return Ok(None);
    };
    let Some(category) = ctx.repos.courses.find_category(category_id).await else {
        debug!("Category {} for event {} was not found", category_id, event.id);
        return Ok(None);
    };

    let courses = ctx
        .repos
        .courses
        .find_descendant_courses(category_id, true)
        .await?;

    let mut seen = HashSet::new();
    let mut recipients = Vec::new();
    for course in courses {
        if config.category_skip_ended_courses && course.has_ended(now) {
            continue;
        }
        if !override_for(ctx, &course.id).await.enable_course {
            continue;
        }
        if hidden_and_filtered(&course, config) {
            continue;
        }
        let users = ctx
            .repos
            .directory
            .find_role_users(
                &config.course_role_ids,
                &RoleScope::Course(course.id.clone()),
                false,
            )
            .await?;
        merge_unique(&mut recipients, &mut seen, users);
    }

    Ok(Some(ReminderRef {
        template: ReminderTemplate {
            event: event.clone(),
            scope: ReminderScope::Category(category),
            tier,
            change,
        },
        recipients,
    }))
}
