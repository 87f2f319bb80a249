use super::IDirectoryRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::query_structs::RoleScope;
use coursebell_domain::{User, ID};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Clone)]
struct RoleAssignment {
    user_id: ID,
    role_id: ID,
    course_id: ID,
}

#[derive(Clone)]
struct Enrolment {
    user_id: ID,
    course_id: ID,
    active: bool,
}

#[derive(Clone)]
struct GroupMembership {
    group_id: ID,
    user_id: ID,
}

pub struct InMemoryDirectoryRepo {
    users: Mutex<Vec<User>>,
    role_assignments: Mutex<Vec<RoleAssignment>>,
    enrolments: Mutex<Vec<Enrolment>>,
    group_members: Mutex<Vec<GroupMembership>>,
    module_restrictions: Mutex<HashMap<ID, HashSet<ID>>>,
    module_completions: Mutex<HashMap<ID, HashSet<ID>>>,
    module_graders: Mutex<HashMap<ID, HashSet<ID>>>,
}

impl InMemoryDirectoryRepo {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            role_assignments: Mutex::new(Vec::new()),
            enrolments: Mutex::new(Vec::new()),
            group_members: Mutex::new(Vec::new()),
            module_restrictions: Mutex::new(HashMap::new()),
            module_completions: Mutex::new(HashMap::new()),
            module_graders: Mutex::new(HashMap::new()),
        }
    }

    fn users_by_ids(&self, ids: &[ID]) -> Vec<User> {
        find_by(&self.users, |user: &User| ids.contains(&user.id))
    }
}

impl Default for InMemoryDirectoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IDirectoryRepo for InMemoryDirectoryRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        upsert(user, &self.users);
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        find(user_id, &self.users)
    }

    async fn find_confirmed_users(&self) -> anyhow::Result<Vec<User>> {
        Ok(find_by(&self.users, |user: &User| {
            user.is_active_recipient()
        }))
    }

    async fn find_role_users(
        &self,
        role_ids: &[ID],
        scope: &RoleScope,
        active_only: bool,
    ) -> anyhow::Result<Vec<User>> {
        let course_id = scope.course_id();
        let assigned: Vec<ID> = {
            let assignments = self.role_assignments.lock().unwrap();
            assignments
                .iter()
                .filter(|ra| ra.course_id == *course_id && role_ids.contains(&ra.role_id))
                .map(|ra| ra.user_id.clone())
                .collect()
        };

        let enrolled: HashSet<ID> = {
            let enrolments = self.enrolments.lock().unwrap();
            enrolments
                .iter()
                .filter(|en| en.course_id == *course_id && (!active_only || en.active))
                .map(|en| en.user_id.clone())
                .collect()
        };

        let mut seen = HashSet::new();
        let mut users = Vec::new();
        for user in self.users_by_ids(&assigned) {
            if enrolled.contains(&user.id) && seen.insert(user.id.clone()) {
                users.push(user);
            }
        }
        Ok(users)
    }

    async fn find_group_members(&self, group_id: &ID) -> anyhow::Result<Vec<User>> {
        let member_ids: Vec<ID> = {
            let members = self.group_members.lock().unwrap();
            let mut seen = HashSet::new();
            members
                .iter()
                .filter(|gm| gm.group_id == *group_id)
                .filter(|gm| seen.insert(gm.user_id.clone()))
                .map(|gm| gm.user_id.clone())
                .collect()
        };
        Ok(self.users_by_ids(&member_ids))
    }

    async fn filter_by_availability(
        &self,
        users: Vec<User>,
        module_id: &ID,
    ) -> anyhow::Result<Vec<User>> {
        let restrictions = self.module_restrictions.lock().unwrap();
        Ok(match restrictions.get(module_id) {
            Some(allowed) => users
                .into_iter()
                .filter(|user| allowed.contains(&user.id))
                .collect(),
            None => users,
        })
    }

    async fn filter_graders(&self, users: Vec<User>, module_id: &ID) -> anyhow::Result<Vec<User>> {
        let graders = self.module_graders.lock().unwrap();
        Ok(match graders.get(module_id) {
            Some(allowed) => users
                .into_iter()
                .filter(|user| allowed.contains(&user.id))
                .collect(),
            None => Vec::new(),
        })
    }

    async fn find_completed_user_ids(&self, module_id: &ID) -> anyhow::Result<Vec<ID>> {
        let completions = self.module_completions.lock().unwrap();
        Ok(completions
            .get(module_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn assign_role(&self, user_id: &ID, role_id: &ID, course_id: &ID) -> anyhow::Result<()> {
        insert(
            &RoleAssignment {
                user_id: user_id.clone(),
                role_id: role_id.clone(),
                course_id: course_id.clone(),
            },
            &self.role_assignments,
        );
        Ok(())
    }

    async fn set_enrolment(
        &self,
        user_id: &ID,
        course_id: &ID,
        active: bool,
    ) -> anyhow::Result<()> {
        let mut enrolments = self.enrolments.lock().unwrap();
        for en in enrolments.iter_mut() {
            if en.user_id == *user_id && en.course_id == *course_id {
                en.active = active;
                return Ok(());
            }
        }
        enrolments.push(Enrolment {
            user_id: user_id.clone(),
            course_id: course_id.clone(),
            active,
        });
        Ok(())
    }

    async fn add_group_member(
        &self,
        group_id: &ID,
        user_id: &ID,
        _role_id: &ID,
    ) -> anyhow::Result<()> {
        insert(
            &GroupMembership {
                group_id: group_id.clone(),
                user_id: user_id.clone(),
            },
            &self.group_members,
        );
        Ok(())
    }

    async fn restrict_module_access(&self, module_id: &ID, user_ids: &[ID]) -> anyhow::Result<()> {
        let mut restrictions = self.module_restrictions.lock().unwrap();
        restrictions.insert(module_id.clone(), user_ids.iter().cloned().collect());
        Ok(())
    }

    async fn mark_completed(&self, module_id: &ID, user_id: &ID) -> anyhow::Result<()> {
        let mut completions = self.module_completions.lock().unwrap();
        completions
            .entry(module_id.clone())
            .or_default()
            .insert(user_id.clone());
        Ok(())
    }

    async fn grant_grading(&self, module_id: &ID, user_id: &ID) -> anyhow::Result<()> {
        let mut graders = self.module_graders.lock().unwrap();
        graders
            .entry(module_id.clone())
            .or_default()
            .insert(user_id.clone());
        Ok(())
    }
}
