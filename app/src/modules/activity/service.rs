use serde::Deserialize;
use signup_core::config::{self, ConfigError, ESource};
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum ServiceError {
    #[error("no activity found")]
    NotFound,
    #[error("already signed up")]
    Conflict,
    #[error("activity is full")]
    Full,
}

/// Signup rules that are off unless configured.
///
/// Capacity is informational by default: a signup past `max_participants`
/// still succeeds. `enforce_capacity` turns that into [`ServiceError::Full`].
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SignupPolicy {
    #[serde(default)]
    pub enforce_capacity: bool,
}

impl SignupPolicy {
    pub(crate) fn read(source: &ESource) -> Result<Self, ConfigError> {
        Ok(config::read_struct(source, &config::path(&["activities"]))?.unwrap_or_default())
    }
}

/// Single place where a signup email is checked. Every string is accepted,
/// the empty one included.
fn validate_email(_email: &str) -> Result<(), ServiceError> {
    Ok(())
}

pub(crate) struct ActivityRegistry {
    activities: RwLock<BTreeMap<String, Activity>>,
    policy: SignupPolicy,
}

impl ActivityRegistry {
    pub(crate) fn new(
        activities: impl IntoIterator<Item = (String, Activity)>,
        policy: SignupPolicy,
    ) -> Self {
        Self {
            activities: RwLock::new(activities.into_iter().collect()),
            policy,
        }
    }

    pub(crate) async fn list(&self) -> BTreeMap<String, Activity> {
        self.activities.read().await.clone()
    }

    /// Appends `email` to the roster of `activity_name`, matched exactly.
    /// The lookup, the duplicate check and the append share one write lock.
    pub(crate) async fn sign_up(
        &self,
        activity_name: &str,
        email: String,
    ) -> Result<String, ServiceError> {
        validate_email(&email)?;
        let mut activities = self.activities.write().await;
        let activity = activities
            .get_mut(activity_name)
            .ok_or(ServiceError::NotFound)?;
        if activity.participants.contains(&email) {
            return Err(ServiceError::Conflict);
        }
        if self.policy.enforce_capacity
            && activity.participants.len() >= activity.max_participants as usize
        {
            return Err(ServiceError::Full);
        }
        let message = format!("Signed up {email} for {activity_name}");
        activity.participants.push(email);
        log::debug!("Activity Service: {message}");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::activity::seed;
    use std::sync::Arc;

    fn seeded() -> ActivityRegistry {
        ActivityRegistry::new(seed::activities(), SignupPolicy::default())
    }

    fn empty_activity(max_participants: u32) -> Activity {
        Activity {
            description: "Test".to_string(),
            schedule: "Never".to_string(),
            max_participants,
            participants: vec![],
        }
    }

    #[tokio::test]
    async fn list_returns_every_seeded_activity() {
        let registry = seeded();
        let activities = registry.list().await;

        assert_eq!(activities.len(), 9);
        let names: Vec<_> = seed::activities().into_iter().map(|(name, _)| name).collect();
        for name in names {
            assert!(activities.contains_key(&name), "missing {name}");
        }
        for activity in activities.values() {
            assert!(activity.max_participants > 0);
            assert!(activity.participants.len() <= activity.max_participants as usize);
        }
    }

    #[tokio::test]
    async fn second_signup_with_same_email_conflicts() {
        let registry = seeded();

        assert!(registry.sign_up("Soccer", "a@x.com".to_string()).await.is_ok());
        assert_eq!(
            registry.sign_up("Soccer", "a@x.com".to_string()).await,
            Err(ServiceError::Conflict)
        );

        let activities = registry.list().await;
        assert_eq!(activities["Soccer"].participants, vec!["a@x.com".to_string()]);
    }

    #[tokio::test]
    async fn unknown_activity_leaves_state_unchanged() {
        let registry = seeded();
        let before = registry.list().await;

        assert_eq!(
            registry
                .sign_up("Nonexistent Activity", "a@x.com".to_string())
                .await,
            Err(ServiceError::NotFound)
        );
        assert_eq!(registry.list().await, before);
    }

    #[tokio::test]
    async fn activity_names_are_case_sensitive() {
        let registry = seeded();

        assert_eq!(
            registry.sign_up("basketball", "a@x.com".to_string()).await,
            Err(ServiceError::NotFound)
        );
        assert_eq!(
            registry.sign_up(" Basketball", "a@x.com".to_string()).await,
            Err(ServiceError::NotFound)
        );
    }

    #[tokio::test]
    async fn signups_keep_insertion_order() {
        let registry = ActivityRegistry::new(
            [("Empty".to_string(), empty_activity(5))],
            SignupPolicy::default(),
        );

        registry.sign_up("Empty", "a@x.com".to_string()).await.unwrap();
        registry.sign_up("Empty", "b@x.com".to_string()).await.unwrap();

        assert_eq!(
            registry.list().await["Empty"].participants,
            vec!["a@x.com".to_string(), "b@x.com".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_email_is_accepted() {
        let registry = seeded();

        assert_eq!(
            registry.sign_up("Basketball", String::new()).await,
            Ok("Signed up  for Basketball".to_string())
        );
    }

    // Capacity is not enforced by default. This reproduces the behavior of
    // the service as deployed, which is a known defect.
    #[tokio::test]
    async fn capacity_is_not_enforced_by_default() {
        let registry = ActivityRegistry::new(
            [("Tiny".to_string(), empty_activity(2))],
            SignupPolicy::default(),
        );

        for i in 0..5 {
            assert!(registry.sign_up("Tiny", format!("s{i}@x.com")).await.is_ok());
        }
        assert_eq!(registry.list().await["Tiny"].participants.len(), 5);
    }

    #[tokio::test]
    async fn capacity_is_enforced_when_configured() {
        let registry = ActivityRegistry::new(
            [("Tiny".to_string(), empty_activity(2))],
            SignupPolicy {
                enforce_capacity: true,
            },
        );

        registry.sign_up("Tiny", "a@x.com".to_string()).await.unwrap();
        registry.sign_up("Tiny", "b@x.com".to_string()).await.unwrap();
        assert_eq!(
            registry.sign_up("Tiny", "a@x.com".to_string()).await,
            Err(ServiceError::Conflict)
        );
        assert_eq!(
            registry.sign_up("Tiny", "c@x.com".to_string()).await,
            Err(ServiceError::Full)
        );
        assert_eq!(registry.list().await["Tiny"].participants.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_signups_are_not_lost() {
        let registry = Arc::new(ActivityRegistry::new(
            [("Crowded".to_string(), empty_activity(10))],
            SignupPolicy::default(),
        ));

        let distinct: Vec<_> = (0..50)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.sign_up("Crowded", format!("s{i}@x.com")).await })
            })
            .collect();
        for handle in distinct {
            assert!(handle.await.unwrap().is_ok());
        }

        let same: Vec<_> = (0..20)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.sign_up("Crowded", "dup@x.com".to_string()).await })
            })
            .collect();
        let mut successes = 0;
        for handle in same {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        let activities = registry.list().await;
        let participants = &activities["Crowded"].participants;
        assert_eq!(participants.len(), 51);
        assert_eq!(participants.iter().filter(|p| *p == "dup@x.com").count(), 1);
    }

    #[test]
    fn policy_defaults_to_informational_capacity() {
        let source = config::load_source("definitely-not-here.toml").unwrap();
        assert_eq!(SignupPolicy::read(&source).unwrap(), SignupPolicy::default());
        assert!(!SignupPolicy::default().enforce_capacity);
    }
}
