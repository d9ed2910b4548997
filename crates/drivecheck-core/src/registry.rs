//! Isolated sessions for hosting the engine behind a shared service.
//!
//! Each session sits behind its own mutex, so operations on one session are
//! applied one at a time while different sessions never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::AssessmentError;
use crate::model::TestMode;
use crate::session::Session;

/// Owns every live session, keyed by a random id.
pub struct SessionRegistry {
    catalog: Arc<Catalog>,
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

// Session operations never leave a half-applied update behind, so a poisoned
// lock still guards a consistent value.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SessionRegistry {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start a new session in `G2`.
    pub fn create(&self) -> Uuid {
        self.create_with_mode(TestMode::G2)
    }

    pub fn create_with_mode(&self, mode: TestMode) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session::with_mode(Arc::clone(&self.catalog), mode);
        lock(&self.sessions).insert(id, Arc::new(Mutex::new(session)));
        tracing::debug!(%id, %mode, "created session");
        id
    }

    /// Run `f` against one session while holding that session's lock.
    ///
    /// The registry index is only locked for the lookup, not while `f` runs.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, AssessmentError> {
        let session = lock(&self.sessions)
            .get(&id)
            .cloned()
            .ok_or(AssessmentError::UnknownSession(id))?;
        let mut guard = lock(&session);
        Ok(f(&mut guard))
    }

    /// Drop a session. Returns `false` if it did not exist.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = lock(&self.sessions).remove(&id).is_some();
        if removed {
            tracing::debug!(%id, "removed session");
        }
        removed
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, Grade};
    use std::thread;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(Catalog::builtin()))
    }

    #[test]
    fn sessions_are_isolated() {
        let registry = registry();
        let a = registry.create();
        let b = registry.create();
        assert_ne!(a, b);

        registry
            .with_session(a, |s| s.set_grade("seatbelt_check", Answer::Yes))
            .unwrap()
            .unwrap();

        let grade_b = registry
            .with_session(b, |s| s.grade("seatbelt_check"))
            .unwrap();
        assert_eq!(grade_b, Grade::Unanswered);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unknown_session() {
        let registry = registry();
        let id = Uuid::new_v4();
        assert_eq!(
            registry.with_session(id, |s| s.active_mode()).unwrap_err(),
            AssessmentError::UnknownSession(id)
        );
    }

    #[test]
    fn create_in_mode_and_remove() {
        let registry = registry();
        let id = registry.create_with_mode(TestMode::G);
        assert_eq!(
            registry.with_session(id, |s| s.active_mode()).unwrap(),
            TestMode::G
        );
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn concurrent_updates_to_one_session_are_serialised() {
        let registry = Arc::new(registry());
        let id = registry.create();
        let ids: Vec<String> = registry
            .with_session(id, |s| s.definition().item_ids().map(String::from).collect())
            .unwrap();

        let handles: Vec<_> = ids
            .into_iter()
            .map(|item| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry
                        .with_session(id, |s| s.set_grade(&item, Answer::Yes))
                        .unwrap()
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let metrics = registry.with_session(id, |s| s.metrics()).unwrap();
        assert_eq!(metrics.yes, 16);
        assert!(metrics.can_submit);
    }
}
