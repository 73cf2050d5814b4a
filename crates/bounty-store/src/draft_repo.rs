//! Submission draft autosave.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};
use validator::Validate;

use bounty_models::{SubmissionDraft, SubmissionForm};

use crate::error::StoreResult;
use crate::storage::KeyValueStorage;

const KEY_PREFIX: &str = "submission-draft";

/// Repository persisting one draft per user and bounty.
#[derive(Clone)]
pub struct DraftRepository {
    storage: Arc<dyn KeyValueStorage>,
    /// Serializes read-modify-write cycles on the storage.
    write_lock: Arc<Mutex<()>>,
}

impl DraftRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    // Key parts are percent-encoded so neither can contain the ':' separator.
    fn user_prefix(user_id: &str) -> String {
        format!("{}:{}:", KEY_PREFIX, urlencoding::encode(user_id))
    }

    fn key(user_id: &str, bounty_id: &str) -> String {
        format!("{}{}", Self::user_prefix(user_id), urlencoding::encode(bounty_id))
    }

    fn read(&self, key: &str) -> StoreResult<Option<SubmissionDraft>> {
        match self.storage.get_item(key) {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Create or update the draft, keeping its id and creation time.
    pub fn save(
        &self,
        user_id: &str,
        bounty_id: &str,
        form: SubmissionForm,
    ) -> StoreResult<SubmissionDraft> {
        form.validate()?;

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let draft = match self.load(user_id, bounty_id)? {
            Some(existing) => existing.update(form),
            None => SubmissionDraft::new(bounty_id, user_id, form),
        };

        let json = serde_json::to_string(&draft)?;
        self.storage.set_item(&Self::key(user_id, bounty_id), json);

        debug!(draft_id = %draft.id, bounty_id = %bounty_id, "Saved submission draft");
        Ok(draft)
    }

    /// Load the caller's draft. Entries owned by someone else are ignored.
    pub fn load(&self, user_id: &str, bounty_id: &str) -> StoreResult<Option<SubmissionDraft>> {
        let draft = self.read(&Self::key(user_id, bounty_id))?;
        Ok(draft.filter(|d| d.user_id == user_id && d.bounty_id == bounty_id))
    }

    /// Returns `true` if a draft existed.
    pub fn delete(&self, user_id: &str, bounty_id: &str) -> bool {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let key = Self::key(user_id, bounty_id);
        let existed = self.storage.get_item(&key).is_some();
        if existed {
            self.storage.remove_item(&key);
            info!(bounty_id = %bounty_id, "Discarded submission draft");
        }
        existed
    }

    /// All drafts of a user, most recently updated first.
    pub fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<SubmissionDraft>> {
        let mut drafts = self
            .storage
            .keys_with_prefix(&Self::user_prefix(user_id))
            .into_iter()
            .filter_map(|key| self.read(&key).transpose())
            .collect::<StoreResult<Vec<_>>>()?;
        drafts.retain(|d| d.user_id == user_id);

        drafts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::storage::MemoryStorage;

    fn repo() -> (DraftRepository, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (DraftRepository::new(storage.clone()), storage)
    }

    fn form(title: &str) -> SubmissionForm {
        SubmissionForm {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_save_then_load() {
        let (repo, _) = repo();
        let saved = repo.save("u1", "b1", form("first pass")).unwrap();

        let loaded = repo.load("u1", "b1").unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert!(repo.load("u1", "b2").unwrap().is_none());
        assert!(repo.load("u2", "b1").unwrap().is_none());
    }

    #[test]
    fn test_resave_preserves_identity() {
        let (repo, _) = repo();
        let first = repo.save("u1", "b1", form("first pass")).unwrap();
        let second = repo.save("u1", "b1", form("second pass")).unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.form.title, "second pass");
    }

    #[test]
    fn test_invalid_form_is_not_saved() {
        let (repo, storage) = repo();
        let err = repo.save("u1", "b1", form("")).unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_delete() {
        let (repo, _) = repo();
        repo.save("u1", "b1", form("draft")).unwrap();

        assert!(repo.delete("u1", "b1"));
        assert!(!repo.delete("u1", "b1"));
        assert!(repo.load("u1", "b1").unwrap().is_none());
    }

    #[test]
    fn test_list_for_user_only_returns_own_drafts() {
        let (repo, _) = repo();
        repo.save("u1", "b1", form("one")).unwrap();
        repo.save("u1", "b2", form("two")).unwrap();
        repo.save("u10", "b3", form("someone else")).unwrap();

        let drafts = repo.list_for_user("u1").unwrap();
        assert_eq!(drafts.len(), 2);
        assert!(drafts.iter().all(|d| d.user_id == "u1"));
        assert!(drafts[0].updated_at >= drafts[1].updated_at);
    }

    #[test]
    fn test_colon_ids_do_not_collide() {
        let (repo, _) = repo();
        repo.save("a", "b:c", form("alice secret")).unwrap();

        assert!(repo.load("a:b", "c").unwrap().is_none());
        let mallory = repo.save("a:b", "c", form("mallory")).unwrap();
        assert_eq!(mallory.user_id, "a:b");

        let alice = repo.load("a", "b:c").unwrap().unwrap();
        assert_eq!(alice.form.title, "alice secret");
        assert_eq!(alice.bounty_id, "b:c");
    }

    #[test]
    fn test_list_for_user_excludes_prefixed_user_ids() {
        let (repo, _) = repo();
        repo.save("u1:x", "b9", form("other user")).unwrap();
        assert!(repo.list_for_user("u1").unwrap().is_empty());

        repo.save("u1", "b1", form("mine")).unwrap();
        let drafts = repo.list_for_user("u1").unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].user_id, "u1");
    }

    #[test]
    fn test_entry_owned_by_another_user_is_ignored() {
        let (repo, storage) = repo();
        let foreign = repo.save("u2", "b1", form("not yours")).unwrap();
        storage.set_item(
            "submission-draft:u1:b1",
            serde_json::to_string(&foreign).unwrap(),
        );

        assert!(repo.load("u1", "b1").unwrap().is_none());
        assert!(repo.list_for_user("u1").unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_first_saves_share_one_draft() {
        let (repo, _) = repo();

        let ids: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|n| {
                    let repo = repo.clone();
                    scope.spawn(move || repo.save("u1", "b1", form(&format!("pass {}", n))).unwrap().id)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let stored = repo.load("u1", "b1").unwrap().unwrap();
        assert!(ids.iter().all(|id| *id == stored.id));
    }

    #[test]
    fn test_corrupt_entry_reports_serialization_error() {
        let (repo, storage) = repo();
        storage.set_item("submission-draft:u1:b1", "{not json".to_string());

        assert!(matches!(repo.load("u1", "b1"), Err(StoreError::Serialization(_))));
    }
}
