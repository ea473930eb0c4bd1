// Scenario tests for the profile desk
//
// Tests cover:
// - Initial load and the no-profiles navigation hook
// - Validation gating before any network call
// - In-place updates and age rejection
// - Two-step deletion of the last profile
// - Results arriving after the user cancelled

use async_trait::async_trait;
use profile_desk::error::StoreError;
use profile_desk::models::{FieldValue, Profile, ProfileField};
use profile_desk::services::{
    DeleteOutcome, FieldChange, ListStatus, LoadOutcome, Navigator, ProfileDesk, SaveOutcome,
};
use profile_desk::storage::{InMemoryProfileStore, ProfileStore, StoreResult};
use profile_desk::validation::ValidationError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Default)]
struct CountingNavigator {
    calls: AtomicUsize,
}

impl CountingNavigator {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Navigator for CountingNavigator {
    fn show_create_surface(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Store that counts calls and can hold writes until released
struct GatedStore {
    inner: InMemoryProfileStore,
    gate: Option<Arc<Notify>>,
    fail_writes: bool,
    writes: AtomicUsize,
}

impl GatedStore {
    fn new(profiles: Vec<Profile>) -> Self {
        Self {
            inner: InMemoryProfileStore::with_profiles(profiles),
            gate: None,
            fail_writes: false,
            writes: AtomicUsize::new(0),
        }
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl ProfileStore for GatedStore {
    async fn list(&self) -> StoreResult<Vec<Profile>> {
        self.inner.list().await
    }

    async fn create(&self, profile: &Profile) -> StoreResult<Profile> {
        self.wait().await;
        if self.fail_writes {
            return Err(StoreError::Create {
                reason: "unavailable".into(),
            });
        }
        self.inner.create(profile).await
    }

    async fn update(&self, profile: &Profile) -> StoreResult<Profile> {
        self.wait().await;
        self.inner.update(profile).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.wait().await;
        self.inner.delete(id).await
    }

    fn backend_name(&self) -> &'static str {
        "gated"
    }
}

fn ann() -> Profile {
    Profile::new("1", "Ann", "a@x.com")
}

#[tokio::test]
async fn scenario_a_empty_collection_fires_navigation_once() {
    let navigator = Arc::new(CountingNavigator::default());
    let desk = ProfileDesk::new(Arc::new(InMemoryProfileStore::new()), navigator.clone());

    assert_eq!(desk.load().await, LoadOutcome::Loaded(0));

    let snapshot = desk.snapshot();
    assert_eq!(snapshot.status, ListStatus::Ready);
    assert!(snapshot.collection.is_empty());
    assert_eq!(navigator.calls(), 1);
}

#[tokio::test]
async fn scenario_b_short_name_is_not_a_required_field_failure() {
    let store = Arc::new(GatedStore::new(vec![]));
    let desk = ProfileDesk::new(store.clone(), Arc::new(CountingNavigator::default()));
    desk.load().await;

    desk.open_editor(None);
    desk.set_field(ProfileField::Name, "Al".into());
    desk.set_field(ProfileField::Email, "al@x.com".into());
    assert!(matches!(desk.save().await, SaveOutcome::Saved(ref p) if p.name == "Al"));
    assert_eq!(store.writes(), 1);

    desk.open_editor(None);
    desk.set_field(ProfileField::Name, "".into());
    desk.set_field(ProfileField::Email, "b@x.com".into());
    assert_eq!(
        desk.save().await,
        SaveOutcome::Rejected(ValidationError::RequiredField {
            field: ProfileField::Name
        })
    );
    assert_eq!(store.writes(), 1);
}

#[tokio::test]
async fn scenario_c_duplicate_name_blocks_save() {
    let store = Arc::new(GatedStore::new(vec![ann()]));
    let desk = ProfileDesk::new(store.clone(), Arc::new(CountingNavigator::default()));
    desk.load().await;

    desk.open_editor(None);
    desk.set_field(ProfileField::Name, "Ann".into());
    desk.set_field(ProfileField::Email, "b@y.com".into());
    let outcome = desk.save().await;

    assert!(matches!(
        outcome,
        SaveOutcome::Rejected(ValidationError::DuplicateName { .. })
    ));
    let snapshot = desk.snapshot();
    assert!(snapshot.is_modal_open);
    assert_eq!(
        snapshot.session.unwrap().error.as_deref(),
        Some("This name is already used by another profile. Please use a different name.")
    );
    assert_eq!(snapshot.collection, vec![ann()]);
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn scenario_d_age_edit_updates_in_place() {
    let bob = Profile::new("2", "Bob", "b@y.com").with_age(40);
    let store = Arc::new(InMemoryProfileStore::with_profiles(vec![
        ann(),
        bob.clone(),
        Profile::new("3", "Cid", "c@z.com"),
    ]));
    let desk = ProfileDesk::new(store.clone(), Arc::new(CountingNavigator::default()));
    desk.load().await;

    desk.open_editor(Some(&bob));
    assert!(!desk.snapshot().save_enabled);

    assert_eq!(
        desk.set_field(ProfileField::Age, FieldValue::Number(200)),
        FieldChange::Rejected
    );
    let session = desk.snapshot().session.unwrap();
    assert_eq!(session.draft.age, Some(40));
    assert!(!session.is_dirty);

    assert_eq!(
        desk.set_field(ProfileField::Age, FieldValue::Number(45)),
        FieldChange::Applied
    );
    let session = desk.snapshot().session.unwrap();
    assert_eq!(session.draft.age, Some(45));
    assert!(session.is_dirty);

    assert!(matches!(desk.save().await, SaveOutcome::Saved(_)));
    let snapshot = desk.snapshot();
    let ids: Vec<&str> = snapshot.collection.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(snapshot.collection[1].age, Some(45));
    assert!(!snapshot.is_modal_open);
    assert_eq!(store.profiles()[1].age, Some(45));
}

#[tokio::test]
async fn scenario_e_deleting_last_profile_fires_navigation() {
    let navigator = Arc::new(CountingNavigator::default());
    let store = Arc::new(InMemoryProfileStore::with_profiles(vec![ann()]));
    let desk = ProfileDesk::new(store.clone(), navigator.clone());
    desk.load().await;
    assert_eq!(navigator.calls(), 0);

    desk.request_delete("1", "Ann");
    let snapshot = desk.snapshot();
    assert_eq!(snapshot.collection.len(), 1);
    assert_eq!(
        snapshot.delete_intent.unwrap().prompt(),
        "Are you sure you want to delete Ann?"
    );

    assert_eq!(
        desk.confirm_delete().await,
        DeleteOutcome::Deleted("1".into())
    );
    let snapshot = desk.snapshot();
    assert!(snapshot.collection.is_empty());
    assert!(snapshot.delete_intent.is_none());
    assert_eq!(navigator.calls(), 1);
    assert!(store.profiles().is_empty());
}

#[tokio::test]
async fn test_cancel_delete_makes_no_call() {
    let store = Arc::new(GatedStore::new(vec![ann()]));
    let desk = ProfileDesk::new(store.clone(), Arc::new(CountingNavigator::default()));
    desk.load().await;

    desk.request_delete("1", "Ann");
    desk.cancel_delete();
    desk.cancel_delete();

    assert_eq!(desk.confirm_delete().await, DeleteOutcome::NoIntent);
    assert_eq!(store.writes(), 0);
    assert_eq!(desk.snapshot().collection, vec![ann()]);
}

#[tokio::test]
async fn test_cancel_twice_leaves_editor_closed() {
    let desk = ProfileDesk::new(
        Arc::new(InMemoryProfileStore::new()),
        Arc::new(CountingNavigator::default()),
    );
    desk.open_editor(None);
    desk.cancel_edit();
    assert!(!desk.snapshot().is_modal_open);
    desk.cancel_edit();
    assert!(!desk.snapshot().is_modal_open);
    assert!(desk.snapshot().session.is_none());
}

#[tokio::test]
async fn test_save_completing_after_cancel_only_updates_collection() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(GatedStore::new(vec![ann()]).gated(gate.clone()));
    let desk = ProfileDesk::new(store.clone(), Arc::new(CountingNavigator::default()));
    desk.load().await;

    desk.open_editor(None);
    desk.set_field(ProfileField::Name, "Bob".into());
    desk.set_field(ProfileField::Email, "b@y.com".into());

    let user = async {
        tokio::task::yield_now().await;
        assert!(desk.snapshot().session.unwrap().is_saving);
        assert_eq!(desk.save().await, SaveOutcome::InFlight);
        desk.cancel_edit();
        gate.notify_one();
    };
    let (outcome, ()) = tokio::join!(desk.save(), user);

    assert_eq!(outcome, SaveOutcome::Superseded);
    let snapshot = desk.snapshot();
    assert!(!snapshot.is_modal_open);
    assert_eq!(snapshot.collection.len(), 2);
    assert_eq!(snapshot.collection[1].name, "Bob");
    assert_eq!(store.writes(), 1);
}

#[tokio::test]
async fn test_failed_save_for_replaced_session_is_discarded() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(GatedStore::new(vec![ann()]).gated(gate.clone()).failing());
    let desk = ProfileDesk::new(store.clone(), Arc::new(CountingNavigator::default()));
    desk.load().await;

    desk.open_editor(None);
    desk.set_field(ProfileField::Name, "Bob".into());
    desk.set_field(ProfileField::Email, "b@y.com".into());

    let user = async {
        tokio::task::yield_now().await;
        desk.open_editor(None);
        desk.set_field(ProfileField::Name, "Cid".into());
        gate.notify_one();
    };
    let (outcome, ()) = tokio::join!(desk.save(), user);

    assert_eq!(outcome, SaveOutcome::Superseded);
    let session = desk.snapshot().session.unwrap();
    assert_eq!(session.draft.name, "Cid");
    assert!(session.error.is_none());
    assert_eq!(desk.snapshot().collection, vec![ann()]);
}

#[tokio::test]
async fn test_failed_load_can_be_retried() {
    struct FlakyStore {
        inner: InMemoryProfileStore,
        failures_left: AtomicUsize,
    }

    #[async_trait]
    impl ProfileStore for FlakyStore {
        async fn list(&self) -> StoreResult<Vec<Profile>> {
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(StoreError::Fetch {
                    reason: "timeout".into(),
                });
            }
            self.inner.list().await
        }

        async fn create(&self, profile: &Profile) -> StoreResult<Profile> {
            self.inner.create(profile).await
        }

        async fn update(&self, profile: &Profile) -> StoreResult<Profile> {
            self.inner.update(profile).await
        }

        async fn delete(&self, id: &str) -> StoreResult<()> {
            self.inner.delete(id).await
        }

        fn backend_name(&self) -> &'static str {
            "flaky"
        }
    }

    let store = Arc::new(FlakyStore {
        inner: InMemoryProfileStore::with_profiles(vec![ann()]),
        failures_left: AtomicUsize::new(1),
    });
    let navigator = Arc::new(CountingNavigator::default());
    let desk = ProfileDesk::new(store, navigator.clone());

    assert!(matches!(desk.load().await, LoadOutcome::Failed(_)));
    assert_eq!(desk.snapshot().status, ListStatus::Failed);
    assert_eq!(navigator.calls(), 0);

    desk.open_editor(None);
    desk.set_field(ProfileField::Name, "Ann".into());
    desk.set_field(ProfileField::Email, "b@y.com".into());
    assert_eq!(desk.save().await, SaveOutcome::ListUnavailable);

    assert_eq!(desk.reload().await, LoadOutcome::Loaded(1));
    let snapshot = desk.snapshot();
    assert_eq!(snapshot.status, ListStatus::Ready);
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.collection, vec![ann()]);

    assert!(matches!(
        desk.save().await,
        SaveOutcome::Rejected(ValidationError::DuplicateName { .. })
    ));
    assert_eq!(desk.snapshot().collection, vec![ann()]);
}
