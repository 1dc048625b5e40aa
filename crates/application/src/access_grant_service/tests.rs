use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use factacl_core::{AppError, AppResult, CallerIdentity, OrganizationId, SubjectId};
use factacl_domain::{AccessMode, AclEntry, AclEntryId, Fact, FactId, Permission};

use crate::{AclInsertOutcome, AclStore, AuthorizationChecker, FactLookup, GrantFactAccessInput};

use super::AccessGrantService;

#[derive(Default)]
struct FakeFactLookup {
    facts: HashMap<FactId, Fact>,
}

#[async_trait]
impl FactLookup for FakeFactLookup {
    async fn fetch_fact(&self, fact_id: FactId) -> AppResult<Fact> {
        self.facts
            .get(&fact_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("fact '{fact_id}' does not exist")))
    }
}

#[derive(Default)]
struct FakeAuthorizationChecker {
    readers: HashSet<SubjectId>,
    capabilities: HashSet<(SubjectId, Permission, OrganizationId)>,
    calls: Mutex<Vec<&'static str>>,
}

#[async_trait]
impl AuthorizationChecker for FakeAuthorizationChecker {
    async fn check_read_permission(&self, actor: &CallerIdentity, fact: &Fact) -> AppResult<()> {
        self.calls.lock().await.push("read");
        if self.readers.contains(&actor.subject_id()) {
            return Ok(());
        }

        Err(AppError::AccessDenied(format!(
            "subject '{}' may not read fact '{}'",
            actor.subject_id(),
            fact.id()
        )))
    }

    async fn check_permission(
        &self,
        actor: &CallerIdentity,
        permission: Permission,
        organization_id: OrganizationId,
    ) -> AppResult<()> {
        self.calls.lock().await.push(permission.as_str());
        if self
            .capabilities
            .contains(&(actor.subject_id(), permission, organization_id))
        {
            return Ok(());
        }

        Err(AppError::AccessDenied(format!(
            "subject '{}' is missing permission '{}'",
            actor.subject_id(),
            permission.as_str()
        )))
    }
}

#[derive(Default)]
struct FakeAclStore {
    entries: Mutex<Vec<AclEntry>>,
    writes: Mutex<usize>,
    insert_attempts: Mutex<usize>,
    reject_with_immutable_violation: bool,
    concurrent_winner: Mutex<Option<AclEntry>>,
}

#[async_trait]
impl AclStore for FakeAclStore {
    async fn list_entries(&self, fact_id: FactId) -> AppResult<Vec<AclEntry>> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| entry.fact_id() == fact_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, entry: AclEntry) -> AppResult<AclEntry> {
        match self.insert_if_absent(entry).await? {
            AclInsertOutcome::Created(entry) => Ok(entry),
            AclInsertOutcome::Existing(entry) => Err(AppError::Conflict(format!(
                "fact '{}' already grants subject '{}'",
                entry.fact_id(),
                entry.subject_id()
            ))),
        }
    }

    async fn insert_if_absent(&self, entry: AclEntry) -> AppResult<AclInsertOutcome> {
        *self.insert_attempts.lock().await += 1;
        if self.reject_with_immutable_violation {
            return Err(AppError::ImmutableViolation(format!(
                "acl entry '{}' already exists",
                entry.id()
            )));
        }

        let mut entries = self.entries.lock().await;
        if let Some(winner) = self.concurrent_winner.lock().await.take() {
            entries.push(winner);
        }

        if let Some(existing) = entries
            .iter()
            .find(|stored| stored.grants(entry.fact_id(), entry.subject_id()))
        {
            return Ok(AclInsertOutcome::Existing(existing.clone()));
        }

        entries.push(entry.clone());
        *self.writes.lock().await += 1;
        Ok(AclInsertOutcome::Created(entry))
    }
}

struct Fixture {
    service: AccessGrantService,
    checker: Arc<FakeAuthorizationChecker>,
    acl_store: Arc<FakeAclStore>,
    caller: CallerIdentity,
    explicit_fact: Fact,
    public_fact: Fact,
}

fn fixture_with(
    acl_store: FakeAclStore,
    configure: impl FnOnce(&mut FakeAuthorizationChecker, &CallerIdentity, OrganizationId),
) -> Fixture {
    let organization_id = OrganizationId::new();
    let caller = CallerIdentity::new(SubjectId::new());
    let explicit_fact = Fact::new(FactId::new(), AccessMode::Explicit, organization_id);
    let public_fact = Fact::new(FactId::new(), AccessMode::Public, organization_id);

    let fact_lookup = FakeFactLookup {
        facts: HashMap::from([
            (explicit_fact.id(), explicit_fact.clone()),
            (public_fact.id(), public_fact.clone()),
        ]),
    };
    let mut checker = FakeAuthorizationChecker::default();
    configure(&mut checker, &caller, organization_id);
    let checker = Arc::new(checker);
    let acl_store = Arc::new(acl_store);
    let service =
        AccessGrantService::new(Arc::new(fact_lookup), checker.clone(), acl_store.clone());

    Fixture {
        service,
        checker,
        acl_store,
        caller,
        explicit_fact,
        public_fact,
    }
}

fn grant_everything(
    checker: &mut FakeAuthorizationChecker,
    caller: &CallerIdentity,
    organization_id: OrganizationId,
) {
    checker.readers.insert(caller.subject_id());
    for permission in Permission::all() {
        checker
            .capabilities
            .insert((caller.subject_id(), *permission, organization_id));
    }
}

fn fixture() -> Fixture {
    fixture_with(FakeAclStore::default(), grant_everything)
}

fn input(fact: &Fact, subject_id: SubjectId) -> GrantFactAccessInput {
    GrantFactAccessInput {
        fact_id: fact.id(),
        subject_id,
    }
}

#[tokio::test]
async fn grant_creates_entry_with_caller_as_source() {
    let fixture = fixture();
    let subject_id = SubjectId::new();

    let granted = fixture
        .service
        .grant_access(&fixture.caller, input(&fixture.explicit_fact, subject_id))
        .await;
    assert!(granted.is_ok());

    let entry = granted.unwrap_or_else(|_| unreachable!());
    assert_eq!(entry.fact_id(), fixture.explicit_fact.id());
    assert_eq!(entry.subject_id(), subject_id);
    assert_eq!(entry.source_id(), fixture.caller.subject_id());
    assert!(entry.timestamp() <= Utc::now());
    assert_eq!(*fixture.acl_store.writes.lock().await, 1);
}

#[tokio::test]
async fn repeated_grant_returns_same_entry_with_single_write() {
    let fixture = fixture();
    let subject_id = SubjectId::new();

    let first = fixture
        .service
        .grant_access(&fixture.caller, input(&fixture.explicit_fact, subject_id))
        .await
        .unwrap_or_else(|_| unreachable!());
    let second = fixture
        .service
        .grant_access(&fixture.caller, input(&fixture.explicit_fact, subject_id))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(first.id(), second.id());
    assert_eq!(first, second);
    assert_eq!(*fixture.acl_store.writes.lock().await, 1);
    assert_eq!(*fixture.acl_store.insert_attempts.lock().await, 1);
}

#[tokio::test]
async fn grant_for_other_subject_creates_separate_entry() {
    let fixture = fixture();

    let first = fixture
        .service
        .grant_access(
            &fixture.caller,
            input(&fixture.explicit_fact, SubjectId::new()),
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    let second = fixture
        .service
        .grant_access(
            &fixture.caller,
            input(&fixture.explicit_fact, SubjectId::new()),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_ne!(first.id(), second.id());
    assert_eq!(*fixture.acl_store.writes.lock().await, 2);
}

#[tokio::test]
async fn public_fact_is_rejected_with_validation_code() {
    let fixture = fixture();

    let result = fixture
        .service
        .grant_access(
            &fixture.caller,
            input(&fixture.public_fact, SubjectId::new()),
        )
        .await;

    let Err(AppError::InvalidArgument(errors)) = result else {
        panic!("expected invalid argument for public fact");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "fact.is.public");
    assert_eq!(errors[0].property, "fact");
    assert_eq!(errors[0].value, fixture.public_fact.id().to_string());
    assert_eq!(*fixture.acl_store.writes.lock().await, 0);
}

#[tokio::test]
async fn public_fact_check_runs_after_authorization() {
    let fixture = fixture_with(FakeAclStore::default(), |_, _, _| {});

    let result = fixture
        .service
        .grant_access(
            &fixture.caller,
            input(&fixture.public_fact, SubjectId::new()),
        )
        .await;

    assert!(matches!(result, Err(AppError::AccessDenied(_))));
}

#[tokio::test]
async fn unknown_fact_fails_before_any_check() {
    let fixture = fixture();

    let result = fixture
        .service
        .grant_access(
            &fixture.caller,
            GrantFactAccessInput {
                fact_id: FactId::new(),
                subject_id: SubjectId::new(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(fixture.checker.calls.lock().await.is_empty());
    assert_eq!(*fixture.acl_store.insert_attempts.lock().await, 0);
}

#[tokio::test]
async fn caller_without_read_access_is_denied_even_with_grant_capability() {
    let fixture = fixture_with(FakeAclStore::default(), |checker, caller, organization_id| {
        checker.capabilities.insert((
            caller.subject_id(),
            Permission::FactAccessGrant,
            organization_id,
        ));
    });

    let result = fixture
        .service
        .grant_access(
            &fixture.caller,
            input(&fixture.explicit_fact, SubjectId::new()),
        )
        .await;

    assert!(matches!(result, Err(AppError::AccessDenied(_))));
    assert_eq!(*fixture.checker.calls.lock().await, vec!["read"]);
    assert_eq!(*fixture.acl_store.insert_attempts.lock().await, 0);
}

#[tokio::test]
async fn caller_with_read_but_no_grant_capability_is_denied() {
    let fixture = fixture_with(FakeAclStore::default(), |checker, caller, _| {
        checker.readers.insert(caller.subject_id());
    });

    let result = fixture
        .service
        .grant_access(
            &fixture.caller,
            input(&fixture.explicit_fact, SubjectId::new()),
        )
        .await;

    assert!(matches!(result, Err(AppError::AccessDenied(_))));
    assert_eq!(
        *fixture.checker.calls.lock().await,
        vec!["read", Permission::FactAccessGrant.as_str()]
    );
    assert_eq!(*fixture.acl_store.insert_attempts.lock().await, 0);
}

#[tokio::test]
async fn grant_capability_is_checked_in_fact_organization() {
    let fixture = fixture_with(FakeAclStore::default(), |checker, caller, _| {
        checker.readers.insert(caller.subject_id());
        checker.capabilities.insert((
            caller.subject_id(),
            Permission::FactAccessGrant,
            OrganizationId::new(),
        ));
    });

    let result = fixture
        .service
        .grant_access(
            &fixture.caller,
            input(&fixture.explicit_fact, SubjectId::new()),
        )
        .await;

    assert!(matches!(result, Err(AppError::AccessDenied(_))));
}

#[tokio::test]
async fn lost_race_returns_entry_stored_by_winner() {
    let subject_id = SubjectId::new();
    let fixture = fixture();
    let winner = AclEntry::new(
        fixture.explicit_fact.id(),
        subject_id,
        SubjectId::new(),
        Utc::now() - Duration::seconds(1),
    );
    *fixture.acl_store.concurrent_winner.lock().await = Some(winner.clone());

    let result = fixture
        .service
        .grant_access(&fixture.caller, input(&fixture.explicit_fact, subject_id))
        .await;

    assert_eq!(result.ok(), Some(winner));
    assert_eq!(*fixture.acl_store.writes.lock().await, 0);
    assert_eq!(fixture.acl_store.entries.lock().await.len(), 1);
}

#[tokio::test]
async fn identifier_collision_surfaces_as_integrity_error_without_retry() {
    let fixture = fixture_with(
        FakeAclStore {
            reject_with_immutable_violation: true,
            ..FakeAclStore::default()
        },
        grant_everything,
    );

    let result = fixture
        .service
        .grant_access(
            &fixture.caller,
            input(&fixture.explicit_fact, SubjectId::new()),
        )
        .await;

    assert!(matches!(result, Err(AppError::Integrity(_))));
    assert_eq!(*fixture.acl_store.insert_attempts.lock().await, 1);
    assert!(fixture.acl_store.entries.lock().await.is_empty());
}

#[tokio::test]
async fn existing_entry_from_other_grantor_is_returned_unchanged() {
    let subject_id = SubjectId::new();
    let fixture = fixture();
    let stored = AclEntry::from_persisted(
        AclEntryId::new(),
        fixture.explicit_fact.id(),
        subject_id,
        SubjectId::new(),
        Utc::now() - Duration::days(3),
    );
    fixture.acl_store.entries.lock().await.push(stored.clone());

    let result = fixture
        .service
        .grant_access(&fixture.caller, input(&fixture.explicit_fact, subject_id))
        .await;

    assert_eq!(result.ok(), Some(stored));
    assert_eq!(*fixture.acl_store.insert_attempts.lock().await, 0);
}

#[tokio::test]
async fn list_fact_access_returns_entries_oldest_first() {
    let fixture = fixture();
    let older = AclEntry::new(
        fixture.explicit_fact.id(),
        SubjectId::new(),
        SubjectId::new(),
        Utc::now() - Duration::hours(2),
    );
    let newer = AclEntry::new(
        fixture.explicit_fact.id(),
        SubjectId::new(),
        SubjectId::new(),
        Utc::now() - Duration::hours(1),
    );
    {
        let mut entries = fixture.acl_store.entries.lock().await;
        entries.push(newer.clone());
        entries.push(older.clone());
    }

    let listed = fixture
        .service
        .list_fact_access(&fixture.caller, fixture.explicit_fact.id())
        .await;

    assert_eq!(listed.ok(), Some(vec![older, newer]));
}

#[tokio::test]
async fn list_fact_access_requires_view_capability() {
    let fixture = fixture_with(FakeAclStore::default(), |checker, caller, organization_id| {
        checker.readers.insert(caller.subject_id());
        checker.capabilities.insert((
            caller.subject_id(),
            Permission::FactAccessGrant,
            organization_id,
        ));
    });

    let listed = fixture
        .service
        .list_fact_access(&fixture.caller, fixture.explicit_fact.id())
        .await;

    assert!(matches!(listed, Err(AppError::AccessDenied(_))));
    assert_eq!(
        *fixture.checker.calls.lock().await,
        vec!["read", Permission::FactAccessView.as_str()]
    );
}
