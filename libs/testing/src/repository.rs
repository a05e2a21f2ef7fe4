//! In-memory instance repository.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use fleet_id::{InstanceIndex, JobName, ZoneName};
use fleet_reconcile::{
    DesiredInstance, DesiredInstanceKey, ExistingInstance, InstanceRepository, InstanceState,
    PlanContext, PlanKind,
};
use thiserror::Error;

/// A repository call, as recorded by [`MemoryRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchExisting {
        desired: DesiredInstanceKey,
        existing: Option<ExistingInstance>,
        zone: Option<ZoneName>,
        state: InstanceState,
        index: InstanceIndex,
    },
    Create {
        desired: DesiredInstanceKey,
        zone: Option<ZoneName>,
        index: InstanceIndex,
    },
    FetchObsolete {
        existing: ExistingInstance,
    },
}

impl Call {
    /// The outcome this call resolves.
    pub fn kind(&self) -> PlanKind {
        match self {
            Self::FetchExisting { .. } => PlanKind::Reused,
            Self::Create { .. } => PlanKind::New,
            Self::FetchObsolete { .. } => PlanKind::Obsolete,
        }
    }
}

/// Handle returned by [`MemoryRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeInstance {
    /// Sequence number of the call that produced this handle.
    pub id: u64,
    pub kind: PlanKind,
    pub job: JobName,
    pub index: InstanceIndex,
    pub zone: Option<ZoneName>,
}

/// Failure injected by a [`MemoryRepository`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("injected failure resolving {kind} instance {job}/{index}")]
pub struct InjectedFailure {
    pub kind: PlanKind,
    pub job: JobName,
    pub index: InstanceIndex,
}

/// Records every call and hands out [`FakeInstance`] handles.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicU64,
    fail_on: Option<PlanKind>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository that fails every call resolving `kind`.
    pub fn failing_on(kind: PlanKind) -> Self {
        Self {
            fail_on: Some(kind),
            ..Self::default()
        }
    }

    /// Calls recorded so far, in order. Failed calls are not recorded.
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn resolve(
        &self,
        call: Call,
        job: &JobName,
        index: InstanceIndex,
        zone: Option<ZoneName>,
    ) -> Result<FakeInstance, InjectedFailure> {
        let kind = call.kind();
        if self.fail_on == Some(kind) {
            return Err(InjectedFailure {
                kind,
                job: job.clone(),
                index,
            });
        }

        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);

        Ok(FakeInstance {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            kind,
            job: job.clone(),
            index,
            zone,
        })
    }
}

impl InstanceRepository for MemoryRepository {
    type Instance = FakeInstance;
    type Error = InjectedFailure;

    fn fetch_existing(
        &self,
        desired: &DesiredInstance,
        state: &InstanceState,
        index: InstanceIndex,
        _context: &PlanContext,
    ) -> Result<FakeInstance, InjectedFailure> {
        let zone = desired.availability_zone().map(|az| az.name.clone());
        let call = Call::FetchExisting {
            desired: desired.key().clone(),
            existing: desired.existing_instance().cloned(),
            zone: zone.clone(),
            state: state.clone(),
            index,
        };
        self.resolve(call, desired.job(), index, zone)
    }

    fn create(
        &self,
        desired: &DesiredInstance,
        index: InstanceIndex,
        _context: &PlanContext,
    ) -> Result<FakeInstance, InjectedFailure> {
        let zone = desired.availability_zone().map(|az| az.name.clone());
        let call = Call::Create {
            desired: desired.key().clone(),
            zone: zone.clone(),
            index,
        };
        self.resolve(call, desired.job(), index, zone)
    }

    fn fetch_obsolete(
        &self,
        existing: &ExistingInstance,
        _context: &PlanContext,
    ) -> Result<FakeInstance, InjectedFailure> {
        let call = Call::FetchObsolete {
            existing: existing.clone(),
        };
        self.resolve(
            call,
            &existing.job,
            existing.index,
            existing.availability_zone.clone(),
        )
    }
}
