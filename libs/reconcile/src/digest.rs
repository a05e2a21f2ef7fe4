//! Plan digests for comparing planning passes.
//!
//! Two passes over the same inputs must produce the same decisions. The
//! digest covers the decisions only (kind, job, index, zone), in plan order,
//! never the instance handles, so it can be compared across runs and
//! machines.

use sha2::{Digest, Sha256};

use crate::plan::InstancePlan;

/// A SHA-256 digest of a sequence of planning decisions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanDigest(String);

impl PlanDigest {
    /// Digest the decisions of `plans`, in order.
    pub fn of_plans<'a, I: 'a>(plans: impl IntoIterator<Item = &'a InstancePlan<I>>) -> Self {
        let mut hasher = Sha256::new();
        let mut count: u64 = 0;
        for plan in plans {
            Decision::of(plan).feed(&mut hasher);
            count += 1;
        }
        hasher.update(count.to_be_bytes());
        Self(format!("sha256:{}", hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlanDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The handle-free part of one plan.
struct Decision<'a> {
    kind: &'static str,
    job: &'a str,
    index: u32,
    zone: Option<&'a str>,
}

impl<'a> Decision<'a> {
    fn of<I>(plan: &'a InstancePlan<I>) -> Self {
        let (job, zone) = match plan {
            InstancePlan::Reused { desired, .. } | InstancePlan::New { desired, .. } => (
                desired.job().as_str(),
                desired.availability_zone().map(|az| az.name.as_str()),
            ),
            InstancePlan::Obsolete { existing, .. } => (
                existing.job.as_str(),
                existing.availability_zone.as_ref().map(|zone| zone.as_str()),
            ),
        };

        Self {
            kind: plan.kind().as_str(),
            job,
            index: plan.index().value(),
            zone,
        }
    }

    /// Length-prefixed fields, so no two decision sequences share an encoding.
    fn feed(&self, hasher: &mut Sha256) {
        feed_str(hasher, self.kind);
        feed_str(hasher, self.job);
        hasher.update(self.index.to_be_bytes());
        match self.zone {
            Some(zone) => {
                hasher.update([1u8]);
                feed_str(hasher, zone);
            }
            None => hasher.update([0u8]),
        }
    }
}

fn feed_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}
