//! Zone compatibility and balancing.

use crate::existing::ExistingInstance;
use crate::job::{AvailabilityZone, Job};

/// Returns true if an existing instance may be reused for the job.
///
/// A zone-agnostic job accepts every instance. Otherwise the instance must
/// be bound to one of the job's zones; an unbound instance is not accepted.
pub fn is_compatible(job: &Job, instance: &ExistingInstance) -> bool {
    if job.is_zone_agnostic() {
        return true;
    }

    instance
        .availability_zone
        .as_ref()
        .is_some_and(|zone| job.zone(zone).is_some())
}

/// Split existing instances into (compatible, incompatible).
///
/// Compatible instances are ordered by ascending index and form the reuse
/// pool. Incompatible instances keep their input order; they can never be
/// reused for this job.
pub fn classify<'a>(
    job: &Job,
    instances: &'a [ExistingInstance],
) -> (Vec<&'a ExistingInstance>, Vec<&'a ExistingInstance>) {
    let mut compatible = Vec::new();
    let mut incompatible = Vec::new();

    for instance in instances {
        if is_compatible(job, instance) {
            compatible.push(instance);
        } else {
            incompatible.push(instance);
        }
    }

    // Stable, so equal indices keep input order.
    compatible.sort_by_key(|instance| instance.index);

    (compatible, incompatible)
}

/// Pick a zone for each of `count` newly created instances.
///
/// Zones are assigned round-robin in declared order, so per-zone counts
/// differ by at most one. Zone-agnostic jobs get no zone.
pub fn assign_zones(job: &Job, count: usize) -> Vec<Option<AvailabilityZone>> {
    if job.is_zone_agnostic() {
        return vec![None; count];
    }

    job.availability_zones
        .iter()
        .cycle()
        .take(count)
        .cloned()
        .map(Some)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use fleet_id::{InstanceIndex, JobName, ZoneName};

    use super::*;

    fn zone(name: &str) -> AvailabilityZone {
        AvailabilityZone::new(ZoneName::parse(name).unwrap())
    }

    fn job(zones: &[&str]) -> Job {
        Job::with_zones(
            JobName::parse("foo-job").unwrap(),
            zones.iter().map(|z| zone(z)).collect(),
        )
    }

    fn existing(index: u32, zone: Option<&str>) -> ExistingInstance {
        ExistingInstance {
            job: JobName::parse("foo-job").unwrap(),
            index: InstanceIndex::new(index),
            availability_zone: zone.map(|z| ZoneName::parse(z).unwrap()),
        }
    }

    #[test]
    fn test_zone_agnostic_job_accepts_everything() {
        let job = job(&[]);
        assert!(is_compatible(&job, &existing(0, None)));
        assert!(is_compatible(&job, &existing(1, Some("anywhere"))));
    }

    #[test]
    fn test_zoned_job_rejects_foreign_and_unbound() {
        let job = job(&["z1"]);
        assert!(is_compatible(&job, &existing(0, Some("z1"))));
        assert!(!is_compatible(&job, &existing(1, Some("old-az"))));
        assert!(!is_compatible(&job, &existing(2, None)));
    }

    #[test]
    fn test_classify_orders_pool_by_index() {
        let job = job(&["z1", "z2"]);
        let instances = vec![
            existing(5, Some("z2")),
            existing(0, Some("old-az")),
            existing(2, Some("z1")),
            existing(9, None),
        ];

        let (compatible, incompatible) = classify(&job, &instances);

        let pool: Vec<u32> = compatible.iter().map(|i| i.index.value()).collect();
        let rejected: Vec<u32> = incompatible.iter().map(|i| i.index.value()).collect();
        assert_eq!(pool, vec![2, 5]);
        assert_eq!(rejected, vec![0, 9]);
    }

    #[test]
    fn test_assign_zones_round_robin() {
        let job = job(&["z1", "z2", "z3"]);
        let zones: Vec<String> = assign_zones(&job, 5)
            .into_iter()
            .map(|z| z.unwrap().name.into_inner())
            .collect();
        assert_eq!(zones, vec!["z1", "z2", "z3", "z1", "z2"]);
    }

    #[test]
    fn test_assign_zones_balanced() {
        let job = job(&["z1", "z2", "z3"]);
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for az in assign_zones(&job, 11).into_iter().flatten() {
            *counts.entry(az.name.into_inner()).or_default() += 1;
        }
        let max = counts.values().max().copied().unwrap_or(0);
        let min = counts.values().min().copied().unwrap_or(0);
        assert!(max - min <= 1);
        assert_eq!(counts.values().sum::<usize>(), 11);
    }

    #[test]
    fn test_assign_zones_zone_agnostic() {
        let job = job(&[]);
        assert_eq!(assign_zones(&job, 3), vec![None, None, None]);
        assert!(assign_zones(&job, 0).is_empty());
    }
}
