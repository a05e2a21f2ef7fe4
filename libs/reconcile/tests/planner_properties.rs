//! Property tests for instance planning.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use fleet_reconcile::{is_compatible, InstancePlan, InstancePlanner, PlanKind, StatesByInstance};
use fleet_testing::fixtures::{existing, job};
use fleet_testing::strategies::{arb_existing, arb_scenario, arb_zoneless_scenario, JOB};
use fleet_testing::{FakeInstance, MemoryRepository};
use proptest::prelude::*;

fn plan(
    scenario: &fleet_testing::strategies::JobScenario,
) -> (Vec<InstancePlan<FakeInstance>>, MemoryRepository) {
    let repo = MemoryRepository::new();
    let plans = InstancePlanner::new(&repo)
        .plan_job_instances(
            &scenario.job,
            &scenario.desired,
            &scenario.existing,
            &StatesByInstance::new(),
        )
        .unwrap();
    (plans, repo)
}

proptest! {
    #[test]
    fn prop_zoneless_reuses_lowest_indices(scenario in arb_zoneless_scenario()) {
        let (plans, _) = plan(&scenario);

        let mut sorted: Vec<u32> = scenario.existing.iter().map(|e| e.index.value()).collect();
        sorted.sort_unstable();
        let matched = scenario.desired.len().min(sorted.len());

        let reused: Vec<u32> = plans
            .iter()
            .filter(|p| p.is_reused())
            .map(|p| p.index().value())
            .collect();
        prop_assert_eq!(&reused[..], &sorted[..matched]);

        let obsolete: Vec<u32> = plans
            .iter()
            .filter(|p| p.is_obsolete())
            .map(|p| p.index().value())
            .collect();
        prop_assert_eq!(&obsolete[..], &sorted[matched..]);
    }

    #[test]
    fn prop_incompatible_instances_are_obsolete(scenario in arb_scenario()) {
        let (plans, _) = plan(&scenario);

        for instance in &scenario.existing {
            if !is_compatible(&scenario.job, instance) {
                let plan = plans
                    .iter()
                    .find(|p| p.existing_instance() == Some(instance))
                    .expect("every existing instance is planned");
                prop_assert!(plan.is_obsolete(), "{:?} was not obsoleted", instance);
            }
        }
    }

    #[test]
    fn prop_every_instance_planned_once(scenario in arb_scenario()) {
        let (plans, repo) = plan(&scenario);

        let reused = plans.iter().filter(|p| p.is_reused()).count();
        let created = plans.iter().filter(|p| p.is_new()).count();
        prop_assert_eq!(reused + created, scenario.desired.len());
        prop_assert_eq!(plans.len(), scenario.desired.len() + scenario.existing.len() - reused);
        prop_assert_eq!(repo.call_count(), plans.len());

        for instance in &scenario.existing {
            let count = plans
                .iter()
                .filter(|p| !p.is_new() && p.existing_instance() == Some(instance))
                .count();
            prop_assert_eq!(count, 1);
        }
    }

    #[test]
    fn prop_plans_ordered_by_kind(scenario in arb_scenario()) {
        let (plans, _) = plan(&scenario);

        let rank = |kind: PlanKind| match kind {
            PlanKind::Reused => 0,
            PlanKind::New => 1,
            PlanKind::Obsolete => 2,
        };
        let ranks: Vec<u8> = plans.iter().map(|p| rank(p.kind())).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ranks, sorted);
    }

    #[test]
    fn prop_new_indices_are_free(scenario in arb_scenario()) {
        let (plans, _) = plan(&scenario);

        let reused: HashSet<u32> = plans
            .iter()
            .filter(|p| p.is_reused())
            .map(|p| p.index().value())
            .collect();
        let created: Vec<u32> = plans
            .iter()
            .filter(|p| p.is_new())
            .map(|p| p.index().value())
            .collect();

        let unique: BTreeSet<u32> = created.iter().copied().collect();
        prop_assert_eq!(unique.len(), created.len());
        prop_assert!(created.iter().all(|index| !reused.contains(index)));

        // Unhinted creations fill the lowest free indices.
        let expected: Vec<u32> = (0u32..)
            .filter(|index| !reused.contains(index))
            .take(created.len())
            .collect();
        prop_assert_eq!(created, expected);
    }

    #[test]
    fn prop_new_instances_balanced_over_zones(scenario in arb_scenario()) {
        let (plans, _) = plan(&scenario);

        let mut per_zone: BTreeMap<&str, usize> = BTreeMap::new();
        for plan in plans.iter().filter(|p| p.is_new()) {
            match plan.desired_instance().and_then(|d| d.availability_zone()) {
                Some(zone) => *per_zone.entry(zone.name.as_str()).or_default() += 1,
                None => {
                    prop_assert!(scenario.job.is_zone_agnostic());
                }
            }
        }

        if !per_zone.is_empty() {
            let declared = scenario.job.availability_zones.len();
            let created: usize = per_zone.values().sum();
            let max = per_zone.values().copied().max().unwrap_or(0);
            let min = if per_zone.len() < declared {
                0
            } else {
                per_zone.values().copied().min().unwrap_or(0)
            };
            prop_assert!(max - min <= 1, "{:?} for {} new", per_zone, created);
        }
    }

    #[test]
    fn prop_obsolete_jobs_skip_declared_jobs(
        declared in arb_existing(6),
        other_indices in proptest::collection::btree_set(0u32..20, 0..6),
    ) {
        let others: Vec<_> = other_indices
            .iter()
            .map(|index| existing("bar-job", *index, None))
            .collect();
        let all: Vec<_> = declared.iter().chain(&others).cloned().collect();

        let repo = MemoryRepository::new();
        let plans = InstancePlanner::new(&repo)
            .plan_obsolete_jobs(&[job(JOB, &[])], &all)
            .unwrap();

        prop_assert_eq!(plans.len(), others.len());
        prop_assert!(plans.iter().all(|p| p.is_obsolete()));
        prop_assert!(plans
            .iter()
            .all(|p| p.existing_instance().map(|e| e.job.as_str()) == Some("bar-job")));
    }

    #[test]
    fn prop_repository_failure_stops_before_creation(scenario in arb_zoneless_scenario()) {
        prop_assume!(scenario.desired.len() > scenario.existing.len());

        let repo = MemoryRepository::failing_on(PlanKind::New);
        let err = InstancePlanner::new(&repo)
            .plan_job_instances(
                &scenario.job,
                &scenario.desired,
                &scenario.existing,
                &StatesByInstance::new(),
            )
            .unwrap_err();

        prop_assert!(!err.is_config());
        prop_assert_eq!(repo.call_count(), scenario.existing.len());
    }
}
