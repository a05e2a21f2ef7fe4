//! Plan command (dry-run planning pass).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use fleet_reconcile::{
    DeploymentPlan, InstancePlan, InstancePlanner, PlanError, PlanKind, PlanSummary,
};
use serde::Serialize;
use tabled::Tabled;

use crate::dry_run::{DryRunInstance, DryRunRepository};
use crate::error::CliError;
use crate::output::{display_option, print_info, print_json, print_table, OutputFormat};
use crate::snapshot::Snapshot;

use super::CommandContext;

/// Plan command.
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Path to the deployment snapshot (TOML).
    snapshot: PathBuf,
}

/// One row of the plan.
#[derive(Debug, Serialize, Tabled)]
struct PlanRow {
    #[tabled(rename = "Instance")]
    instance: String,

    #[tabled(rename = "Action")]
    action: PlanKind,

    #[tabled(rename = "Zone", display = "display_option")]
    zone: Option<String>,
}

impl PlanRow {
    fn from_plan(plan: &InstancePlan<DryRunInstance>) -> Self {
        let zone = match plan {
            InstancePlan::Obsolete { existing, .. } => existing.availability_zone.clone(),
            _ => plan
                .desired_instance()
                .and_then(|desired| desired.availability_zone())
                .map(|az| az.name.clone()),
        };

        Self {
            instance: plan.instance().name.clone(),
            action: plan.kind(),
            zone: zone.map(|zone| zone.into_inner()),
        }
    }
}

/// JSON shape of a plan.
#[derive(Debug, Serialize)]
struct PlanReport {
    deployment: String,
    pass_id: String,
    digest: String,
    summary: PlanSummary,
    plans: Vec<PlanRow>,
}

impl PlanCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let inputs = Snapshot::load(&self.snapshot)?.into_inputs()?;

        let repository = DryRunRepository;
        let planner = InstancePlanner::new(&repository);
        let plan: DeploymentPlan<DryRunInstance> = planner
            .plan_deployment(&inputs.requests, &inputs.existing, &inputs.states)
            .map_err(|e| match e {
                PlanError::Config(err) => CliError::Config(err),
                PlanError::Repository(never) => match never {},
            })?;

        let rows: Vec<PlanRow> = plan.iter().map(PlanRow::from_plan).collect();
        let summary = plan.summary();
        let report = PlanReport {
            deployment: inputs.deployment.into_inner(),
            pass_id: planner.context().pass_id.to_string(),
            digest: plan.digest().to_string(),
            summary,
            plans: rows,
        };

        match ctx.format {
            OutputFormat::Table => {
                print_table(&report.plans);
                println!();
                print_info(&format!(
                    "{}: {} reused, {} new, {} obsolete",
                    report.deployment, summary.reused, summary.created, summary.obsoleted
                ));
                print_info(&format!("Digest: {}", report.digest));
                if summary.is_converged() {
                    print_info("Deployment is converged.");
                }
            }
            OutputFormat::Json => print_json(&report),
        }

        Ok(())
    }
}
