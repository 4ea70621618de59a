use crate::exif_writer::{save_as, write_date_taken, Disposal};
use crate::planner::{ModifyPlan, PlanItem};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub renamed: usize,
    pub retagged: usize,
    pub unchanged: usize,
    pub cancelled: bool,
    pub failures: Vec<ApplyFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default)]
struct ItemChange {
    renamed: bool,
    retagged: bool,
}

pub fn apply_plan(
    plan: &ModifyPlan,
    disposal: Disposal,
    cancel: &AtomicBool,
    mut progress: impl FnMut(usize, usize),
) -> ApplyOutcome {
    let total = plan.items.len();
    let mut outcome = ApplyOutcome::default();

    for (index, item) in plan.items.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            outcome.cancelled = true;
            break;
        }
        progress(index, total);

        match apply_item(item, disposal) {
            Ok(change) => {
                if change.renamed {
                    outcome.renamed += 1;
                }
                if change.retagged {
                    outcome.retagged += 1;
                }
                if !change.renamed && !change.retagged {
                    outcome.unchanged += 1;
                }
            }
            Err(err) => outcome.failures.push(ApplyFailure {
                path: item.path.clone(),
                reason: err.to_string(),
            }),
        }
    }

    outcome
}

fn apply_item(item: &PlanItem, disposal: Disposal) -> Result<ItemChange> {
    if !item.path.is_file() {
        bail!("ファイルが見つかりません: {}", item.path.display());
    }

    let mut change = ItemChange::default();

    if let Some(date_taken) = item.conversion.new_date_taken {
        write_date_taken(&item.path, date_taken)?;
        change.retagged = true;
    }

    if let Some(new_name) = item.conversion.new_filename.as_deref() {
        if new_name != item.metadata.filename && new_name != item.metadata.comparable_filename() {
            save_as(&item.path, new_name, disposal)?;
            change.renamed = true;
        }
    }

    Ok(change)
}
