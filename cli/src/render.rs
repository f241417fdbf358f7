use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use comfy_table::Table;
use common::JobRecord;
use jobdeck_engine::{BatchError, BatchOutcome, JobListView};

fn timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

pub fn jobs_table(view: &JobListView) {
    let mut table = Table::new();
    table.set_header(vec!["", "ID", "Type", "Name", "Status", "Started", "Finished"]);
    for job in view.jobs() {
        let mark = if view.is_selected(&job.key()) { "*" } else { "" };
        table.add_row(vec![
            mark.to_string(),
            job.id.to_string(),
            job.job_type.to_string(),
            job.name.clone(),
            job.status.to_string(),
            timestamp(job.started),
            timestamp(job.finished),
        ]);
    }
    println!("{table}");
    println!("{} of {} job(s)", view.jobs().len(), view.count());
}

pub fn jobs_csv(jobs: &[JobRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(["id", "type", "name", "status", "started", "finished"])?;
    for job in jobs {
        writer.write_record([
            job.id.to_string(),
            job.job_type.to_string(),
            job.name.clone(),
            job.status.to_string(),
            job.started.map(|t| t.to_rfc3339()).unwrap_or_default(),
            job.finished.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn outcome_table(outcome: &BatchOutcome) {
    if outcome.is_empty() {
        println!("Nothing to {}", outcome.kind);
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Job", "Name", "Result"]);
    for entry in &outcome.entries {
        let result = match &entry.result {
            Ok(()) => format!("{} ok", outcome.kind),
            Err(e) => e.message.clone(),
        };
        table.add_row(vec![entry.record.key().to_string(), entry.record.name.clone(), result]);
    }
    println!("{table}");
}

pub fn batch_error(error: &BatchError) {
    eprintln!("{}", error.title);
    eprintln!("{}", error.message);
    for line in error.details() {
        eprintln!("  {}", line);
    }
}
