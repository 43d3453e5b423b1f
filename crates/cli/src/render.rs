//! Human-readable terminal output.

use colored::Colorize;
use std::fmt::Write;
use tp_protocol::ipc::Event;
use tp_protocol::stage_models::StageState;
use tp_protocol::travel_models::{HealthReport, HealthStatus};
use tp_protocol::trip_models::PlanResponseData;

/// One progress line per event, or `None` for events not worth showing.
pub fn event(event: &Event) -> Option<String> {
    match event {
        Event::RunStarted { destination, .. } => Some(format!(
            "{} planning trip to {}",
            "▶".cyan(),
            destination.as_deref().unwrap_or("a suggested destination")
        )),
        Event::StageStatusUpdate {
            stage,
            state,
            progress,
            ..
        } => {
            let state = match state {
                StageState::Pending => "pending".dimmed(),
                StageState::Running => "running".yellow(),
                StageState::Completed => "completed".green(),
                StageState::Failed => "failed".red(),
            };
            Some(format!("  [{:>9}] {state} {progress:>3}%", stage.as_str()))
        }
        Event::RunLogChunk { .. } => None,
        Event::RunCompleted { .. } => Some(format!("{} plan ready", "✔".green())),
        Event::RunFailed { stage, error, .. } => Some(match stage {
            Some(stage) => format!("{} {stage} failed: {error}", "✘".red()),
            None => format!("{} {error}", "✘".red()),
        }),
    }
}

pub fn plan(data: &PlanResponseData) -> String {
    let mut out = String::new();
    let summary = &data.summary;

    match &data.ui {
        Some(ui) => {
            let _ = writeln!(out, "{}", ui.title.bold());
            let _ = writeln!(
                out,
                "{} days, {} activities, {} flight options, {} places to stay",
                summary.duration,
                summary.activities.len(),
                summary.flights,
                summary.accommodations
            );
            let costs = &ui.cost_breakdown;
            let _ = writeln!(
                out,
                "Costs: flights ${:.2}, lodging ${:.2}, activities ${:.2}, total {}",
                costs.flights,
                costs.lodging,
                costs.activities,
                format!("${:.2}", costs.total).bold()
            );
            if let Some(booking) = &data.booking {
                if !booking.within_budget {
                    let _ = writeln!(out, "{}", "Over budget".red());
                }
            }
            for day in &ui.days {
                let _ = writeln!(out);
                let _ = writeln!(out, "{} (${:.2})", day.title.cyan(), day.estimated_cost);
                for item in &day.items {
                    let _ = writeln!(out, "  {item}");
                }
            }
        }
        None => {
            let _ = writeln!(
                out,
                "{} for {} days, total ${:.2}",
                summary.destination.bold(),
                summary.duration,
                summary.total_cost
            );
        }
    }
    out
}

pub fn failure(error: &str) -> String {
    format!("{} {error}", "Planning failed:".red().bold())
}

pub fn health(report: &HealthReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Providers: {}", status_label(report.status));
    for (capability, health) in &report.providers {
        let _ = write!(
            out,
            "  {:<15} {:<20} {} {}ms",
            capability.as_str(),
            health.adapter,
            status_label(health.status),
            health.latency_ms
        );
        if let Some(error) = &health.error {
            let _ = write!(out, " ({error})");
        }
        let _ = writeln!(out);
    }
    out
}

fn status_label(status: HealthStatus) -> colored::ColoredString {
    match status {
        HealthStatus::Healthy => "healthy".green(),
        HealthStatus::Unhealthy => "unhealthy".red(),
    }
}
