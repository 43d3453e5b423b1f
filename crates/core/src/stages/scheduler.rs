//! Scheduler stage: spreads ranked activities over the trip days.

use crate::stages::base::{StageAgent, StageContext, StageError};
use crate::state::tracker::StageTracker;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use tp_protocol::config_models::SchedulerConfig;
use tp_protocol::stage_models::StageKind;
use tp_protocol::trip_models::{
    Activity, DayPlan, ScheduledActivity, SchedulerOutput, StageOutput, TimeSlot,
};

pub struct SchedulerStage {
    config: SchedulerConfig,
    tracker: StageTracker,
}

impl SchedulerStage {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            tracker: StageTracker::new(StageKind::Scheduler),
        }
    }
}

/// Number of itinerary days: one per date in `[start, end)`, at least one.
pub fn trip_days(start: NaiveDate, end: NaiveDate) -> usize {
    usize::try_from((end - start).num_days()).unwrap_or(0).max(1)
}

/// Round-robin assignment of ranked activities to `days` buckets of at most
/// `per_day` each. Returns the buckets and whatever did not fit.
pub fn distribute(
    activities: &[Activity],
    days: usize,
    per_day: usize,
) -> (Vec<Vec<Activity>>, Vec<Activity>) {
    let days = days.max(1);
    let capacity = days * per_day.max(1);
    let mut buckets = vec![Vec::new(); days];
    let mut unscheduled = Vec::new();

    for (index, activity) in activities.iter().enumerate() {
        if index < capacity {
            buckets[index % days].push(activity.clone());
        } else {
            unscheduled.push(activity.clone());
        }
    }
    (buckets, unscheduled)
}

#[async_trait]
impl StageAgent for SchedulerStage {
    fn kind(&self) -> StageKind {
        StageKind::Scheduler
    }

    fn tracker(&self) -> &StageTracker {
        &self.tracker
    }

    async fn run(&self, context: &StageContext) -> Result<StageOutput, StageError> {
        let planner = context.planner()?;
        let planning = context.planning();
        let preferences = &planning.preferences;
        let (adults, children) = (planning.family.adults, planning.family.children);

        let day_count = trip_days(preferences.start_date, preferences.end_date);
        let per_day = usize::try_from(self.config.max_activities_per_day).unwrap_or(usize::MAX);
        let (buckets, unscheduled) = distribute(&planner.activities, day_count, per_day);
        self.tracker.advance(20);

        let mut days = Vec::with_capacity(day_count);
        for (index, bucket) in buckets.into_iter().enumerate() {
            let offset = u64::try_from(index).unwrap_or(u64::MAX);
            let date = preferences
                .start_date
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| {
                    StageError::InvalidInput(format!("day {} is out of range", index + 1))
                })?;

            let activities: Vec<ScheduledActivity> = bucket
                .into_iter()
                .enumerate()
                .map(|(position, activity)| ScheduledActivity {
                    party_cost: activity.party_cost(adults, children),
                    slot: TimeSlot::for_position(position),
                    activity,
                })
                .collect();
            let estimated_cost: f64 = activities.iter().map(|a| a.party_cost).sum();

            days.push(DayPlan {
                date,
                day_number: u32::try_from(index + 1).unwrap_or(u32::MAX),
                activities,
                estimated_cost,
            });

            let done = 20 + (index + 1) * 75 / day_count;
            self.tracker.advance(u8::try_from(done).unwrap_or(95));
        }

        if !unscheduled.is_empty() {
            tracing::info!(
                unscheduled = unscheduled.len(),
                per_day,
                "some activities did not fit the itinerary"
            );
        }

        Ok(StageOutput::Scheduler(SchedulerOutput { days, unscheduled }))
    }
}
