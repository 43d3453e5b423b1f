//! Planner stage: destination, activities, dining and weather.

use crate::providers::ApiServiceManager;
use crate::stages::base::{StageAgent, StageContext, StageError};
use crate::stages::catalog::{self, interest_score};
use crate::state::tracker::StageTracker;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use tp_protocol::config_models::PlannerConfig;
use tp_protocol::planning_models::FamilyProfile;
use tp_protocol::stage_models::StageKind;
use tp_protocol::travel_models::{Attraction, AttractionQuery, Place, PlaceQuery, WeatherQuery};
use tp_protocol::trip_models::{Activity, ActivitySource, PlannerOutput, StageOutput};

const SUGGESTION_COUNT: usize = 3;

pub struct PlannerStage {
    providers: Arc<ApiServiceManager>,
    config: PlannerConfig,
    tracker: StageTracker,
}

impl PlannerStage {
    pub fn new(providers: Arc<ApiServiceManager>, config: PlannerConfig) -> Self {
        Self {
            providers,
            config,
            tracker: StageTracker::new(StageKind::Planner),
        }
    }
}

/// Free-text place search built from interests and dietary needs.
fn place_search_text(family: &FamilyProfile) -> String {
    let mut terms: Vec<String> = family
        .interests
        .iter()
        .chain(family.dietary_restrictions.iter())
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect();
    terms.push("family friendly".to_string());
    terms.join(" ")
}

fn allowed_for(attraction: &Attraction, youngest: Option<u32>) -> bool {
    if !attraction.family_friendly {
        return false;
    }
    match (attraction.min_age, youngest) {
        (Some(min_age), Some(youngest)) => youngest >= min_age,
        _ => true,
    }
}

fn attraction_activity(attraction: Attraction, interests: &[String]) -> Activity {
    let interest_score = interest_score(
        &[attraction.category.as_str(), attraction.name.as_str()],
        interests,
    );
    Activity {
        id: attraction.id,
        name: attraction.name,
        category: attraction.category,
        location: attraction.location,
        source: ActivitySource::Attraction,
        rating: attraction.rating,
        cost_adult: attraction.price_adult,
        cost_child: attraction.price_child,
        duration_hours: attraction.duration_hours,
        interest_score,
    }
}

fn place_activity(place: Place, location: &str, interests: &[String]) -> Activity {
    let tags: Vec<&str> = place.tags.iter().map(String::as_str).collect();
    let mut texts = vec![place.kind.as_str(), place.name.as_str()];
    texts.extend(tags);
    let interest_score = interest_score(&texts, interests);
    let level = f64::from(place.price_level);
    Activity {
        id: place.id,
        name: place.name,
        category: place.kind,
        location: location.to_string(),
        source: ActivitySource::Place,
        rating: place.rating,
        cost_adult: level * 10.0,
        cost_child: level * 5.0,
        duration_hours: 1.5,
        interest_score,
    }
}

/// Best interest match first, then highest rating, then name.
fn rank(a: &Activity, b: &Activity) -> Ordering {
    b.interest_score
        .cmp(&a.interest_score)
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| a.name.cmp(&b.name))
}

#[async_trait]
impl StageAgent for PlannerStage {
    fn kind(&self) -> StageKind {
        StageKind::Planner
    }

    fn tracker(&self) -> &StageTracker {
        &self.tracker
    }

    async fn run(&self, context: &StageContext) -> Result<StageOutput, StageError> {
        let planning = context.planning();
        let family = &planning.family;
        let requested = planning
            .preferences
            .destination
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let suggestions = catalog::suggest(&family.interests, requested, SUGGESTION_COUNT);
        let destination = match requested {
            Some(requested) => requested.to_string(),
            None => suggestions
                .first()
                .map(|s| s.name.clone())
                .ok_or_else(|| StageError::InvalidInput("no destination available".to_string()))?,
        };
        tracing::info!(%destination, "destination selected");
        self.tracker.advance(10);

        let attractions = self
            .providers
            .search_attractions(AttractionQuery {
                location: destination.clone(),
                limit: self.config.attraction_limit,
            })
            .await
            .into_result()
            .map_err(StageError::Provider)?;
        self.tracker.advance(40);

        let places = self
            .providers
            .search_places(PlaceQuery {
                query: place_search_text(family),
                location: destination.clone(),
                limit: self.config.place_limit,
            })
            .await
            .into_result()
            .map_err(StageError::Provider)?;
        self.tracker.advance(70);

        let weather = match self
            .providers
            .get_current_weather(WeatherQuery {
                location: destination.clone(),
            })
            .await
            .into_result()
        {
            Ok(report) => report,
            Err(error) => {
                tracing::warn!(
                    %destination,
                    %error,
                    "weather lookup failed, continuing without it"
                );
                None
            }
        };
        self.tracker.advance(85);

        let youngest = family.youngest_age();
        let total_attractions = attractions.len();
        let mut activities: Vec<Activity> = attractions
            .into_iter()
            .filter(|a| allowed_for(a, youngest))
            .map(|a| attraction_activity(a, &family.interests))
            .collect();
        let filtered_out = total_attractions - activities.len();

        let (dining, other_places): (Vec<Place>, Vec<Place>) =
            places.into_iter().partition(Place::is_dining);
        activities.extend(
            other_places
                .into_iter()
                .map(|p| place_activity(p, &destination, &family.interests)),
        );
        activities.sort_by(rank);

        tracing::debug!(
            activities = activities.len(),
            filtered_out,
            dining = dining.len(),
            "planner gathered activities"
        );

        Ok(StageOutput::Planner(PlannerOutput {
            destination,
            suggestions,
            activities,
            dining,
            weather,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ApiServiceManager, MockProvider};
    use chrono::NaiveDate;
    use tp_protocol::planning_models::{PlanningContext, TripPreferences};
    use tp_protocol::stage_models::StageState;
    use tp_protocol::travel_models::Capability;

    fn context(destination: Option<&str>, ages: Vec<u32>) -> StageContext {
        StageContext::new(Arc::new(PlanningContext {
            user_id: "user-1".to_string(),
            family: FamilyProfile {
                adults: 2,
                children: u32::try_from(ages.len()).unwrap(),
                ages,
                interests: vec!["theme parks".to_string(), "museums".to_string()],
                dietary_restrictions: vec!["vegetarian".to_string()],
            },
            preferences: TripPreferences {
                destination: destination.map(str::to_string),
                origin: None,
                budget: 5000.0,
                start_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 6, 22).unwrap(),
                trip_type: "vacation".to_string(),
                accommodation_type: "hotel".to_string(),
                transportation: "flight".to_string(),
            },
        }))
    }

    fn planner_output(output: StageOutput) -> PlannerOutput {
        match output {
            StageOutput::Planner(o) => o,
            other => panic!("Unexpected output: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_planner_uses_requested_destination() {
        let stage = PlannerStage::new(
            Arc::new(ApiServiceManager::mock()),
            PlannerConfig::default(),
        );
        let output = planner_output(
            stage
                .execute(&context(Some("Orlando"), vec![8, 5]))
                .await
                .unwrap(),
        );

        assert_eq!(output.destination, "Orlando");
        assert_eq!(output.suggestions[0].name, "Orlando");
        assert!(!output.activities.is_empty());
        assert!(output.weather.is_some());
        assert!(output.dining.iter().all(Place::is_dining));
        assert_eq!(stage.status().state, StageState::Completed);
        assert_eq!(stage.status().progress, 100);
    }

    #[tokio::test]
    async fn test_planner_picks_best_catalog_match() {
        let stage = PlannerStage::new(
            Arc::new(ApiServiceManager::mock()),
            PlannerConfig::default(),
        );
        let output = planner_output(stage.execute(&context(None, vec![])).await.unwrap());
        assert_eq!(output.destination, output.suggestions[0].name);
    }

    #[tokio::test]
    async fn test_planner_ranks_activities() {
        let stage = PlannerStage::new(
            Arc::new(ApiServiceManager::mock()),
            PlannerConfig::default(),
        );
        let output = planner_output(
            stage
                .execute(&context(Some("Orlando"), vec![10]))
                .await
                .unwrap(),
        );
        for pair in output.activities.windows(2) {
            assert_ne!(rank(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn test_age_filter() {
        let attraction = Attraction {
            id: "a1".to_string(),
            name: "Thrill Coaster".to_string(),
            category: "theme parks".to_string(),
            location: "Orlando".to_string(),
            rating: 4.5,
            price_adult: 50.0,
            price_child: 30.0,
            min_age: Some(8),
            duration_hours: 2.0,
            family_friendly: true,
        };
        assert!(!allowed_for(&attraction, Some(5)));
        assert!(allowed_for(&attraction, Some(8)));
        assert!(allowed_for(&attraction, None));
    }

    #[tokio::test]
    async fn test_weather_failure_is_advisory() {
        let providers = ApiServiceManager::builder()
            .with_adapter(Arc::new(MockProvider::success(Capability::Attractions)))
            .with_adapter(Arc::new(MockProvider::success(Capability::Places)))
            .with_adapter(Arc::new(MockProvider::unavailable(Capability::Weather)))
            .build();
        let stage = PlannerStage::new(Arc::new(providers), PlannerConfig::default());

        let output = planner_output(stage.execute(&context(Some("Denver"), vec![])).await.unwrap());
        assert!(output.weather.is_none());
        assert_eq!(stage.status().state, StageState::Completed);
    }

    #[tokio::test]
    async fn test_attraction_failure_fails_stage() {
        let providers = ApiServiceManager::builder()
            .with_adapter(Arc::new(MockProvider::failing(
                Capability::Attractions,
                "attractions backend down",
            )))
            .build();
        let stage = PlannerStage::new(Arc::new(providers), PlannerConfig::default());

        let err = stage.execute(&context(Some("Denver"), vec![])).await.unwrap_err();
        assert_eq!(err, StageError::Provider("attractions backend down".to_string()));

        let status = stage.status();
        assert_eq!(status.state, StageState::Failed);
        assert_eq!(status.error.as_deref(), Some("attractions backend down"));
        assert_eq!(status.progress, 10);
    }

    #[tokio::test]
    async fn test_second_execute_is_rejected() {
        let stage = PlannerStage::new(
            Arc::new(ApiServiceManager::mock()),
            PlannerConfig::default(),
        );
        let ctx = context(Some("Orlando"), vec![]);
        stage.execute(&ctx).await.unwrap();

        let err = stage.execute(&ctx).await.unwrap_err();
        assert!(matches!(err, StageError::AlreadyExecuted { .. }));
        assert_eq!(stage.status().state, StageState::Completed);
        assert!(stage.status().error.is_none());
    }
}
