use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::clients::images;
use crate::error::{GenerationError, PlanError};
use crate::meal::dto::{MealPlanDocument, MealPlanResponse, MealRequest};
use crate::meal::extract::extract_plan;
use crate::meal::prompt::build_prompt;
use crate::state::AppState;

/// Cap on concurrent image lookups per request, so one large plan cannot
/// hammer the image provider.
const IMAGE_LOOKUP_PERMITS: usize = 4;

/// Run one request through the pipeline: weather (must succeed), generation
/// (must succeed and validate), image enrichment (best effort).
pub async fn plan_meals(
    state: &AppState,
    request: &MealRequest,
) -> Result<MealPlanResponse, PlanError> {
    let weather = state
        .weather
        .current(request.latitude, request.longitude)
        .await
        .map_err(PlanError::Weather)?;

    let prompt = build_prompt(request, &weather, state.config.plan_days);
    let reply = state
        .genai
        .generate(&prompt)
        .await
        .map_err(GenerationError::from)?;
    let mut document = extract_plan(&reply)?;

    enrich_images(state, &mut document).await;

    Ok(MealPlanResponse {
        meal: document,
        weather,
    })
}

/// Fan out one lookup per distinct item name, join, write URLs back to every
/// occurrence. Lookup failures leave the URL empty and never abort the plan.
async fn enrich_images(state: &AppState, document: &mut MealPlanDocument) {
    let mut names: Vec<String> = Vec::new();
    for day in &document.meal_plan.days {
        for meal in &day.meals {
            for item in &meal.items {
                if !item.name.is_empty() && !names.iter().any(|n| n == &item.name) {
                    names.push(item.name.clone());
                }
            }
        }
    }
    if names.is_empty() {
        return;
    }
    debug!(distinct_items = names.len(), "resolving item photos");

    let semaphore = Arc::new(Semaphore::new(IMAGE_LOOKUP_PERMITS));
    let mut lookups = JoinSet::new();
    for name in names {
        let search = Arc::clone(&state.images);
        let semaphore = Arc::clone(&semaphore);
        lookups.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let url = images::resolve(search.as_ref(), &name).await;
            (name, url)
        });
    }

    let mut resolved: HashMap<String, String> = HashMap::new();
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((name, url)) => {
                resolved.insert(name, url);
            }
            Err(e) => warn!(error = %e, "image lookup task failed to join"),
        }
    }

    for day in &mut document.meal_plan.days {
        for meal in &mut day.meals {
            for item in &mut meal.items {
                if let Some(url) = resolved.get(&item.name) {
                    item.image_url = url.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::clients::{ImageSearch, PhotoCandidate, TextModel, WeatherApi, WeatherSnapshot};
    use crate::error::UpstreamError;
    use crate::state::test_support::state_with;

    // --- scripted upstreams ---

    struct FixedWeather {
        snapshot: WeatherSnapshot,
        calls: AtomicUsize,
    }

    impl FixedWeather {
        fn sunny_chennai() -> Self {
            Self {
                snapshot: WeatherSnapshot {
                    temperature: 31.0,
                    condition: "Sunny".into(),
                    wind_speed: 10.0,
                    humidity: 70,
                    precipitation: 0.0,
                },
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WeatherApi for FixedWeather {
        async fn current(&self, _lat: f64, _lon: f64) -> Result<WeatherSnapshot, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.snapshot.clone())
        }
    }

    struct FailingWeather;

    #[async_trait]
    impl WeatherApi for FailingWeather {
        async fn current(&self, _lat: f64, _lon: f64) -> Result<WeatherSnapshot, UpstreamError> {
            Err(UpstreamError::new("weather", anyhow::anyhow!("timed out")))
        }
    }

    struct FixedModel {
        reply: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TextModel for FixedModel {
        async fn generate(&self, _prompt: &str) -> Result<String, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    struct FixedImages {
        url: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ImageSearch for FixedImages {
        async fn search(&self, _name: &str) -> Result<Vec<PhotoCandidate>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![PhotoCandidate {
                width: 1920,
                height: 1080,
                url: self.url.clone(),
            }])
        }
    }

    struct FailingImages {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ImageSearch for FailingImages {
        async fn search(&self, _name: &str) -> Result<Vec<PhotoCandidate>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(UpstreamError::new("images", anyhow::anyhow!("HTTP 500")))
        }
    }

    // --- fixtures ---

    fn chennai_request() -> MealRequest {
        MealRequest {
            mood: "tired".into(),
            location: "Chennai".into(),
            health_goals: "weight loss".into(),
            dietary_restrictions: "vegetarian".into(),
            latitude: 13.08,
            longitude: 80.27,
            language: "tamil".into(),
            budget: "low".into(),
            notes: String::new(),
        }
    }

    fn plan_json(days: usize) -> String {
        let day_blocks: Vec<String> = (1..=days)
            .map(|d| {
                format!(
                    r#"{{
                        "day": "Day {d}",
                        "meals": [
                            {{ "type": "Breakfast", "items": [ {{ "name": "Idli {d}" }} ], "notes": "light" }},
                            {{ "type": "Lunch", "items": [ {{ "name": "Sambar rice" }}, {{ "name": "Curd" }} ], "notes": "filling" }},
                            {{ "type": "Dinner", "items": [ {{ "name": "Dosa {d}" }} ], "notes": "easy" }}
                        ]
                    }}"#
                )
            })
            .collect();
        format!(r#"{{ "mealPlan": {{ "days": [ {} ] }} }}"#, day_blocks.join(","))
    }

    #[tokio::test]
    async fn weather_failure_stops_before_generation_and_images() {
        let model_calls = Arc::new(AtomicUsize::new(0));
        let image_calls = Arc::new(AtomicUsize::new(0));
        let state = state_with(
            Arc::new(FailingWeather),
            Arc::new(FixedModel {
                reply: plan_json(3),
                calls: Arc::clone(&model_calls),
            }),
            Arc::new(FixedImages {
                url: "https://img/x".into(),
                calls: Arc::clone(&image_calls),
            }),
        );

        let err = plan_meals(&state, &chennai_request()).await.unwrap_err();
        assert!(matches!(err, PlanError::Weather(_)));
        assert_eq!(model_calls.load(Ordering::SeqCst), 0);
        assert_eq!(image_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unstructured_reply_fails_generation_without_image_lookups() {
        let image_calls = Arc::new(AtomicUsize::new(0));
        let state = state_with(
            Arc::new(FixedWeather::sunny_chennai()),
            Arc::new(FixedModel {
                reply: "I would rather talk about the cricket.".into(),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Arc::new(FixedImages {
                url: "https://img/x".into(),
                calls: Arc::clone(&image_calls),
            }),
        );

        let err = plan_meals(&state, &chennai_request()).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::Generation(GenerationError::NoStructuredOutput { .. })
        ));
        assert_eq!(image_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn schema_invalid_reply_is_a_hard_failure() {
        let state = state_with(
            Arc::new(FixedWeather::sunny_chennai()),
            Arc::new(FixedModel {
                reply: r#"{ "mealPlan": { "days": [ { "meals": [ { "type": "Lunch" } ] } ] } }"#
                    .into(),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Arc::new(FixedImages {
                url: "https://img/x".into(),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );

        let err = plan_meals(&state, &chennai_request()).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::Generation(GenerationError::SchemaMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn image_provider_outage_never_aborts_the_plan() {
        let image_calls = Arc::new(AtomicUsize::new(0));
        let state = state_with(
            Arc::new(FixedWeather::sunny_chennai()),
            Arc::new(FixedModel {
                reply: plan_json(3),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Arc::new(FailingImages {
                calls: Arc::clone(&image_calls),
            }),
        );

        let response = plan_meals(&state, &chennai_request())
            .await
            .expect("plan survives image outage");
        assert_eq!(response.meal.meal_plan.days.len(), 3);
        for day in &response.meal.meal_plan.days {
            for meal in &day.meals {
                for item in &meal.items {
                    assert_eq!(item.image_url, "");
                }
            }
        }
        assert!(image_calls.load(Ordering::SeqCst) > 0);
    }

    #[tokio::test]
    async fn duplicate_item_names_are_looked_up_once() {
        let image_calls = Arc::new(AtomicUsize::new(0));
        let reply = r#"{ "mealPlan": { "days": [ {
            "meals": [
                { "type": "Breakfast", "items": [ { "name": "Rice" }, { "name": "Rice" } ] },
                { "type": "Lunch", "items": [ { "name": "Rice" }, { "name": "Dal" } ] }
            ]
        } ] } }"#;
        let state = state_with(
            Arc::new(FixedWeather::sunny_chennai()),
            Arc::new(FixedModel {
                reply: reply.into(),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Arc::new(FixedImages {
                url: "https://img/rice".into(),
                calls: Arc::clone(&image_calls),
            }),
        );

        let response = plan_meals(&state, &chennai_request()).await.expect("plan");
        // Rice and Dal: two distinct names, four item slots, all filled.
        assert_eq!(image_calls.load(Ordering::SeqCst), 2);
        for day in &response.meal.meal_plan.days {
            for meal in &day.meals {
                for item in &meal.items {
                    assert_eq!(item.image_url, "https://img/rice");
                }
            }
        }
    }

    #[tokio::test]
    async fn identical_inputs_produce_identical_output() {
        let state = state_with(
            Arc::new(FixedWeather::sunny_chennai()),
            Arc::new(FixedModel {
                reply: plan_json(3),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Arc::new(FixedImages {
                url: "https://img/x".into(),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );

        let first = plan_meals(&state, &chennai_request()).await.expect("first");
        let second = plan_meals(&state, &chennai_request()).await.expect("second");
        assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
    }

    #[tokio::test]
    async fn chennai_end_to_end_scenario() {
        let state = state_with(
            Arc::new(FixedWeather::sunny_chennai()),
            Arc::new(FixedModel {
                reply: format!("```json\n{}\n```", plan_json(5)),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Arc::new(FixedImages {
                url: "https://img/dish".into(),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );

        let response = plan_meals(&state, &chennai_request()).await.expect("plan");
        assert_eq!(response.meal.meal_plan.days.len(), 5);
        assert_eq!(response.weather.temperature, 31.0);
        for day in &response.meal.meal_plan.days {
            assert_eq!(day.meals.len(), 3);
            for meal in &day.meals {
                for item in &meal.items {
                    assert_eq!(item.image_url, "https://img/dish");
                }
            }
        }
    }
}
