use crate::clients::WeatherSnapshot;
use crate::meal::dto::MealRequest;

/// Allow-listed output languages. Anything else falls back to English.
/// "kanadam" is a legacy client spelling for Kannada that is still accepted.
pub fn target_language(language: &str) -> &'static str {
    match language.trim().to_lowercase().as_str() {
        "tamil" => "Tamil",
        "telugu" => "Telugu",
        "malayalam" => "Malayalam",
        "kannada" | "kanadam" => "Kannada",
        _ => "English",
    }
}

/// Exact JSON structure the model is told to produce. The extraction step
/// keys on these field names, so the translation instruction below pins the
/// keys to English.
const SHAPE_EXAMPLE: &str = r#"{"mealPlan": {"days": [{"day": "Day 1", "meals": [{"type": "Breakfast", "items": [{"name": "Dish name"}], "notes": "Short note"}]}]}}"#;

/// Build the deterministic prompt for one request. Same inputs always yield
/// the same string.
pub fn build_prompt(request: &MealRequest, weather: &WeatherSnapshot, plan_days: u32) -> String {
    let mut prompt = format!(
        "I am feeling {mood}, and I live in {location}. \
         The current weather in {location} is {condition} with a temperature of \
         {temperature}°C, wind speed of {wind} kph, and humidity of {humidity}%. \
         My health goals are {goals} and I follow a {diet} diet. \
         My budget for meals is {budget}. ",
        mood = request.mood,
        location = request.location,
        condition = weather.condition,
        temperature = weather.temperature,
        wind = weather.wind_speed,
        humidity = weather.humidity,
        goals = request.health_goals,
        diet = request.dietary_restrictions,
        budget = request.budget,
    );

    if !request.notes.is_empty() {
        prompt.push_str(&format!("Additional notes from me: {}. ", request.notes));
    }

    prompt.push_str(&format!(
        "Please provide a personalized {plan_days}-day meal plan tailored to my location, \
         supporting my health goals and dietary restrictions. The meals should consider the \
         current weather, be nutritious, and reflect local tastes. Each day should include 3 \
         meals (Breakfast, Lunch, and Dinner), using locally sourced ingredients where \
         possible. Each meal should list multiple food items. Each item should include a \
         'name'. Do not include any imageUrl or external links. Include a short 'notes' field \
         per meal. Ensure meals are easy to prepare and budget-friendly. Format the response \
         strictly as a JSON object using this structure: {SHAPE_EXAMPLE}"
    ));

    let language = target_language(&request.language);
    if language != "English" {
        prompt.push_str(&format!(
            " Translate only the values to {language}, keeping the field keys in English."
        ));
    }

    prompt
}
