//! Domain intercepts: category-specific extractors that run before general
//! resolution and short-circuit it.
//!
//! An intercept does not consult the catalog. If its target tool is missing,
//! the invocation fails at the transport like any other tool call.

use crate::resolve::ToolInvocation;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

/// A hand-written rule for one request category.
pub trait Intercept: Send + Sync + fmt::Debug {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Whether the rule claims this input.
    fn matches(&self, text: &str) -> bool;

    /// Build the invocation for an input this rule claimed.
    fn extract(&self, text: &str) -> ToolInvocation;

    /// `extract` if `matches`, else nothing.
    fn intercept(&self, text: &str) -> Option<ToolInvocation> {
        self.matches(text).then(|| self.extract(text))
    }
}

// =============================================================================
// Weather
// =============================================================================

/// Words that route a request to the weather tool.
pub const WEATHER_TRIGGERS: &[&str] =
    &["weather", "forecast", "temperature", "rain", "snow", "sunny"];

/// Words that may sit between "weather" and the location.
const LOCATION_PREPOSITIONS: &[&str] = &["in", "at", "for"];

/// Tool and argument names the weather intercept emits.
pub const WEATHER_TOOL: &str = "weather";
pub const WEATHER_LOCATION_ARG: &str = "location";

#[allow(clippy::expect_used)]
fn location_regex() -> &'static Regex {
    static LOCATION: OnceLock<Regex> = OnceLock::new();
    LOCATION.get_or_init(|| {
        Regex::new(r"weather\s*(?:in|at|for)?\s*([a-zA-Z\s]+)")
            .expect("location pattern is a valid literal")
    })
}

/// Routes weather-ish requests to `weather {location}`.
#[derive(Debug, Clone)]
pub struct WeatherIntercept {
    default_location: String,
}

impl WeatherIntercept {
    pub fn new(default_location: impl Into<String>) -> Self {
        Self {
            default_location: default_location.into(),
        }
    }

    /// Location phrase following "weather" (optionally "in"/"at"/"for").
    ///
    /// A bare preposition with nothing after it is not a location.
    pub fn extract_location(text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        location_regex()
            .captures(&lowered)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|loc| !loc.is_empty() && !LOCATION_PREPOSITIONS.contains(&loc.as_str()))
    }
}

impl Intercept for WeatherIntercept {
    fn name(&self) -> &str {
        "weather"
    }

    fn matches(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        WEATHER_TRIGGERS.iter().any(|t| lowered.contains(t))
    }

    fn extract(&self, text: &str) -> ToolInvocation {
        let location =
            Self::extract_location(text).unwrap_or_else(|| self.default_location.clone());
        let mut args = Map::new();
        args.insert(WEATHER_LOCATION_ARG.to_string(), Value::String(location));
        ToolInvocation::new(WEATHER_TOOL, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location_of(text: &str) -> Option<String> {
        WeatherIntercept::new("Nashville")
            .intercept(text)
            .map(|inv| inv.args[WEATHER_LOCATION_ARG].as_str().unwrap().to_string())
    }

    #[test]
    fn test_location_after_preposition() {
        assert_eq!(location_of("What's the weather in Paris"), Some("paris".into()));
        assert_eq!(location_of("weather for new york"), Some("new york".into()));
        assert_eq!(location_of("weather at Lisbon?"), Some("lisbon".into()));
    }

    #[test]
    fn test_default_location_without_phrase() {
        assert_eq!(location_of("is it going to rain"), Some("Nashville".into()));
        assert_eq!(location_of("weather"), Some("Nashville".into()));
        assert_eq!(location_of("weather   "), Some("Nashville".into()));
        assert_eq!(location_of("SUNNY tomorrow?"), Some("Nashville".into()));
        assert_eq!(location_of("weather in"), Some("Nashville".into()));
        assert_eq!(location_of("weather for?"), Some("Nashville".into()));
        assert_eq!(location_of("Weather at "), Some("Nashville".into()));
    }

    #[test]
    fn test_targets_weather_tool() {
        let invocation = WeatherIntercept::new("Oslo").extract("forecast please");
        assert_eq!(invocation.tool_name, "weather");
        assert_eq!(invocation.args[WEATHER_LOCATION_ARG], "Oslo");
    }

    #[test]
    fn test_no_trigger_no_intercept() {
        assert_eq!(location_of("add 5 and 3"), None);
        assert!(!WeatherIntercept::new("Oslo").matches("square root of 9"));
    }
}
