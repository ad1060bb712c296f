//! Normalization of raw model output into canonical flows
//!
//! The hosted model returns loosely typed JSON. Everything that becomes a
//! [`Flow`] passes through [`normalize_flow`], which assigns ids and order,
//! synthesizes links, coerces numeric fields and enforces stop-count bounds.
//! Normalization is all or nothing per flow: a single unusable stop rejects
//! the whole flow rather than producing a partial one.

use crate::error::KelpError;
use crate::flow::{Coordinates, Flow, FlowStop};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Duration assumed for a stop whose duration is missing or not positive
pub const DEFAULT_STOP_MINUTES: u32 = 60;

/// Longest duration a single stop can claim; larger values are clamped
pub const MAX_STOP_MINUTES: u32 = 24 * 60;

/// Highest rating a stop can carry
pub const MAX_RATING: f64 = 5.0;

const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/400/300";
const YELP_SEARCH_URL: &str = "https://www.yelp.com/search";

/// How many stops a normalized flow may have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopBounds {
    pub min: usize,
    /// `None` means unbounded
    pub max: Option<usize>,
}

impl StopBounds {
    /// Bounds for a replacement flow proposed during refinement
    pub const REFINEMENT: StopBounds = StopBounds { min: 1, max: None };

    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self {
            min: min.max(1),
            max,
        }
    }

    fn check(&self, count: usize) -> Result<(), KelpError> {
        if count < self.min {
            return Err(KelpError::Normalization(format!(
                "expected at least {} stops, found {}",
                self.min, count
            )));
        }
        if let Some(max) = self.max {
            if count > max {
                return Err(KelpError::Normalization(format!(
                    "expected at most {} stops, found {}",
                    max, count
                )));
            }
        }
        Ok(())
    }
}

/// Position-keyed synthesis of the presentation fields the model never supplies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSynthesizer {
    location: Option<String>,
    image_offset: usize,
}

impl LinkSynthesizer {
    /// Image offset used for freshly generated flows
    pub const GENERATION_IMAGE_OFFSET: usize = 0;
    /// Image offset used for refinement replacements, so a swapped plan shows new pictures
    pub const REFINEMENT_IMAGE_OFFSET: usize = 10;

    /// Creates a synthesizer; a blank location is treated as absent
    pub fn new(location: Option<&str>, image_offset: usize) -> Self {
        let location = location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        Self {
            location,
            image_offset,
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Deterministic placeholder image for the stop at `position` (0-based)
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::flow::LinkSynthesizer;
    ///
    /// let links = LinkSynthesizer::new(None, 10);
    /// assert_eq!(links.image_url(2), "https://picsum.photos/400/300?random=12");
    /// ```
    pub fn image_url(&self, position: usize) -> String {
        format!(
            "{}?random={}",
            PLACEHOLDER_IMAGE_URL,
            position + self.image_offset
        )
    }

    /// Business search link, scoped to the location when one is known
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::flow::LinkSynthesizer;
    ///
    /// let links = LinkSynthesizer::new(Some("Austin, TX"), 0);
    /// assert_eq!(
    ///     links.yelp_url("Café Java"),
    ///     "https://www.yelp.com/search?find_desc=Caf%C3%A9+Java&find_loc=Austin%2C+TX"
    /// );
    /// ```
    pub fn yelp_url(&self, business_name: &str) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("find_desc", business_name);
        if let Some(location) = &self.location {
            query.append_pair("find_loc", location);
        }
        format!("{}?{}", YELP_SEARCH_URL, query.finish())
    }
}

/// Values used when the model leaves the flow-level fields out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowDefaults {
    pub title: String,
    pub budget_estimate: String,
}

impl FlowDefaults {
    pub fn new(title: impl Into<String>, budget_estimate: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            budget_estimate: budget_estimate.into(),
        }
    }

    /// Refinements keep the current flow's title and budget unless renamed
    pub fn from_flow(flow: &Flow) -> Self {
        Self::new(flow.title.clone(), flow.total_budget_estimate.clone())
    }
}

/// Normalizes a raw flow object
///
/// # Arguments
///
/// * `raw` - The flow object as returned by the model
/// * `defaults` - Title and budget used when the model omits them
/// * `links` - Image and search link synthesis strategy
/// * `bounds` - Allowed stop count
///
/// # Errors
///
/// Returns `KelpError::Normalization` if `raw` is not an object, has no
/// `stops` array, or any stop is unusable
pub fn normalize_flow(
    raw: &Value,
    defaults: &FlowDefaults,
    links: &LinkSynthesizer,
    bounds: StopBounds,
) -> Result<Flow, KelpError> {
    let object = raw.as_object().ok_or_else(|| {
        KelpError::Normalization(format!("expected a flow object, found {}", kind(raw)))
    })?;

    let raw_stops = object
        .get("stops")
        .ok_or_else(|| KelpError::Normalization("flow has no stops array".to_string()))?;
    let stops = normalize_stops(raw_stops, links, bounds)?;

    Ok(Flow {
        id: format!("flow-{}", Uuid::new_v4()),
        title: text_field(object, "title").unwrap_or_else(|| defaults.title.clone()),
        total_duration: total_duration(&stops),
        total_budget_estimate: text_field(object, "totalBudgetEstimate")
            .unwrap_or_else(|| defaults.budget_estimate.clone()),
        stops,
        location: links.location().map(str::to_string),
    })
}

/// Normalizes a raw stops array into ordered stops
///
/// Stop order comes from array position; any `order`, `id` or link fields in
/// the input are ignored.
///
/// `businessName` is the one required stop field. Every other field is
/// coerced: missing or invalid numbers take their defaults, durations are
/// clamped to [`MAX_STOP_MINUTES`] and missing text becomes empty.
///
/// # Errors
///
/// Returns `KelpError::Normalization` if `raw` is not an array, its length is
/// outside `bounds`, or an element is not an object with a business name
pub fn normalize_stops(
    raw: &Value,
    links: &LinkSynthesizer,
    bounds: StopBounds,
) -> Result<Vec<FlowStop>, KelpError> {
    let items = raw.as_array().ok_or_else(|| {
        KelpError::Normalization(format!("expected stops to be an array, found {}", kind(raw)))
    })?;
    bounds.check(items.len())?;

    items
        .iter()
        .enumerate()
        .map(|(position, item)| normalize_stop(position, item, links))
        .collect()
}

/// Sum of stop durations, counting unusable durations as the default
///
/// Saturates at `u32::MAX` instead of overflowing.
pub fn total_duration(stops: &[FlowStop]) -> u32 {
    stops
        .iter()
        .map(|stop| {
            if stop.duration_minutes == 0 {
                DEFAULT_STOP_MINUTES
            } else {
                stop.duration_minutes
            }
        })
        .fold(0u32, u32::saturating_add)
}

fn normalize_stop(
    position: usize,
    item: &Value,
    links: &LinkSynthesizer,
) -> Result<FlowStop, KelpError> {
    let object = item.as_object().ok_or_else(|| {
        KelpError::Normalization(format!(
            "stop {} is not an object, found {}",
            position + 1,
            kind(item)
        ))
    })?;

    let business_name = text_field(object, "businessName").ok_or_else(|| {
        KelpError::Normalization(format!("stop {} has no businessName", position + 1))
    })?;

    let rating = number(object.get("rating"))
        .map(|r| r.clamp(0.0, MAX_RATING))
        .unwrap_or(0.0);
    let review_count = number(object.get("reviewCount"))
        .filter(|n| *n >= 0.0)
        .map(|n| n.round().min(f64::from(u32::MAX)) as u32)
        .unwrap_or(0);
    let duration_minutes = number(object.get("durationMinutes"))
        .map(f64::round)
        .filter(|m| *m >= 1.0)
        .map(|m| m.min(f64::from(MAX_STOP_MINUTES)) as u32)
        .unwrap_or(DEFAULT_STOP_MINUTES);

    Ok(FlowStop {
        id: format!("stop-{}", Uuid::new_v4()),
        order: (position + 1) as u32,
        image_url: links.image_url(position),
        yelp_url: links.yelp_url(&business_name),
        business_name,
        category: text_field(object, "category").unwrap_or_default(),
        rating,
        review_count,
        price: text_field(object, "price").unwrap_or_default(),
        reason: text_field(object, "reason").unwrap_or_default(),
        duration_minutes,
        coordinates: coordinates(object.get("coordinates")),
    })
}

/// Non-blank text, accepting numbers written where text was expected
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite number, accepting numeric strings such as `"4.5"`
fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn coordinates(value: Option<&Value>) -> Option<Coordinates> {
    let object = value?.as_object()?;
    Some(Coordinates {
        latitude: number(object.get("latitude"))?,
        longitude: number(object.get("longitude"))?,
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
