//! Analytical annotations attached to a price series
//!
//! Two shapes arrive over the wire under a single `kind` tag: undated
//! support/resistance levels and date-anchored events.

use crate::{colors, DateKey, PayloadError};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// KINDS
// ============================================================================

/// Horizontal level kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelKind {
    Support,
    Resistance,
}

impl LevelKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Support => "Support",
            Self::Resistance => "Resistance",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Support => colors::BULL,
            Self::Resistance => colors::BEAR,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Support => "level-support",
            Self::Resistance => "level-resistance",
        }
    }
}

/// Level conviction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    #[default]
    Moderate,
    Strong,
}

impl Strength {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
        }
    }
}

/// Date-anchored event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    MomentumShift,
    Breakout,
    VolumeSpike,
    MovingAverageCrossover,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MomentumShift => "Momentum Shift",
            Self::Breakout => "Breakout",
            Self::VolumeSpike => "Volume Spike",
            Self::MovingAverageCrossover => "MA Crossover",
        }
    }

    /// Color used when the event carries no direction
    pub fn color(&self) -> &'static str {
        match self {
            Self::MomentumShift => colors::ACCENT,
            Self::Breakout => colors::WARN,
            Self::VolumeSpike => colors::INFO,
            Self::MovingAverageCrossover => colors::ACCENT,
        }
    }
}

/// Event bias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Bullish => colors::BULL,
            Self::Bearish => colors::BEAR,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Bullish => "▲",
            Self::Bearish => "▼",
        }
    }
}

// ============================================================================
// ANNOTATIONS
// ============================================================================

/// Support/resistance level, applies across the whole visible range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelAnnotation {
    pub kind: LevelKind,
    pub price: f64,
    pub strength: Strength,
}

/// Event anchored to one observation by date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAnnotation {
    pub kind: EventKind,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl EventAnnotation {
    /// Marker color: direction first, kind otherwise
    pub fn color(&self) -> &'static str {
        self.direction
            .map(|d| d.color())
            .unwrap_or_else(|| self.kind.color())
    }
}

/// Annotation record as supplied by the analysis service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Annotation {
    Level(LevelAnnotation),
    Event(EventAnnotation),
}

impl Annotation {
    pub fn level(kind: LevelKind, price: f64, strength: Strength) -> Self {
        Self::Level(LevelAnnotation { kind, price, strength })
    }

    pub fn event(kind: EventKind, date: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Event(EventAnnotation {
            kind,
            date: date.into(),
            price: None,
            description: description.into(),
            direction: None,
        })
    }

    /// Builder: attach a price (events only)
    pub fn with_price(mut self, price: f64) -> Self {
        if let Self::Event(event) = &mut self {
            event.price = Some(price);
        }
        self
    }

    /// Builder: attach a direction (events only)
    pub fn with_direction(mut self, direction: Direction) -> Self {
        if let Self::Event(event) = &mut self {
            event.direction = Some(direction);
        }
        self
    }

    pub fn as_level(&self) -> Option<&LevelAnnotation> {
        match self {
            Self::Level(level) => Some(level),
            Self::Event(_) => None,
        }
    }

    pub fn as_event(&self) -> Option<&EventAnnotation> {
        match self {
            Self::Event(event) => Some(event),
            Self::Level(_) => None,
        }
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

/// Every kind on the wire, levels and events share the `kind` field
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum WireKind {
    Support,
    Resistance,
    MomentumShift,
    Breakout,
    VolumeSpike,
    MovingAverageCrossover,
}

/// Flat wire record, validated into [`Annotation`]
#[derive(Debug, Deserialize)]
struct RawAnnotation {
    kind: WireKind,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    strength: Option<Strength>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    direction: Option<Direction>,
}

impl TryFrom<RawAnnotation> for Annotation {
    type Error = PayloadError;

    fn try_from(raw: RawAnnotation) -> Result<Self, Self::Error> {
        let kind = match raw.kind {
            WireKind::Support => return level_from_raw(LevelKind::Support, raw),
            WireKind::Resistance => return level_from_raw(LevelKind::Resistance, raw),
            WireKind::MomentumShift => EventKind::MomentumShift,
            WireKind::Breakout => EventKind::Breakout,
            WireKind::VolumeSpike => EventKind::VolumeSpike,
            WireKind::MovingAverageCrossover => EventKind::MovingAverageCrossover,
        };

        let date = raw.date.ok_or(PayloadError::MissingDate(kind.label()))?;
        if DateKey::parse(&date).is_none() {
            return Err(PayloadError::InvalidDate(date));
        }

        Ok(Self::Event(EventAnnotation {
            kind,
            date,
            // Optional on events, a garbage value is treated as absent
            price: raw.price.filter(|p| p.is_finite()),
            description: raw.description.unwrap_or_default(),
            direction: raw.direction,
        }))
    }
}

impl<'de> Deserialize<'de> for Annotation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawAnnotation::deserialize(deserializer)?;
        Annotation::try_from(raw).map_err(serde::de::Error::custom)
    }
}

fn level_from_raw(kind: LevelKind, raw: RawAnnotation) -> Result<Annotation, PayloadError> {
    let price = raw.price.ok_or(PayloadError::MissingPrice(kind.label()))?;
    if !price.is_finite() {
        return Err(PayloadError::NonFinitePrice(kind.label()));
    }

    Ok(Annotation::Level(LevelAnnotation {
        kind,
        price,
        strength: raw.strength.unwrap_or_default(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_deserialize() {
        let a: Annotation =
            serde_json::from_str(r#"{"kind":"SUPPORT","price":95,"strength":"strong"}"#).unwrap();
        assert_eq!(a, Annotation::level(LevelKind::Support, 95.0, Strength::Strong));
    }

    #[test]
    fn test_level_strength_defaults_to_moderate() {
        let a: Annotation = serde_json::from_str(r#"{"kind":"RESISTANCE","price":120}"#).unwrap();
        assert_eq!(a.as_level().unwrap().strength, Strength::Moderate);
    }

    #[test]
    fn test_level_without_price_rejected() {
        let err = serde_json::from_str::<Annotation>(r#"{"kind":"SUPPORT","strength":"weak"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn test_event_deserialize() {
        let a: Annotation = serde_json::from_str(
            r#"{"kind":"BREAKOUT","date":"2024-01-03","price":112.5,
                "description":"Cleared resistance","direction":"bullish"}"#,
        )
        .unwrap();
        let event = a.as_event().unwrap();
        assert_eq!(event.kind, EventKind::Breakout);
        assert_eq!(event.price, Some(112.5));
        assert_eq!(event.direction, Some(Direction::Bullish));
        assert_eq!(event.color(), colors::BULL);
    }

    #[test]
    fn test_event_requires_parseable_date() {
        let no_date = r#"{"kind":"VOLUME_SPIKE","description":"x"}"#;
        assert!(serde_json::from_str::<Annotation>(no_date).is_err());
        assert!(
            serde_json::from_str::<Annotation>(r#"{"kind":"VOLUME_SPIKE","date":"soon"}"#).is_err()
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let unknown = r#"{"kind":"HEAD_AND_SHOULDERS","price":1}"#;
        assert!(serde_json::from_str::<Annotation>(unknown).is_err());
    }

    #[test]
    fn test_event_color_falls_back_to_kind() {
        let a = Annotation::event(EventKind::VolumeSpike, "2024-01-02", "Heavy volume");
        assert_eq!(a.as_event().unwrap().color(), colors::INFO);
    }

    #[test]
    fn test_builders_ignore_levels() {
        let a = Annotation::level(LevelKind::Resistance, 120.0, Strength::Weak).with_price(1.0);
        assert_eq!(a.as_level().unwrap().price, 120.0);
    }
}
