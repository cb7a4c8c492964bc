/// Shared data structures for the application state
///
/// These structs represent the records that flow between the record store
/// and the UI layer. They serialize with camelCase field names, dates as
/// `YYYY-MM-DD` and times as `HH:MM`.
///
/// Client identity is copied as free text into appointments and sales;
/// renaming a client never rewrites its history.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// A client of the studio
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
}

/// A booked session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub client_name: String,
    pub client_phone: String,
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
    pub notes: String,
}

/// A completed, paid tattoo
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub client_name: String,
    pub client_phone: String,
    pub date: NaiveDate,
    pub tattoo_type: TattooType,
    pub cost: f64,
}

/// An image in the personal gallery
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GalleryImage {
    pub id: String,
    /// Inline `data:<mime>;base64,<payload>` URL
    pub src: String,
    pub name: String,
}

/// Style labels offered when recording a sale
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TattooType {
    #[default]
    #[serde(rename = "Fine Line")]
    FineLine,
    Blackwork,
    Realismo,
    Tradicional,
    Neotradicional,
    #[serde(rename = "Japonés")]
    Japones,
    Acuarela,
    #[serde(rename = "Geométrico")]
    Geometrico,
    Lettering,
    Otro,
}

impl TattooType {
    pub const ALL: [TattooType; 10] = [
        TattooType::FineLine,
        TattooType::Blackwork,
        TattooType::Realismo,
        TattooType::Tradicional,
        TattooType::Neotradicional,
        TattooType::Japones,
        TattooType::Acuarela,
        TattooType::Geometrico,
        TattooType::Lettering,
        TattooType::Otro,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TattooType::FineLine => "Fine Line",
            TattooType::Blackwork => "Blackwork",
            TattooType::Realismo => "Realismo",
            TattooType::Tradicional => "Tradicional",
            TattooType::Neotradicional => "Neotradicional",
            TattooType::Japones => "Japonés",
            TattooType::Acuarela => "Acuarela",
            TattooType::Geometrico => "Geométrico",
            TattooType::Lettering => "Lettering",
            TattooType::Otro => "Otro",
        }
    }
}

impl fmt::Display for TattooType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ========== Drafts ==========

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentDraft {
    pub client_name: String,
    pub client_phone: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: String,
}

impl AppointmentDraft {
    /// Empty draft for `date`, booked 12:00 to 13:00
    pub fn on(date: NaiveDate) -> Self {
        Self {
            client_name: String::new(),
            client_phone: String::new(),
            date,
            start_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap_or_default(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub client_name: String,
    pub client_phone: String,
    pub date: NaiveDate,
    pub tattoo_type: TattooType,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageDraft {
    pub src: String,
    pub name: String,
}

// ========== Validation ==========

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

pub(crate) fn require_positive_cost(cost: f64) -> Result<(), ValidationError> {
    if !cost.is_finite() || cost <= 0.0 {
        return Err(ValidationError::NonPositiveCost(cost));
    }
    Ok(())
}

/// Parse a form date (`YYYY-MM-DD`)
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// Parse a form time (`HH:MM`, seconds tolerated)
pub fn parse_time(input: &str) -> Result<NaiveTime, ValidationError> {
    let input_trimmed = input.trim();
    NaiveTime::parse_from_str(input_trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input_trimmed, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime(input.to_string()))
}

/// Parse a form cost; accepts `1500`, `1,500.50` and a leading `$`
pub fn parse_cost(input: &str) -> Result<f64, ValidationError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let cost: f64 = cleaned
        .parse()
        .map_err(|_| ValidationError::InvalidCost(input.to_string()))?;
    require_positive_cost(cost)?;
    Ok(cost)
}

/// `HH:MM` serde format for `NaiveTime`
mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_time(&text).map_err(serde::de::Error::custom)
    }
}
