use super::{Request, string_or_number};
use crate::macros::setter;
use crate::signing::Parameters;
use chrono::serde::{ts_seconds, ts_seconds_option};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Display;

const ACTION_GET_MEASURES: &str = "getmeas";

// Common

/// Kind of body measurement, as coded by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum MeasureType {
    Weight,
    Height,
    FatFreeMass,
    FatRatio,
    FatMassWeight,
    DiastolicBloodPressure,
    SystolicBloodPressure,
    HeartPulse,
    Temperature,
    Spo2,
    BodyTemperature,
    SkinTemperature,
    MuscleMass,
    Hydration,
    BoneMass,
    PulseWaveVelocity,
    Other(u32),
}

impl MeasureType {
    pub fn code(self) -> u32 {
        self.into()
    }
}

impl From<u32> for MeasureType {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::Weight,
            4 => Self::Height,
            5 => Self::FatFreeMass,
            6 => Self::FatRatio,
            8 => Self::FatMassWeight,
            9 => Self::DiastolicBloodPressure,
            10 => Self::SystolicBloodPressure,
            11 => Self::HeartPulse,
            12 => Self::Temperature,
            54 => Self::Spo2,
            71 => Self::BodyTemperature,
            73 => Self::SkinTemperature,
            76 => Self::MuscleMass,
            77 => Self::Hydration,
            88 => Self::BoneMass,
            91 => Self::PulseWaveVelocity,
            other => Self::Other(other),
        }
    }
}

impl From<MeasureType> for u32 {
    fn from(value: MeasureType) -> Self {
        match value {
            MeasureType::Weight => 1,
            MeasureType::Height => 4,
            MeasureType::FatFreeMass => 5,
            MeasureType::FatRatio => 6,
            MeasureType::FatMassWeight => 8,
            MeasureType::DiastolicBloodPressure => 9,
            MeasureType::SystolicBloodPressure => 10,
            MeasureType::HeartPulse => 11,
            MeasureType::Temperature => 12,
            MeasureType::Spo2 => 54,
            MeasureType::BodyTemperature => 71,
            MeasureType::SkinTemperature => 73,
            MeasureType::MuscleMass => 76,
            MeasureType::Hydration => 77,
            MeasureType::BoneMass => 88,
            MeasureType::PulseWaveVelocity => 91,
            MeasureType::Other(code) => code,
        }
    }
}

impl Display for MeasureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weight => f.write_str("weight (kg)"),
            Self::Height => f.write_str("height (m)"),
            Self::FatFreeMass => f.write_str("fat free mass (kg)"),
            Self::FatRatio => f.write_str("fat ratio (%)"),
            Self::FatMassWeight => f.write_str("fat mass weight (kg)"),
            Self::DiastolicBloodPressure => f.write_str("diastolic blood pressure (mmHg)"),
            Self::SystolicBloodPressure => f.write_str("systolic blood pressure (mmHg)"),
            Self::HeartPulse => f.write_str("heart pulse (bpm)"),
            Self::Temperature => f.write_str("temperature (°C)"),
            Self::Spo2 => f.write_str("SpO2 (%)"),
            Self::BodyTemperature => f.write_str("body temperature (°C)"),
            Self::SkinTemperature => f.write_str("skin temperature (°C)"),
            Self::MuscleMass => f.write_str("muscle mass (kg)"),
            Self::Hydration => f.write_str("hydration (kg)"),
            Self::BoneMass => f.write_str("bone mass (kg)"),
            Self::PulseWaveVelocity => f.write_str("pulse wave velocity (m/s)"),
            Self::Other(code) => write!(f, "type {}", code),
        }
    }
}

/// Whether a group holds real readings or user objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Category {
    Real,
    Goal,
    Other(u32),
}

impl From<u32> for Category {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::Real,
            2 => Self::Goal,
            other => Self::Other(other),
        }
    }
}

impl From<Category> for u32 {
    fn from(value: Category) -> Self {
        match value {
            Category::Real => 1,
            Category::Goal => 2,
            Category::Other(code) => code,
        }
    }
}

/// One reading. The actual quantity is `value * 10^unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub value: i64,
    pub unit: i32,
    #[serde(rename = "type")]
    pub measure_type: MeasureType,
}

impl Measure {
    pub fn scaled_value(&self) -> f64 {
        self.value as f64 * 10f64.powi(self.unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureGroup {
    #[serde(rename = "grpid", deserialize_with = "string_or_number")]
    pub group_id: String,
    #[serde(rename = "attrib", default, deserialize_with = "string_or_number")]
    pub attribution: String,
    #[serde(with = "ts_seconds")]
    pub date: DateTime<Utc>,
    pub category: Category,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

// Requests

/// Query for body measurements of one user.
///
/// Unset fields are left out of the query string; the service applies its own
/// defaults. Nothing is validated locally.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MeasureQuery {
    user_id: Option<u64>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    last_update: Option<DateTime<Utc>>,
    measure_type: Option<MeasureType>,
    category: Option<Category>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl MeasureQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Readings of `measure_type` for `user_id` taken in the `days` days up to `now`.
    pub fn last_days(
        user_id: u64,
        measure_type: MeasureType,
        days: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new()
            .user_id(user_id)
            .measure_type(measure_type)
            .start_date(now - Duration::days(days))
            .end_date(now)
    }

    setter!(opt user_id: u64);
    setter!(opt start_date: DateTime<Utc>);
    setter!(opt end_date: DateTime<Utc>);
    setter!(opt last_update: DateTime<Utc>);
    setter!(opt measure_type: MeasureType);
    setter!(opt category: Category);
    setter!(opt limit: u32);
    setter!(opt offset: u32);
}

impl Request for MeasureQuery {
    type Response = MeasureResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/measure".into()
    }

    fn parameters(&self) -> Parameters {
        let mut parameters = Parameters::new().with("action", ACTION_GET_MEASURES);
        if let Some(user_id) = self.user_id {
            parameters.push("userid", user_id);
        }
        if let Some(start_date) = self.start_date {
            parameters.push("startdate", start_date.timestamp());
        }
        if let Some(end_date) = self.end_date {
            parameters.push("enddate", end_date.timestamp());
        }
        if let Some(last_update) = self.last_update {
            parameters.push("lastupdate", last_update.timestamp());
        }
        if let Some(measure_type) = self.measure_type {
            parameters.push("meastype", measure_type.code());
        }
        if let Some(category) = self.category {
            parameters.push("category", u32::from(category));
        }
        if let Some(limit) = self.limit {
            parameters.push("limit", limit);
        }
        if let Some(offset) = self.offset {
            parameters.push("offset", offset);
        }
        parameters
    }
}

// Responses

/// Decoded body of a measurement call.
///
/// Every field but `status` may be missing: error replies only carry a status
/// and a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureResponse {
    #[serde(rename = "updatetime", default, with = "ts_seconds_option")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub more: u32,
    #[serde(rename = "measuregrps", default)]
    pub measure_groups: Vec<MeasureGroup>,
    pub status: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub message: String,
}

impl MeasureResponse {
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// The service has more groups past `offset`.
    pub fn has_more(&self) -> bool {
        self.more != 0
    }

    pub fn measures(&self) -> impl Iterator<Item = (&MeasureGroup, &Measure)> {
        self.measure_groups
            .iter()
            .flat_map(|group| group.measures.iter().map(move |measure| (group, measure)))
    }
}
