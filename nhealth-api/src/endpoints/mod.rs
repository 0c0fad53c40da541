pub mod measure;

use crate::signing::Parameters;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;

/// A read operation against the data API.
///
/// Kept crate-private: the supported operations are fixed by this crate.
pub(crate) trait Request {
    type Response: DeserializeOwned;

    fn endpoint(&self) -> Cow<'_, str>;

    fn parameters(&self) -> Parameters;
}

/// Identifiers the service sends either as JSON numbers or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(i64),
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
