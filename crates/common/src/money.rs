//! Amounts are stored as integer cents and exchanged as dollars.

pub fn to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

pub fn to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// `#[serde(serialize_with = "common::money::as_dollars")]` on a cents field.
pub fn as_dollars<S: serde::Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(to_dollars(*cents))
}
