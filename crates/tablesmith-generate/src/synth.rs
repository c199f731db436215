use chrono::{Duration, NaiveDate};
use fake::Fake;
use fake::faker::address::en::{CityName, CountryName, StateAbbr};
use fake::faker::company::en::CompanyName;
use fake::faker::currency::en::CurrencyCode;
use fake::faker::job::en::Title as JobTitle;
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rand::{Rng, RngCore};
use rand::seq::IndexedRandom;

use tablesmith_core::Value;

use crate::errors::GenerationError;

const WEEKDAYS: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTHS: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn pick(options: &[&str], rng: &mut dyn RngCore) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Synthesize one value for a provider tag.
pub fn synthesize(tag: &str, rng: &mut dyn RngCore) -> Result<Value, GenerationError> {
    let value = match tag {
        "city" => Value::Text(CityName().fake_with_rng(rng)),
        "state_abbr" => Value::Text(StateAbbr().fake_with_rng(rng)),
        "country" => Value::Text(CountryName().fake_with_rng(rng)),
        "company" => Value::Text(CompanyName().fake_with_rng(rng)),
        "currency_code" => Value::Text(CurrencyCode().fake_with_rng(rng)),
        "weekday" => Value::Text(pick(WEEKDAYS, rng)),
        "month" => Value::Text(pick(MONTHS, rng)),
        "boolean" => Value::Bool(rng.random_bool(0.5)),
        "int_tiny" => Value::Int(rng.random_range(0..=9)),
        "int_small" => Value::Int(rng.random_range(0..=999)),
        "int_large" => Value::Int(rng.random_range(0..=999_999)),
        "year" => Value::Int(rng.random_range(1970..=2030)),
        "float_unit" => Value::Float(rng.random::<f64>()),
        "price" => Value::Float(round2(rng.random_range(0.0..10_000.0))),
        "percent" => Value::Float(round2(rng.random_range(0.0..100.0))),
        "first_name" => Value::Text(FirstName().fake_with_rng(rng)),
        "last_name" => Value::Text(LastName().fake_with_rng(rng)),
        "job_title" => Value::Text(JobTitle().fake_with_rng(rng)),
        "word" => Value::Text(Word().fake_with_rng(rng)),
        "sentence" => Value::Text(Sentence(4..10).fake_with_rng(rng)),
        "phone" => Value::Text(PhoneNumber().fake_with_rng(rng)),
        "date" => {
            let offset: i64 = rng.random_range(0..=365);
            Value::Date(base_date() + Duration::days(offset))
        }
        other => return Err(GenerationError::UnknownProvider(other.to_string())),
    };
    Ok(value)
}
