// O painel manda números às vezes como string ("3", "12.50").
// Estes helpers são usados com `#[serde(deserialize_with = ...)]`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn to_i64<E: de::Error>(self) -> Result<Option<i64>, E> {
        match self {
            Numeric::Int(value) => Ok(Some(value)),
            Numeric::Float(value) if value.fract() == 0.0 && value.is_finite() => Ok(Some(value as i64)),
            Numeric::Float(value) => Err(E::custom(format!("esperado inteiro, recebido {}", value))),
            Numeric::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                if let Ok(value) = text.parse::<i64>() {
                    return Ok(Some(value));
                }
                match text.parse::<f64>() {
                    Ok(value) if value.fract() == 0.0 && value.is_finite() => Ok(Some(value as i64)),
                    _ => Err(E::custom(format!("esperado inteiro, recebido \"{}\"", text))),
                }
            }
        }
    }

    fn to_decimal<E: de::Error>(self) -> Result<Option<Decimal>, E> {
        match self {
            Numeric::Int(value) => Ok(Some(Decimal::from(value))),
            Numeric::Float(value) => Decimal::try_from(value)
                .map(Some)
                .map_err(|_| E::custom(format!("número inválido: {}", value))),
            Numeric::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                Decimal::from_str(text)
                    .map(Some)
                    .map_err(|_| E::custom(format!("número inválido: \"{}\"", text)))
            }
        }
    }
}

fn narrow<E: de::Error>(value: i64) -> Result<i32, E> {
    i32::try_from(value).map_err(|_| E::custom(format!("número fora do intervalo: {}", value)))
}

pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Numeric::deserialize(deserializer)?
        .to_i64()?
        .ok_or_else(|| de::Error::custom("número obrigatório"))
}

pub fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        Some(value) => value.to_i64(),
        None => Ok(None),
    }
}

pub fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    narrow(lenient_i64(deserializer)?)
}

pub fn lenient_opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_i64(deserializer)?.map(narrow).transpose()
}

pub fn lenient_opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        Some(value) => value.to_decimal(),
        None => Ok(None),
    }
}
