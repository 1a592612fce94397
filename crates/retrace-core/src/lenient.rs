//! Forgiving field deserializers for persisted replay JSON.
//!
//! Replays written by other clients can carry `null` where a number was
//! expected (non-finite floats serialize that way), numeric strings, or a
//! fractional value in an integer field. Each helper here accepts any JSON
//! value and coerces it: numbers pass through, `true` is one, numeric
//! strings are parsed, and everything else (including NaN and infinities)
//! becomes zero. Use them with `#[serde(deserialize_with = "...")]`.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Num(f64),
    Bool(bool),
    Text(String),
    Null,
    Other(IgnoredAny),
}

impl Loose {
    fn to_f64(&self) -> f64 {
        let value = match self {
            Self::Num(v) => *v,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Text(s) => s.trim().parse().unwrap_or(0.0),
            Self::Null | Self::Other(_) => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    fn truthy(&self) -> bool {
        match self {
            Self::Num(v) => *v != 0.0 && !v.is_nan(),
            Self::Bool(b) => *b,
            Self::Text(s) => !s.is_empty(),
            Self::Null => false,
            Self::Other(_) => true,
        }
    }
}

/// A number coerced by the rules above.
#[derive(Clone, Copy, Debug)]
struct LooseF64(f64);

impl<'de> Deserialize<'de> for LooseF64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Loose::deserialize(deserializer).map(|loose| Self(loose.to_f64()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseList {
    List(Vec<LooseF64>),
    Other(IgnoredAny),
}

/// A finite `f64`, or zero.
pub fn f64_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    LooseF64::deserialize(deserializer).map(|v| v.0)
}

/// An array of finite `f64`s with bad elements zeroed. A non-array
/// value yields an empty vector.
pub fn f64_vec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    Ok(match LooseList::deserialize(deserializer)? {
        LooseList::List(values) => values.into_iter().map(|v| v.0).collect(),
        LooseList::Other(_) => Vec::new(),
    })
}

/// A signed integer, truncating any fraction. Out-of-range values
/// saturate.
pub fn i64_truncated<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    f64_or_zero(deserializer).map(|v| v.trunc() as i64)
}

/// An unsigned integer, truncating any fraction. Negative values become
/// zero and values too large for `T` become `T::default()`.
pub fn unsigned<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + Default,
{
    let value = f64_or_zero(deserializer)?.trunc().max(0.0) as u64;
    Ok(T::try_from(value).unwrap_or_default())
}

/// Script-style truthiness: `false`, `0`, NaN, `""` and `null` are false;
/// arrays and objects are true.
pub fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Loose::deserialize(deserializer).map(|loose| loose.truthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Fields {
        #[serde(deserialize_with = "f64_or_zero")]
        x: f64,
        #[serde(deserialize_with = "f64_vec")]
        tape: Vec<f64>,
        #[serde(deserialize_with = "i64_truncated")]
        score: i64,
        #[serde(deserialize_with = "unsigned")]
        count: u32,
        #[serde(deserialize_with = "truthy")]
        flag: bool,
    }

    fn parse(json: &str) -> Fields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numbers_pass_through() {
        let f = parse(r#"{"x":1.5,"tape":[0.25,1],"score":-7,"count":3,"flag":true}"#);
        assert_eq!(
            f,
            Fields {
                x: 1.5,
                tape: vec![0.25, 1.0],
                score: -7,
                count: 3,
                flag: true,
            }
        );
    }

    #[test]
    fn null_and_garbage_become_zero() {
        let f = parse(
            r#"{"x":null,"tape":[null,"0.5",{},0.75],"score":null,"count":"x","flag":null}"#,
        );
        assert_eq!(f.x, 0.0);
        assert_eq!(f.tape, vec![0.0, 0.5, 0.0, 0.75]);
        assert_eq!(f.score, 0);
        assert_eq!(f.count, 0);
        assert!(!f.flag);
    }

    #[test]
    fn fractions_truncate() {
        let f = parse(r#"{"score":12.9,"count":4.7}"#);
        assert_eq!(f.score, 12);
        assert_eq!(f.count, 4);
        assert_eq!(parse(r#"{"score":-3.5}"#).score, -3);
        assert_eq!(parse(r#"{"count":-2}"#).count, 0);
        assert_eq!(parse(r#"{"count":1e12}"#).count, 0);
    }

    #[test]
    fn non_array_tape_is_empty() {
        assert!(parse(r#"{"tape":null}"#).tape.is_empty());
        assert!(parse(r#"{"tape":"0.5"}"#).tape.is_empty());
    }

    #[test]
    fn truthiness_rules() {
        assert!(parse(r#"{"flag":1}"#).flag);
        assert!(parse(r#"{"flag":"yes"}"#).flag);
        assert!(parse(r#"{"flag":{}}"#).flag);
        assert!(!parse(r#"{"flag":0}"#).flag);
        assert!(!parse(r#"{"flag":null}"#).flag);
        assert!(!parse(r#"{"flag":""}"#).flag);
    }
}
