//! Shared serialization utilities for event files.

/// `f64` that may be non-finite. JSON has no infinity or NaN, so those are
/// written as the strings `"inf"`, `"-inf"` and `"nan"`.
pub mod extended_f64 {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            s.serialize_f64(*value)
        } else if value.is_nan() {
            s.serialize_str("nan")
        } else if value.is_sign_positive() {
            s.serialize_str("inf")
        } else {
            s.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(d)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(D::Error::custom(format!("invalid float '{other}'"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super::extended_f64")]
        value: f64,
    }

    fn round_trip(value: f64) -> f64 {
        let json = serde_json::to_string(&Wrapper { value }).expect("serialize");
        serde_json::from_str::<Wrapper>(&json).expect("deserialize").value
    }

    #[test]
    fn finite_values_stay_numbers() {
        assert_eq!(
            serde_json::to_string(&Wrapper { value: 0.125 }).expect("serialize"),
            r#"{"value":0.125}"#
        );
        assert_eq!(round_trip(-3.5), -3.5);
    }

    #[test]
    fn non_finite_values_use_strings() {
        assert_eq!(
            serde_json::to_string(&Wrapper {
                value: f64::NEG_INFINITY
            })
            .expect("serialize"),
            r#"{"value":"-inf"}"#
        );
        assert_eq!(round_trip(f64::INFINITY), f64::INFINITY);
        assert!(round_trip(f64::NAN).is_nan());
    }

    #[test]
    fn integers_and_unknown_strings() {
        let parsed: Wrapper = serde_json::from_str(r#"{"value":2}"#).expect("integer");
        assert_eq!(parsed.value, 2.0);
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"huge"}"#).is_err());
    }
}
