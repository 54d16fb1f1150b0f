use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Typed state value.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, derive_more::From)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Number(#[serde(with = "number")] f64),
    String(String),
}

impl Value {
    /// Convert a configured literal into a typed value.
    ///
    /// `"true"` and `"false"` in any case become booleans. A literal starting with a number
    /// becomes that number, ignoring the trailing text, so `"1.5kW"` is `1.5`.
    /// Everything else stays the original string.
    pub fn coerce(literal: &str) -> Self {
        if literal.eq_ignore_ascii_case("true") {
            return Self::Boolean(true);
        }
        if literal.eq_ignore_ascii_case("false") {
            return Self::Boolean(false);
        }
        parse_number_prefix(literal).map_or_else(|| Self::String(literal.to_owned()), Self::Number)
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
        }
    }
}

/// Parse the longest numeric prefix after the leading whitespace.
///
/// Accepts an optional sign, a decimal mantissa with at least one digit, an optional exponent,
/// and `Infinity`.
fn parse_number_prefix(literal: &str) -> Option<f64> {
    let literal = literal.trim_start();
    let bytes = literal.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if literal[end..].starts_with("Infinity") {
        let infinity = if bytes[0] == b'-' { f64::NEG_INFINITY } else { f64::INFINITY };
        return Some(infinity);
    }

    let skip_digits = |from: usize| {
        bytes[from..].iter().take_while(|byte| byte.is_ascii_digit()).count()
    };
    let mut n_digits = skip_digits(end);
    end += n_digits;
    if bytes.get(end) == Some(&b'.') {
        let n_fraction_digits = skip_digits(end + 1);
        if n_digits != 0 || n_fraction_digits != 0 {
            end += 1 + n_fraction_digits;
        }
        n_digits += n_fraction_digits;
    }
    if n_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let n_exponent_digits = skip_digits(end + 1 + sign);
        if n_exponent_digits != 0 {
            end += 1 + sign + n_exponent_digits;
        }
    }

    literal[..end].parse().ok()
}

/// Numbers as JSON numbers, with the infinities spelled out since JSON has no literal for them.
mod number {
    use super::{Deserialize, Deserializer, Serializer, de};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(number: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if number.is_infinite() {
            let name = if number.is_sign_positive() { "Infinity" } else { "-Infinity" };
            serializer.serialize_str(name)
        } else {
            serializer.serialize_f64(*number)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Named(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(number) => Ok(number),
            Repr::Named(name) => match name.as_str() {
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                _ => Err(de::Error::custom(format!("`{name}` is not a number"))),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
        }
    }
}
