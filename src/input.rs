use serde::ser::{Serialize, SerializeMap, Serializer};

/// Features the prediction backend reads, in the order its model expects.
pub const FEATURE_NAMES: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Raw form entries in submission order. Duplicate names are kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Parses `name=value` tokens. A token without `=` is a field with an
    /// empty value.
    pub fn from_pairs<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut form = Self::new();
        for token in tokens {
            let token = token.as_ref();
            match token.split_once('=') {
                Some((name, value)) => form.append(name.trim(), value),
                None => form.append(token.trim(), ""),
            }
        }
        form
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Field name -> parsed value, in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct FeatureVector {
    values: Vec<(String, f64)>,
}

impl FeatureVector {
    /// Later entries overwrite earlier ones with the same name but keep the
    /// original position.
    pub fn insert(&mut self, name: &str, value: f64) {
        match self.values.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<&FormData> for FeatureVector {
    fn from(form: &FormData) -> Self {
        let mut vector = FeatureVector::default();
        for (name, raw) in form.entries() {
            vector.insert(name, parse_float(raw));
        }
        vector
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            // NaN and infinities have no JSON form and go out as null
            let value = value.is_finite().then_some(*value);
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Lenient float parsing: skips leading whitespace and reads the longest
/// decimal prefix, so `"12abc"` is 12 and `"abc"` is NaN.
pub fn parse_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    let mut sign = 1.0;
    if let Some(&b) = bytes.first() {
        if b == b'+' || b == b'-' {
            if b == b'-' {
                sign = -1.0;
            }
            end = 1;
        }
    }

    if s[end..].starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let int_start = end;
    end = skip_digits(bytes, end);
    let int_digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(bytes, end + 1);
        if int_digits > 0 || frac_end > end + 1 {
            end = frac_end;
        }
    } else if int_digits == 0 {
        return f64::NAN;
    }

    if end == int_start {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(&b'e') | Some(&b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(&b'+') | Some(&b'-')) {
            exp += 1;
        }
        let exp_end = skip_digits(bytes, exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

fn skip_digits(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_float_reads_plain_numbers() {
        assert_eq!(parse_float("63"), 63.0);
        assert_eq!(parse_float("2.3"), 2.3);
        assert_eq!(parse_float("-1.5"), -1.5);
        assert_eq!(parse_float("+4"), 4.0);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("5."), 5.0);
        assert_eq!(parse_float("1e3"), 1000.0);
        assert_eq!(parse_float("  42  "), 42.0);
    }

    #[test]
    fn parse_float_stops_at_the_first_invalid_char() {
        assert_eq!(parse_float("12abc"), 12.0);
        assert_eq!(parse_float("1.2.3"), 1.2);
        assert_eq!(parse_float("7e"), 7.0);
        assert_eq!(parse_float("7e+"), 7.0);
        assert_eq!(parse_float("3,5"), 3.0);
    }

    #[test]
    fn parse_float_handles_infinity() {
        assert_eq!(parse_float("Infinity"), f64::INFINITY);
        assert_eq!(parse_float("-Infinityx"), f64::NEG_INFINITY);
    }

    #[test]
    fn parse_float_returns_nan_for_garbage() {
        assert!(parse_float("").is_nan());
        assert!(parse_float("abc").is_nan());
        assert!(parse_float(".").is_nan());
        assert!(parse_float("-").is_nan());
        assert!(parse_float("e5").is_nan());
        assert!(parse_float("inf").is_nan());
    }

    #[test]
    fn feature_vector_keys_match_form_fields() {
        let form = FormData::from_pairs(["age=63", "sex=1", "chol=233", "oldpeak=2.3"]);
        let vector = FeatureVector::from(&form);
        assert_eq!(vector.names().collect::<Vec<_>>(), ["age", "sex", "chol", "oldpeak"]);
        assert_eq!(vector.get("age"), Some(63.0));
        assert_eq!(vector.get("oldpeak"), Some(2.3));
    }

    #[test]
    fn duplicate_fields_keep_the_last_value() {
        let form = FormData::from_pairs(["age=40", "chol=200", "age=63"]);
        let vector = FeatureVector::from(&form);
        assert_eq!(vector.len(), 2);
        assert_eq!(vector.names().collect::<Vec<_>>(), ["age", "chol"]);
        assert_eq!(vector.get("age"), Some(63.0));
    }

    #[test]
    fn tokens_without_equals_become_empty_fields() {
        let form = FormData::from_pairs(["age=63", "thal"]);
        assert_eq!(form.entries().collect::<Vec<_>>(), [("age", "63"), ("thal", "")]);
        assert!(FeatureVector::from(&form).get("thal").unwrap().is_nan());
    }

    #[test]
    fn values_may_contain_equals() {
        let form = FormData::from_pairs(["note=a=b"]);
        assert_eq!(form.entries().collect::<Vec<_>>(), [("note", "a=b")]);
    }

    #[test]
    fn serializes_as_json_object_with_null_for_nan() {
        let form = FormData::from_pairs(["age=63", "chol=high", "ca=0"]);
        let json = serde_json::to_string(&FeatureVector::from(&form)).unwrap();
        assert_eq!(json, r#"{"age":63.0,"chol":null,"ca":0.0}"#);
    }
}
