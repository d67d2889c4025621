use std::collections::BTreeMap;

/// Dynamically typed value of a feature tag or style expression.
///
/// Follows the coercion rules of the tile styling language, which are the
/// JavaScript ones: a missing tag is `Undefined`, distinct from `Null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// `Number(value)`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_js_number(s),
        }
    }

    /// `===`.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => {
                let n = parse_js_number(s);
                (!n.is_nan()).then_some(n)
            }
            _ => None,
        }
    }
}

fn parse_js_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(n) = parse_radix_literal(t) {
        return n;
    }
    // Rust also accepts "inf" and "nan", JavaScript does not.
    if t.bytes().any(|b| matches!(b, b'i' | b'I' | b'n' | b'N')) {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

/// `0x`, `0o` and `0b` integer literals. JavaScript allows no sign here.
fn parse_radix_literal(t: &str) -> Option<f64> {
    let bytes = t.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &t[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut n = 0.0;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => n = n * f64::from(radix) + f64::from(d),
            None => return Some(f64::NAN),
        }
    }
    Some(n)
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Undefined, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        }
    }
}

/// Read access to the per-feature tags of a tileset feature.
pub trait FeatureTags {
    /// Returns [`Value::Undefined`] for tags the feature does not carry.
    fn tag(&self, name: &str) -> Value;
}

/// Owned tag map, used for previews and test fixtures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureProperties {
    tags: BTreeMap<String, Value>,
}

impl FeatureProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.tags.insert(name.into(), value.into());
    }
}

impl FeatureTags for FeatureProperties {
    fn tag(&self, name: &str) -> Value {
        self.tags.get(name).cloned().unwrap_or_default()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for FeatureProperties {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut props = FeatureProperties::new();
        for (k, v) in map {
            props.insert(k, Value::from(v));
        }
        props
    }
}
