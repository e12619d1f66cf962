use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

/// One piece of declarative metadata attached to a declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationInstance {
    /// The canonical name of the metadata kind.
    pub name: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub values: IndexMap<String, AnnotationValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Enum(String),
    Class(String),
    Array(Vec<AnnotationValue>),
    Nested(AnnotationInstance),
}

impl AnnotationInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    /// Sets the `value` member.
    pub fn with_value(self, value: impl Into<AnnotationValue>) -> Self {
        self.with("value", value)
    }

    pub fn with(mut self, member: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        self.values.insert(member.into(), value.into());
        self
    }

    pub fn value(&self) -> Option<&AnnotationValue> {
        self.values.get("value")
    }

    pub fn member(&self, name: &str) -> Option<&AnnotationValue> {
        self.values.get(name)
    }

    /// The `value` member as a string, ignoring blank values.
    pub fn string_value(&self) -> Option<&str> {
        self.value()
            .and_then(AnnotationValue::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) | AnnotationValue::Enum(s) | AnnotationValue::Class(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AnnotationValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AnnotationValue]> {
        match self {
            AnnotationValue::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Converts the value to its JSON form, with nested metadata turned into objects.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            AnnotationValue::String(s) | AnnotationValue::Enum(s) | AnnotationValue::Class(s) => {
                Value::String(s.clone())
            }
            AnnotationValue::Boolean(b) => Value::Bool(*b),
            AnnotationValue::Integer(i) => Value::from(*i),
            AnnotationValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AnnotationValue::Array(values) => {
                Value::Array(values.iter().map(AnnotationValue::to_json).collect())
            }
            AnnotationValue::Nested(nested) => Value::Object(
                nested
                    .values
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::String(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::String(value)
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Boolean(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::Integer(value)
    }
}

impl From<f64> for AnnotationValue {
    fn from(value: f64) -> Self {
        AnnotationValue::Float(value)
    }
}

impl From<AnnotationInstance> for AnnotationValue {
    fn from(value: AnnotationInstance) -> Self {
        AnnotationValue::Nested(value)
    }
}

impl<T: Into<AnnotationValue>> From<Vec<T>> for AnnotationValue {
    fn from(values: Vec<T>) -> Self {
        AnnotationValue::Array(values.into_iter().map(Into::into).collect())
    }
}
