use crate::imports::*;

/*
    Types:
    * ArgValue - One typed parameter value
    * Arguments - Ordered parameter key to ArgValue map handed to both filter phases
    * JsonValue / JsonMap - Raw argument representation used by pipeline files
*/
pub type JsonValue = serde_json::Value;
pub type JsonMap = serde_json::Map<String, JsonValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    DataPath(DataPath),
    NumericType(NumericType),
    Dimensions(Vec<usize>),
}

impl ArgValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Bool(_) => "bool",
            ArgValue::Integer(_) => "integer",
            ArgValue::Float(_) => "float",
            ArgValue::String(_) => "string",
            ArgValue::DataPath(_) => "data path",
            ArgValue::NumericType(_) => "numeric type",
            ArgValue::Dimensions(_) => "dimensions",
        }
    }

    /// Whether this value is acceptable for a parameter declared as `ty`.
    pub fn matches(&self, ty: &ParamType) -> bool {
        match (ty, self) {
            (ParamType::Bool, ArgValue::Bool(_)) => true,
            (ParamType::Integer, ArgValue::Integer(_)) => true,
            (ParamType::Float, ArgValue::Float(_)) => true,
            (ParamType::String, ArgValue::String(_)) => true,
            (ParamType::DataPath, ArgValue::DataPath(_)) => true,
            (ParamType::NumericType, ArgValue::NumericType(_)) => true,
            (ParamType::Dimensions, ArgValue::Dimensions(_)) => true,
            (ParamType::Choice(options), ArgValue::String(s)) => options.contains(&s.as_str()),
            _ => false,
        }
    }

    /// Integers are accepted where floats are declared.
    pub fn coerce(self, ty: &ParamType) -> Self {
        match (ty, self) {
            (ParamType::Float, ArgValue::Integer(v)) => ArgValue::Float(v as f64),
            (_, value) => value,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(v) => Some(*v),
            ArgValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&DataPath> {
        match self {
            ArgValue::DataPath(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_numeric_type(&self) -> Option<NumericType> {
        match self {
            ArgValue::NumericType(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_dimensions(&self) -> Option<&[usize]> {
        match self {
            ArgValue::Dimensions(v) => Some(v),
            _ => None,
        }
    }

    /// Reads a raw JSON value as a parameter of type `ty`.
    pub fn from_json(
        key: &str,
        value: &JsonValue,
        ty: &ParamType,
    ) -> std::result::Result<Self, FilterError> {
        let mismatch = || {
            FilterError::new(
                ErrorKind::TypeMismatch,
                format!("parameter '{}' expected {}, got {}", key, ty, value),
            )
        };
        let parsed = match ty {
            ParamType::Bool => ArgValue::Bool(value.as_bool().ok_or_else(mismatch)?),
            ParamType::Integer => ArgValue::Integer(value.as_i64().ok_or_else(mismatch)?),
            ParamType::Float => ArgValue::Float(value.as_f64().ok_or_else(mismatch)?),
            ParamType::String | ParamType::Choice(_) => {
                ArgValue::String(value.as_str().ok_or_else(mismatch)?.to_string())
            }
            ParamType::DataPath => {
                let text = value.as_str().ok_or_else(mismatch)?;
                let path = DataPath::parse(text).map_err(|e| {
                    FilterError::new(
                        ErrorKind::ParseFailure,
                        format!("parameter '{}': {}", key, e),
                    )
                })?;
                ArgValue::DataPath(path)
            }
            ParamType::NumericType => {
                let text = value.as_str().ok_or_else(mismatch)?;
                ArgValue::NumericType(NumericType::from_name(text)?)
            }
            ParamType::Dimensions => {
                let items = value.as_array().ok_or_else(mismatch)?;
                let dims = items
                    .iter()
                    .map(|item| item.as_u64().map(|d| d as usize))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(mismatch)?;
                ArgValue::Dimensions(dims)
            }
        };
        Ok(parsed)
    }

    pub fn to_json(&self) -> std::result::Result<JsonValue, FilterError> {
        Ok(match self {
            ArgValue::Bool(v) => JsonValue::Bool(*v),
            ArgValue::Integer(v) => JsonValue::from(*v),
            ArgValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .ok_or_else(|| {
                    FilterError::new(
                        ErrorKind::ConstraintViolation,
                        format!("{} cannot be written to a pipeline file", v),
                    )
                })?,
            ArgValue::String(v) => JsonValue::String(v.clone()),
            ArgValue::DataPath(v) => JsonValue::String(v.to_string()),
            ArgValue::NumericType(v) => JsonValue::String(v.name().to_string()),
            ArgValue::Dimensions(v) => JsonValue::Array(v.iter().map(|d| JsonValue::from(*d)).collect()),
        })
    }
}

impl std::fmt::Display for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgValue::Bool(v) => write!(f, "{}", v),
            ArgValue::Integer(v) => write!(f, "{}", v),
            ArgValue::Float(v) => write!(f, "{}", v),
            ArgValue::String(v) => write!(f, "\"{}\"", v),
            ArgValue::DataPath(v) => write!(f, "'{}'", v),
            ArgValue::NumericType(v) => write!(f, "{}", v),
            ArgValue::Dimensions(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Bool(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        ArgValue::Integer(v as i64)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Integer(v)
    }
}

impl From<usize> for ArgValue {
    fn from(v: usize) -> Self {
        ArgValue::Integer(v as i64)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::Float(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::String(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::String(v)
    }
}

impl From<DataPath> for ArgValue {
    fn from(v: DataPath) -> Self {
        ArgValue::DataPath(v)
    }
}

impl From<NumericType> for ArgValue {
    fn from(v: NumericType) -> Self {
        ArgValue::NumericType(v)
    }
}

impl From<Vec<usize>> for ArgValue {
    fn from(v: Vec<usize>) -> Self {
        ArgValue::Dimensions(v)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: IndexMap<String, ArgValue>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Option<ArgValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ArgValue> {
        self.values.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_required(&self, key: &str) -> std::result::Result<&ArgValue, FilterError> {
        self.get(key).ok_or_else(|| {
            FilterError::new(
                ErrorKind::MissingParameter,
                format!("missing required parameter '{}'", key),
            )
        })
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &str,
        read: impl FnOnce(&'a ArgValue) -> Option<T>,
    ) -> std::result::Result<T, FilterError> {
        let value = self.get_required(key)?;
        read(value).ok_or_else(|| {
            FilterError::new(
                ErrorKind::TypeMismatch,
                format!(
                    "parameter '{}' expected {}, got {}",
                    key,
                    expected,
                    value.type_name()
                ),
            )
        })
    }

    pub fn get_required_bool(&self, key: &str) -> std::result::Result<bool, FilterError> {
        self.typed(key, "bool", ArgValue::as_bool)
    }

    pub fn get_required_i64(&self, key: &str) -> std::result::Result<i64, FilterError> {
        self.typed(key, "integer", ArgValue::as_i64)
    }

    pub fn get_required_f64(&self, key: &str) -> std::result::Result<f64, FilterError> {
        self.typed(key, "float", ArgValue::as_f64)
    }

    pub fn get_required_str(&self, key: &str) -> std::result::Result<&str, FilterError> {
        self.typed(key, "string", ArgValue::as_str)
    }

    pub fn get_required_path(&self, key: &str) -> std::result::Result<&DataPath, FilterError> {
        self.typed(key, "data path", ArgValue::as_path)
    }

    pub fn get_required_numeric_type(
        &self,
        key: &str,
    ) -> std::result::Result<NumericType, FilterError> {
        self.typed(key, "numeric type", ArgValue::as_numeric_type)
    }

    pub fn get_required_dimensions(&self, key: &str) -> std::result::Result<&[usize], FilterError> {
        self.typed(key, "dimensions", ArgValue::as_dimensions)
    }

    /// Converts every value back to raw JSON, keeping key order.
    pub fn to_json(&self) -> std::result::Result<JsonMap, FilterError> {
        let mut map = JsonMap::new();
        for (key, value) in &self.values {
            let json = value.to_json().map_err(|e| {
                FilterError::new(e.kind, format!("parameter '{}': {}", key, e.message))
            })?;
            map.insert(key.clone(), json);
        }
        Ok(map)
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = (&'a String, &'a ArgValue);
    type IntoIter = indexmap::map::Iter<'a, String, ArgValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn args_macro_builds_typed_values() {
        let args = crate::args! {
            "count" => 3,
            "scale" => 1.5,
            "name" => "Phases",
            "enabled" => true,
            "shape" => vec![2usize, 5],
        };
        assert_eq!(args.get_required_i64("count").unwrap(), 3);
        assert_eq!(args.get_required_f64("scale").unwrap(), 1.5);
        assert_eq!(args.get_required_str("name").unwrap(), "Phases");
        assert!(args.get_required_bool("enabled").unwrap());
        assert_eq!(args.get_required_dimensions("shape").unwrap(), &[2, 5]);
        let keys: Vec<&str> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["count", "scale", "name", "enabled", "shape"]);
    }

    #[test]
    fn getters_report_missing_and_mismatched() {
        let args = crate::args! { "count" => "three" };
        assert_eq!(
            args.get_required_i64("count").unwrap_err().kind,
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            args.get_required_i64("other").unwrap_err().kind,
            ErrorKind::MissingParameter
        );
    }

    #[test]
    fn json_values_read_by_declared_type() {
        let path = ArgValue::from_json("p", &json!("Image/Cell Data"), &ParamType::DataPath).unwrap();
        assert_eq!(path.as_path().unwrap().depth(), 2);

        let ty = ArgValue::from_json("t", &json!("float32"), &ParamType::NumericType).unwrap();
        assert_eq!(ty, ArgValue::NumericType(NumericType::Float32));

        let dims = ArgValue::from_json("d", &json!([3, 4]), &ParamType::Dimensions).unwrap();
        assert_eq!(dims, ArgValue::Dimensions(vec![3, 4]));

        let err = ArgValue::from_json("d", &json!([3, -1]), &ParamType::Dimensions).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);

        let err = ArgValue::from_json("t", &json!("complex64"), &ParamType::NumericType).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedType);
    }

    #[test]
    fn floats_accept_integers() {
        let value = ArgValue::from_json("f", &json!(2), &ParamType::Float).unwrap();
        assert_eq!(value, ArgValue::Float(2.0));
        assert_eq!(ArgValue::Integer(4).coerce(&ParamType::Float), ArgValue::Float(4.0));
        assert!(ArgValue::Float(4.0).matches(&ParamType::Float));
        assert!(!ArgValue::Integer(4).matches(&ParamType::Float));
    }

    #[test]
    fn choice_matches_only_listed_options() {
        let ty = ParamType::Choice(&["add", "subtract"]);
        assert!(ArgValue::from("add").matches(&ty));
        assert!(!ArgValue::from("power").matches(&ty));
    }

    #[test]
    fn to_json_keeps_order_and_rejects_nan() {
        let args = crate::args! {
            "ty" => NumericType::UInt8,
            "path" => DataPath::parse("a/b").unwrap(),
            "count" => 2,
        };
        let map = args.to_json().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ty", "path", "count"]);
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"ty":"uint8","path":"a/b","count":2}"#
        );

        let bad = crate::args! { "scale" => f64::NAN };
        assert!(bad.to_json().is_err());
    }
}
