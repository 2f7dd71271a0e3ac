use crate::imports::*;
use regex::Regex;

pub mod builder;
pub mod parameter;

/*
    Types:
    * ParamType - Declared type of a filter parameter
    * Constraint - Per-parameter rule checked after the type check
    * SchemaRule - Named cross-parameter rule declared by a filter
    * ParameterSchema - Ordered parameter declarations plus rules for one filter
    * NamePolicy - Naming conventions for parameter keys and data object names
*/
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    Bool,
    Integer,
    Float,
    String,
    DataPath,
    NumericType,
    Dimensions,
    Choice(&'static [&'static str]),
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamType::Bool => f.write_str("bool"),
            ParamType::Integer => f.write_str("integer"),
            ParamType::Float => f.write_str("float"),
            ParamType::String => f.write_str("string"),
            ParamType::DataPath => f.write_str("data path"),
            ParamType::NumericType => f.write_str("numeric type"),
            ParamType::Dimensions => f.write_str("dimensions"),
            ParamType::Choice(options) => write!(f, "one of [{}]", options.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Min(f64),
    Max(f64),
    NonEmpty,
    NoZeroEntries,
}

impl Constraint {
    /// `Some(reason)` when `value` violates the constraint.
    pub fn check(&self, value: &ArgValue) -> Option<String> {
        match (self, value) {
            (Constraint::Min(min), ArgValue::Integer(v)) if (*v as f64) < *min => {
                Some(format!("must be >= {}, got {}", min, v))
            }
            (Constraint::Min(min), ArgValue::Float(v)) if v < min => {
                Some(format!("must be >= {}, got {}", min, v))
            }
            (Constraint::Max(max), ArgValue::Integer(v)) if (*v as f64) > *max => {
                Some(format!("must be <= {}, got {}", max, v))
            }
            (Constraint::Max(max), ArgValue::Float(v)) if v > max => {
                Some(format!("must be <= {}, got {}", max, v))
            }
            (Constraint::NonEmpty, ArgValue::String(s)) if s.is_empty() => {
                Some("must not be empty".to_string())
            }
            (Constraint::NonEmpty, ArgValue::Dimensions(d)) if d.is_empty() => {
                Some("must list at least one dimension".to_string())
            }
            (Constraint::NonEmpty, ArgValue::DataPath(p)) if p.is_root() => {
                Some("must not be the store root".to_string())
            }
            (Constraint::NoZeroEntries, ArgValue::Dimensions(d)) if d.contains(&0) => {
                Some(format!("must not contain zero entries, got {:?}", d))
            }
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct SchemaRule {
    pub name: &'static str,
    pub check: fn(&Arguments) -> std::result::Result<(), String>,
}

impl std::fmt::Debug for SchemaRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRule")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParameterSchema {
    pub(crate) parameters: Vec<ParameterSpec>,
    pub(crate) rules: Vec<SchemaRule>,
}

impl ParameterSchema {
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn rules(&self) -> &[SchemaRule] {
        &self.rules
    }

    pub fn get(&self, key: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parameters.iter().map(|p| p.key)
    }

    /// Supplied arguments with defaults filled in for absent keys.
    pub fn with_defaults(&self, arguments: &Arguments) -> Arguments {
        let mut resolved = arguments.clone();
        for spec in &self.parameters {
            if !resolved.contains(spec.key) {
                if let Some(default) = &spec.default_value {
                    resolved.insert(spec.key, default.clone());
                }
            }
        }
        resolved
    }

    /// Applies defaults then checks keys, types, constraints and rules, reporting every problem.
    pub fn validate(&self, arguments: &Arguments) -> Outcome {
        validate_arguments(arguments, self).1
    }

    /// Like [`ParameterSchema::validate`], also returning the resolved arguments.
    pub fn resolve(&self, arguments: &Arguments) -> (Arguments, Outcome) {
        validate_arguments(arguments, self)
    }

    /// Converts a raw JSON object from a pipeline file into typed arguments.
    pub fn resolve_json(&self, raw: &JsonMap) -> std::result::Result<Arguments, Vec<FilterError>> {
        resolve_json_arguments(raw, self)
    }
}

pub struct NamePolicy {
    pub reserved_names: &'static [&'static str],
    forbidden_regex: Regex,
}

impl NamePolicy {
    pub fn new(reserved_names: &'static [&'static str], forbidden_pattern: &str) -> Self {
        Self {
            reserved_names,
            forbidden_regex: Regex::new(forbidden_pattern)
                .expect("NamePolicy: invalid forbidden_pattern regex"),
        }
    }

    /// `Err(reason)` when `name` breaks the policy.
    pub fn check(&self, name: &str) -> std::result::Result<(), String> {
        if name.is_empty() {
            return Err("name is empty".to_string());
        }
        if self.reserved_names.contains(&name) {
            return Err(format!("name '{}' is reserved", name));
        }
        if self.forbidden_regex.is_match(name) {
            return Err(format!(
                "name '{}' contains forbidden characters (pattern: {})",
                name,
                self.forbidden_regex.as_str()
            ));
        }
        Ok(())
    }

    /// Panicking form of [`NamePolicy::check`] for statically declared names.
    pub fn validate(&self, name: &str, context: &str) {
        if let Err(reason) = self.check(name) {
            panic!("NamePolicy violation: {} {}", context, reason);
        }
    }
}

pub static PARAMETER_KEY_POLICY: LazyLock<NamePolicy> =
    LazyLock::new(|| NamePolicy::new(&[], r"[^a-zA-Z0-9_]"));

pub static DATA_OBJECT_NAME_POLICY: LazyLock<NamePolicy> =
    LazyLock::new(|| NamePolicy::new(&[], r"[/\x00-\x1F]"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_keys_follow_policy() {
        let policy = &*PARAMETER_KEY_POLICY;
        assert!(policy.check("output_array_path").is_ok());
        assert!(policy.check("component_count").is_ok());
        assert!(policy.check("bad key").is_err());
        assert!(policy.check("bad.key").is_err());
        assert!(policy.check("").is_err());
    }

    #[test]
    fn data_object_names_allow_spaces_but_not_separators() {
        let policy = &*DATA_OBJECT_NAME_POLICY;
        assert!(policy.check("Cell Data").is_ok());
        assert!(policy.check("Euler (rad)").is_ok());
        assert!(policy.check("a/b").is_err());
        assert!(policy.check("tab\there").is_err());
    }

    #[test]
    #[should_panic(expected = "NamePolicy violation: parameter name 'x-y' contains forbidden characters")]
    fn validate_panics_on_bad_static_names() {
        PARAMETER_KEY_POLICY.validate("x-y", "parameter");
    }

    #[test]
    fn constraints_report_reasons() {
        assert!(Constraint::Min(1.0).check(&ArgValue::Integer(0)).is_some());
        assert!(Constraint::Min(1.0).check(&ArgValue::Integer(1)).is_none());
        assert!(Constraint::Max(2.5).check(&ArgValue::Float(3.0)).is_some());
        assert!(
            Constraint::NoZeroEntries
                .check(&ArgValue::Dimensions(vec![3, 0, 2]))
                .is_some()
        );
        assert!(
            Constraint::NonEmpty
                .check(&ArgValue::Dimensions(vec![]))
                .is_some()
        );
        assert!(
            Constraint::NonEmpty
                .check(&ArgValue::DataPath(DataPath::root()))
                .is_some()
        );
        // Constraints ignore values of other shapes; the type check reports those.
        assert!(Constraint::NoZeroEntries.check(&ArgValue::Bool(true)).is_none());
    }
}
