use crate::imports::*;

use super::PARAMETER_KEY_POLICY;

/*
    Types:
    * SchemaBuilder - Builder for a filter's ParameterSchema; checks declarations when built
    * ParameterSpecBuilder - Builder for constructing ParameterSpec

    Schemas are declared in statics, so a malformed declaration panics on first use.
*/
#[derive(Default)]
pub struct SchemaBuilder {
    parameters: Vec<ParameterSpec>,
    rules: Vec<SchemaRule>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameter(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    /// Adds a named cross-parameter rule. It only runs once every parameter passed its own checks.
    pub fn rule(
        mut self,
        name: &'static str,
        check: fn(&Arguments) -> std::result::Result<(), String>,
    ) -> Self {
        self.rules.push(SchemaRule { name, check });
        self
    }

    pub fn build(self) -> ParameterSchema {
        let policy = &*PARAMETER_KEY_POLICY;
        let mut seen = HashSet::new();

        for spec in &self.parameters {
            policy.validate(spec.key, "parameter");
            assert!(
                seen.insert(spec.key),
                "Duplicate parameter key '{}' in schema",
                spec.key
            );

            if let Some(default) = &spec.default_value {
                assert!(
                    default.matches(&spec.ty),
                    "Default for parameter '{}' is a {}, expected {}",
                    spec.key,
                    default.type_name(),
                    spec.ty
                );
                for constraint in &spec.constraints {
                    if let Some(reason) = constraint.check(default) {
                        panic!("Default for parameter '{}' {}", spec.key, reason);
                    }
                }
            }
        }

        let mut rule_names = HashSet::new();
        for rule in &self.rules {
            assert!(
                rule_names.insert(rule.name),
                "Duplicate rule name '{}' in schema",
                rule.name
            );
        }

        ParameterSchema {
            parameters: self.parameters,
            rules: self.rules,
        }
    }
}

pub struct ParameterSpecBuilder {
    key: &'static str,
    label: Option<&'static str>,
    hint: Option<&'static str>,
    ty: ParamType,
    default_value: Option<ArgValue>,
    constraints: Vec<Constraint>,
}

impl ParameterSpecBuilder {
    pub fn new(key: &'static str, ty: ParamType) -> Self {
        Self {
            key,
            label: None,
            hint: None,
            ty,
            default_value: None,
            constraints: vec![],
        }
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn default_value(mut self, value: impl Into<ArgValue>) -> Self {
        self.default_value = Some(value.into().coerce(&self.ty));
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn build(self) -> ParameterSpec {
        ParameterSpec {
            key: self.key,
            label: self.label.unwrap_or(self.key),
            hint: self.hint,
            ty: self.ty,
            default_value: self.default_value,
            constraints: self.constraints,
        }
    }
}
