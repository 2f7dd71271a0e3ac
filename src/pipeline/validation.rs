use crate::imports::*;

/*
    Functions:
    (PUBLIC METHOD)
    * validate_arguments - Applies defaults and checks Arguments against a ParameterSchema, reporting every problem
    * resolve_json_arguments - Converts a raw JSON argument object into typed Arguments
    (PRIVATE METHODS)
    * validate_value - Type and constraint checks for one parameter
    * run_rules - Cross-parameter rules, only once every parameter is valid
*/
#[tracing::instrument(skip(arguments, schema), fields(arg_count = arguments.len(), param_count = schema.parameters().len()))]
pub fn validate_arguments(arguments: &Arguments, schema: &ParameterSchema) -> (Arguments, Outcome) {
    tracing::debug!("Starting argument validation");
    let mut outcome = Outcome::new();
    let supplied = schema.with_defaults(arguments);

    for (key, _) in supplied.iter() {
        if schema.get(key).is_none() {
            tracing::warn!(parameter = %key, "Unknown parameter");
            outcome.error(
                ErrorKind::UnknownParameter,
                format!("unknown parameter '{}'", key),
            );
        }
    }

    let mut resolved = Arguments::new();
    for spec in schema.parameters() {
        match supplied.get(spec.key()) {
            Some(value) => {
                tracing::debug!(parameter = %spec.key(), ty = %spec.ty(), "Validating parameter");
                if let Some(value) = validate_value(spec, value.clone(), &mut outcome) {
                    resolved.insert(spec.key(), value);
                }
            }
            None => {
                tracing::warn!(parameter = %spec.key(), "Missing parameter without default");
                outcome.error(
                    ErrorKind::MissingParameter,
                    format!("missing required parameter '{}'", spec.key()),
                );
            }
        }
    }

    if outcome.is_ok() {
        run_rules(schema, &resolved, &mut outcome);
    }

    tracing::debug!(error_count = outcome.errors.len(), "Argument validation complete");
    (resolved, outcome)
}

fn validate_value(spec: &ParameterSpec, value: ArgValue, outcome: &mut Outcome) -> Option<ArgValue> {
    let value = value.coerce(spec.ty());
    if !value.matches(spec.ty()) {
        let kind = match (spec.ty(), &value) {
            // Right shape, wrong option.
            (ParamType::Choice(_), ArgValue::String(_)) => ErrorKind::ConstraintViolation,
            _ => ErrorKind::TypeMismatch,
        };
        outcome.error(
            kind,
            format!(
                "parameter '{}' expected {}, got {}",
                spec.key(),
                spec.ty(),
                value
            ),
        );
        return None;
    }

    let mut valid = true;
    for constraint in spec.constraints() {
        if let Some(reason) = constraint.check(&value) {
            outcome.error(
                ErrorKind::ConstraintViolation,
                format!("parameter '{}' {}", spec.key(), reason),
            );
            valid = false;
        }
    }
    valid.then_some(value)
}

fn run_rules(schema: &ParameterSchema, resolved: &Arguments, outcome: &mut Outcome) {
    for rule in schema.rules() {
        if let Err(reason) = (rule.check)(resolved) {
            tracing::warn!(rule = rule.name, reason = %reason, "Schema rule failed");
            outcome.error(
                ErrorKind::ConstraintViolation,
                format!("{}: {}", rule.name, reason),
            );
        }
    }
}

#[tracing::instrument(skip(raw, schema), fields(arg_count = raw.len()))]
pub fn resolve_json_arguments(
    raw: &JsonMap,
    schema: &ParameterSchema,
) -> std::result::Result<Arguments, Vec<FilterError>> {
    let mut errors = Vec::new();
    let mut arguments = Arguments::new();
    for (key, value) in raw {
        let Some(spec) = schema.get(key) else {
            errors.push(FilterError::new(
                ErrorKind::UnknownParameter,
                format!("unknown parameter '{}'", key),
            ));
            continue;
        };
        match ArgValue::from_json(key, value, spec.ty()) {
            Ok(value) => {
                arguments.insert(key.as_str(), value.coerce(spec.ty()));
            }
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() {
        Ok(arguments)
    } else {
        Err(errors)
    }
}
