use crate::imports::*;

use super::visit_in_chunks;

static ARRAY_SCALAR_ARITHMETIC_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .parameter(
            ParameterSpecBuilder::new("array_path", ParamType::DataPath)
                .label("Array")
                .constraint(Constraint::NonEmpty)
                .build(),
        )
        .parameter(
            ParameterSpecBuilder::new("operation", ParamType::Choice(ARITHMETIC_OP_NAMES))
                .label("Operation")
                .default_value("add")
                .build(),
        )
        .parameter(
            ParameterSpecBuilder::new("scalar", ParamType::String)
                .label("Scalar Value")
                .hint("Parsed as the array's numeric type")
                .default_value("0")
                .constraint(Constraint::NonEmpty)
                .build(),
        )
        .build()
});

#[derive(Debug, Default)]
pub struct ArrayScalarArithmetic;

impl ArrayScalarArithmetic {
    pub const UUID: Uuid = Uuid::from_u128(0x5a0c4d2e_8b7f_4e19_a6d3_2f1e9c8b4a77);
}

fn operation(arguments: &Arguments) -> Result<ArithmeticOp> {
    let name = arguments.get_required_str("operation")?;
    ArithmeticOp::from_name(name)
        .ok_or_else(|| FilterError::new(ErrorKind::ConstraintViolation, format!("unknown operation '{}'", name)).into())
}

#[async_trait::async_trait]
impl Filter for ArrayScalarArithmetic {
    fn identity(&self) -> FilterIdentity {
        FilterIdentity {
            uuid: Self::UUID,
            name: "ArrayScalarArithmetic",
            human_name: "Array Scalar Arithmetic",
        }
    }

    fn parameters(&self) -> &'static ParameterSchema {
        &ARRAY_SCALAR_ARITHMETIC_SCHEMA
    }

    fn preflight(&self, store: &DataStore, arguments: &Arguments) -> Result<PreflightResult> {
        let path = arguments.get_required_path("array_path")?;
        let scalar = arguments.get_required_str("scalar")?;
        let op = operation(arguments)?;
        let numeric_type = match store.array(path) {
            Ok(array) => array.numeric_type(),
            Err(e) => return Ok(Outcome::from_error(e).into()),
        };

        let mut outcome = Outcome::new();
        if numeric_type == NumericType::Bool {
            outcome.push_error(NumericError::UnsupportedOperation { op, ty: numeric_type });
            return Ok(outcome.into());
        }
        match numeric_type.dispatch(ScalarIsZero(scalar)) {
            Ok(true) if op == ArithmeticOp::Divide && numeric_type.is_integer() => {
                outcome.error(
                    ErrorKind::ConstraintViolation,
                    format!("integer division of '{}' by zero", path),
                );
            }
            Ok(_) => {}
            Err(e) => outcome.push_error(e),
        }
        Ok(outcome.into())
    }

    async fn execute(
        &self,
        store: &mut StoreAccess<'_>,
        arguments: &Arguments,
        context: &ExecutionContext,
    ) -> Result<Outcome> {
        let path = arguments.get_required_path("array_path")?;
        let scalar = arguments.get_required_str("scalar")?;
        let op = operation(arguments)?;
        tracing::debug!(path = %path, %op, scalar, "Applying scalar operation");
        visit_in_chunks(store, path, context, |data, range| {
            data.visit(CombineRange { op, text: scalar, range })
        })
        .await?;
        Ok(Outcome::new())
    }
}

struct ScalarIsZero<'a>(&'a str);

impl NumericVisitor for ScalarIsZero<'_> {
    type Output = std::result::Result<bool, NumericError>;

    fn visit<T: Element>(self) -> Self::Output {
        T::parse_text(self.0).map(Element::is_zero)
    }
}

struct CombineRange<'a> {
    op: ArithmeticOp,
    text: &'a str,
    range: std::ops::Range<usize>,
}

impl SliceVisitorMut for CombineRange<'_> {
    type Output = std::result::Result<(), NumericError>;

    fn visit<T: Element>(self, values: &mut [T]) -> Self::Output {
        let rhs = T::parse_text(self.text)?;
        for value in &mut values[self.range] {
            *value = value.combine(self.op, rhs).ok_or(NumericError::UnsupportedOperation {
                op: self.op,
                ty: T::TYPE,
            })?;
        }
        Ok(())
    }
}
