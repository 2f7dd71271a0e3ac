use crate::imports::*;

use super::{check_new_path, visit_in_chunks};

static CREATE_DATA_ARRAY_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .parameter(
            ParameterSpecBuilder::new("numeric_type", ParamType::NumericType)
                .label("Output Numeric Type")
                .default_value(NumericType::Float32)
                .build(),
        )
        .parameter(
            ParameterSpecBuilder::new("component_count", ParamType::Integer)
                .label("Number of Components")
                .default_value(1)
                .constraint(Constraint::Min(1.0))
                .build(),
        )
        .parameter(
            ParameterSpecBuilder::new("tuple_dimensions", ParamType::Dimensions)
                .label("Data Array Dimensions")
                .hint("Tuple extents, slowest to fastest")
                .default_value(vec![1usize])
                .constraint(Constraint::NonEmpty)
                .constraint(Constraint::NoZeroEntries)
                .build(),
        )
        .parameter(
            ParameterSpecBuilder::new("initialization_value", ParamType::String)
                .label("Initialization Value")
                .hint("Parsed as the output numeric type")
                .default_value("0")
                .constraint(Constraint::NonEmpty)
                .build(),
        )
        .parameter(
            ParameterSpecBuilder::new("output_path", ParamType::DataPath)
                .label("Created Array")
                .constraint(Constraint::NonEmpty)
                .build(),
        )
        .build()
});

#[derive(Debug, Default)]
pub struct CreateDataArray;

impl CreateDataArray {
    pub const UUID: Uuid = Uuid::from_u128(0x67041f9b_bdc6_4122_acc6_c9fe9280e90d);
}

#[async_trait::async_trait]
impl Filter for CreateDataArray {
    fn identity(&self) -> FilterIdentity {
        FilterIdentity {
            uuid: Self::UUID,
            name: "CreateDataArray",
            human_name: "Create Data Array",
        }
    }

    fn parameters(&self) -> &'static ParameterSchema {
        &CREATE_DATA_ARRAY_SCHEMA
    }

    fn preflight(&self, store: &DataStore, arguments: &Arguments) -> Result<PreflightResult> {
        let numeric_type = arguments.get_required_numeric_type("numeric_type")?;
        let components = arguments.get_required_i64("component_count")? as usize;
        let tuple_shape = arguments.get_required_dimensions("tuple_dimensions")?.to_vec();
        let init = arguments.get_required_str("initialization_value")?;
        let path = arguments.get_required_path("output_path")?;

        let mut result = PreflightResult::new();
        check_new_path(store, path, &mut result.outcome);
        if let Err(e) = numeric_type.validate_text(init) {
            result.outcome.push_error(e);
        }
        if let Err(e) = checked_len(numeric_type, &tuple_shape, components) {
            result.outcome.push_error(e);
        }
        result.push(Action::CreateArray {
            path: path.clone(),
            numeric_type,
            tuple_shape,
            components,
        });
        Ok(result)
    }

    async fn execute(
        &self,
        store: &mut StoreAccess<'_>,
        arguments: &Arguments,
        context: &ExecutionContext,
    ) -> Result<Outcome> {
        let path = arguments.get_required_path("output_path")?;
        let init = arguments.get_required_str("initialization_value")?;
        tracing::debug!(path = %path, value = %init, "Filling array");
        visit_in_chunks(store, path, context, |data, range| {
            data.visit(FillRange { text: init, range })
        })
        .await?;
        Ok(Outcome::new())
    }
}

struct FillRange<'a> {
    text: &'a str,
    range: std::ops::Range<usize>,
}

impl SliceVisitorMut for FillRange<'_> {
    type Output = std::result::Result<(), NumericError>;

    fn visit<T: Element>(self, values: &mut [T]) -> Self::Output {
        let value = T::parse_text(self.text)?;
        values[self.range].iter_mut().for_each(|v| *v = value);
        Ok(())
    }
}
