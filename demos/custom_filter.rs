//! Example: Implementing a custom Filter
//!
//! Demonstrates how to implement the Filter trait (identity + parameter schema + preflight +
//! execute) and use it next to the built-in filters.
//!
//! The example filter clamps every element of an existing array into [min, max]. Preflight only
//! checks the inputs, so it returns no actions; execute rewrites the array contents in place.
//!
//! Run with: cargo run --example custom_filter

use filterflow_core::args;
use filterflow_core::prelude::*;
use std::sync::LazyLock;
use uuid::Uuid;

// ─── Step 1: Define the ParameterSchema ─────────────────────────────────────
//
// Schemas are built once, on first access. Invalid keys or mistyped defaults panic here,
// never during a run.

static CLAMP_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .parameter(
            ParameterSpecBuilder::new("array_path", ParamType::DataPath)
                .label("Array")
                .constraint(Constraint::NonEmpty)
                .build(),
        )
        .parameter(ParameterSpecBuilder::new("min", ParamType::Float).default_value(0.0).build())
        .parameter(ParameterSpecBuilder::new("max", ParamType::Float).default_value(1.0).build())
        .rule("min_not_above_max", |args| {
            let min = args.get_required_f64("min").map_err(|e| e.message)?;
            let max = args.get_required_f64("max").map_err(|e| e.message)?;
            if min > max {
                return Err(format!("min {} is above max {}", min, max));
            }
            Ok(())
        })
        .build()
});

// ─── Step 2: Implement Filter ───────────────────────────────────────────────

#[derive(Debug, Default)]
struct ClampArray;

impl ClampArray {
    const UUID: Uuid = Uuid::from_u128(0x2c1e7d0a_6f3b_4c58_9a21_7e4d5b8c9f10);
}

struct Clamp {
    min: f64,
    max: f64,
}

impl SliceVisitorMut for Clamp {
    type Output = Result<(), NumericError>;

    fn visit<T: Element>(self, values: &mut [T]) -> Self::Output {
        // A bound the element type cannot hold (1.5 for an int32 array) is an error, not zero.
        let min = T::parse_text(&self.min.to_string())?;
        let max = T::parse_text(&self.max.to_string())?;
        for value in values.iter_mut() {
            if *value < min {
                *value = min;
            } else if *value > max {
                *value = max;
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Filter for ClampArray {
    fn identity(&self) -> FilterIdentity {
        FilterIdentity {
            uuid: Self::UUID,
            name: "ClampArray",
            human_name: "Clamp Array",
        }
    }

    fn parameters(&self) -> &'static ParameterSchema {
        &CLAMP_SCHEMA
    }

    fn preflight(&self, store: &DataStore, arguments: &Arguments) -> anyhow::Result<PreflightResult> {
        let path = arguments.get_required_path("array_path")?;
        let mut outcome = Outcome::new();
        match store.array(path) {
            Ok(array) if array.numeric_type() == NumericType::Bool => {
                outcome.error(ErrorKind::UnsupportedType, format!("'{}' holds booleans", path));
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
    ) -> anyhow::Result<Outcome> {
        context.check_cancelled()?;
        let path = arguments.get_required_path("array_path")?;
        let clamp = Clamp {
            min: arguments.get_required_f64("min")?,
            max: arguments.get_required_f64("max")?,
        };
        store.array_data_mut(path)?.visit(clamp)?;
        Ok(Outcome::new())
    }
}

// ─── Step 3: Use it ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .try_init()
        .ok();

    let values = DataPath::parse("Values")?;
    let mut store = DataStore::new();
    store.insert_at(
        &values,
        DataObject::Array(DataArray::from_vec(vec![-4i32, 0, 3, 9, 12], vec![5], 1)?),
    )?;

    // A schema rule rejects min > max before anything runs.
    let context = ExecutionContext::default();
    let report = apply_filter(
        &ClampArray,
        &mut store,
        &args! { "array_path" => values.clone(), "min" => 10, "max" => 1 },
        &context,
    )
    .await;
    println!("Rejected: {:?}", report.errors().map(|e| e.to_string()).collect::<Vec<_>>());

    // Integers are accepted where floats are declared.
    let report = apply_filter(
        &ClampArray,
        &mut store,
        &args! { "array_path" => values.clone(), "min" => 0, "max" => 10 },
        &context,
    )
    .await;
    println!("State: {}", report.state);
    println!("Clamped: {:?}", store.array(&values)?.as_slice::<i32>());

    // Fractional bounds cannot be represented as int32 elements, so execute reports it.
    let report = apply_filter(
        &ClampArray,
        &mut store,
        &args! { "array_path" => values.clone(), "min" => 0, "max" => 1.5 },
        &context,
    )
    .await;
    println!("State: {}, errors: {:?}", report.state, report.errors().map(|e| e.to_string()).collect::<Vec<_>>());

    // Custom filters register next to the built-ins, so pipeline files can name them.
    let mut registry = FilterRegistry::with_builtins()?;
    registry.register(factory::<ClampArray>())?;
    for identity in registry.identities() {
        println!("  {}", identity);
    }

    Ok(())
}
