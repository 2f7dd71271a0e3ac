//! Example: Pipeline overview using the built-in filters
//!
//! Demonstrates the core workflow:
//!   1. Build a draft pipeline from built-in filters
//!   2. Compile it (every binding's arguments are checked up front)
//!   3. Dry-run it with `preflight` to see the planned store shape
//!   4. Run it and inspect the per-filter reports
//!
//! Run with: RUST_LOG=debug cargo run --example pipeline_overview

use filterflow_core::args;
use filterflow_core::prelude::*;

fn path(text: &str) -> anyhow::Result<DataPath> {
    Ok(DataPath::parse(text)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .try_init()
        .ok();

    // ─── Draft: bind filters to arguments ───
    let mut pipeline = Pipeline::new("overview");
    pipeline.push(
        CreateDataGroup,
        args! { "output_path" => DataPath::root().child("Image")? },
    );
    pipeline.push(
        CreateDataGroup,
        args! { "output_path" => path("Image/Cell Data")? },
    );
    pipeline.push(
        CreateDataArray,
        args! {
            "numeric_type" => NumericType::Float32,
            "component_count" => 3,
            "tuple_dimensions" => vec![4usize, 4],
            "initialization_value" => "0.5",
            "output_path" => path("Image/Cell Data/Euler")?,
        },
    );
    pipeline.push(
        ArrayScalarArithmetic,
        args! {
            "array_path" => path("Image/Cell Data/Euler")?,
            "operation" => "multiply",
            "scalar" => "2",
        },
    );
    pipeline.push(
        RenameDataObject,
        args! { "source_path" => path("Image/Cell Data/Euler")?, "new_name" => "Orientations" },
    );
    pipeline.push(
        ResizeDataArray,
        args! { "array_path" => path("Image/Cell Data/Orientations")?, "tuple_dimensions" => vec![8usize, 4] },
    );

    // ─── Compile ───
    let pipeline = match pipeline.compile() {
        Ok(ready) => ready,
        Err(e) => {
            for problem in &e.problems {
                println!("{}", problem);
            }
            return Err(e.into());
        }
    };

    // ─── Dry run ───
    let context = ExecutionContext::new(PipelineServices::defaults());
    let store = DataStore::new();
    let (planned, preview) = pipeline.preflight(&store, &context).await;
    println!("Preflight: {} warnings, {} errors", preview.warnings().len(), preview.errors().len());
    for planned_path in planned.paths() {
        println!("  planned {}", planned_path);
    }

    // ─── Run ───
    let mut store = DataStore::new();
    let result = pipeline.run(&mut store, &context).await;
    println!("{}", result);

    let array = store.array(&path("Image/Cell Data/Orientations")?)?;
    println!(
        "Orientations: {:?} tuples x {} components, first tuple {:?}, last tuple {:?}",
        array.tuple_shape(),
        array.components(),
        array.tuple::<f32>(0),
        array.tuple::<f32>(array.tuple_count() - 1),
    );

    Ok(())
}
