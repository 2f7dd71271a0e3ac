use crate::imports::*;

use super::check_new_path;

static CREATE_DATA_GROUP_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .parameter(
            ParameterSpecBuilder::new("output_path", ParamType::DataPath)
                .label("Data Group")
                .hint("Path of the group to create; its parent must already exist")
                .constraint(Constraint::NonEmpty)
                .build(),
        )
        .build()
});

#[derive(Debug, Default)]
pub struct CreateDataGroup;

impl CreateDataGroup {
    pub const UUID: Uuid = Uuid::from_u128(0xe7d2f9b8_4131_5b28_a843_ea3c6950f101);
}

#[async_trait::async_trait]
impl Filter for CreateDataGroup {
    fn identity(&self) -> FilterIdentity {
        FilterIdentity {
            uuid: Self::UUID,
            name: "CreateDataGroup",
            human_name: "Create Data Group",
        }
    }

    fn parameters(&self) -> &'static ParameterSchema {
        &CREATE_DATA_GROUP_SCHEMA
    }

    fn preflight(&self, store: &DataStore, arguments: &Arguments) -> Result<PreflightResult> {
        let path = arguments.get_required_path("output_path")?;
        let mut result = PreflightResult::new();
        check_new_path(store, path, &mut result.outcome);
        result.push(Action::CreateGroup { path: path.clone() });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_tracing;

    #[tokio::test]
    async fn creates_group_under_existing_parent() {
        init_tracing();
        let mut store = DataStore::new();
        let context = ExecutionContext::default();
        let report = apply_filter(
            &CreateDataGroup,
            &mut store,
            &crate::args! { "output_path" => DataPath::parse("Data").unwrap() },
            &context,
        )
        .await;
        assert!(!report.is_failed(), "{:?}", report.errors().collect::<Vec<_>>());
        assert_eq!(report.state, FilterState::Executed { ok: true });

        let report = apply_filter(
            &CreateDataGroup,
            &mut store,
            &crate::args! { "output_path" => DataPath::parse("Data/Nested").unwrap() },
            &context,
        )
        .await;
        assert!(!report.is_failed());
        assert_eq!(store.children(&DataPath::parse("Data").unwrap()).unwrap(), vec!["Nested"]);
    }

    #[tokio::test]
    async fn duplicate_group_leaves_store_unchanged() {
        let mut store = DataStore::new();
        store.insert_at(&DataPath::parse("Data").unwrap(), DataObject::Group).unwrap();
        let before = store.clone();
        let report = apply_filter(
            &CreateDataGroup,
            &mut store,
            &crate::args! { "output_path" => DataPath::parse("Data").unwrap() },
            &ExecutionContext::default(),
        )
        .await;
        assert_eq!(report.state, FilterState::Validated { ok: false });
        assert!(report.preflight.has_error(ErrorKind::DuplicateName));
        assert!(report.actions.is_empty());
        assert_eq!(store, before);
    }

    #[tokio::test]
    async fn root_path_is_rejected_by_schema() {
        let mut store = DataStore::new();
        let report = apply_filter(
            &CreateDataGroup,
            &mut store,
            &crate::args! { "output_path" => DataPath::root() },
            &ExecutionContext::default(),
        )
        .await;
        assert!(report.preflight.has_error(ErrorKind::ConstraintViolation));
    }
}
