use crate::imports::*;

static DELETE_DATA_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .parameter(
            ParameterSpecBuilder::new("removed_path", ParamType::DataPath)
                .label("Object to Delete")
                .hint("The node and everything below it is removed")
                .constraint(Constraint::NonEmpty)
                .build(),
        )
        .build()
});

#[derive(Debug, Default)]
pub struct DeleteData;

impl DeleteData {
    pub const UUID: Uuid = Uuid::from_u128(0x3fcd4c43_9d75_4f8a_9c3d_5b2e0a6e0d11);
}

#[async_trait::async_trait]
impl Filter for DeleteData {
    fn identity(&self) -> FilterIdentity {
        FilterIdentity {
            uuid: Self::UUID,
            name: "DeleteData",
            human_name: "Delete Data",
        }
    }

    fn parameters(&self) -> &'static ParameterSchema {
        &DELETE_DATA_SCHEMA
    }

    fn preflight(&self, store: &DataStore, arguments: &Arguments) -> Result<PreflightResult> {
        let path = arguments.get_required_path("removed_path")?;
        if !store.contains(path) {
            return Ok(Outcome::from_error(StoreError::PathNotFound(path.clone())).into());
        }
        Ok(PreflightResult::new().with_action(Action::DeleteNode { path: path.clone() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_tracing;

    fn path(text: &str) -> DataPath {
        DataPath::parse(text).unwrap()
    }

    #[tokio::test]
    async fn deleting_missing_node_reports_one_path_not_found() {
        init_tracing();
        let mut store = DataStore::new();
        let report = apply_filter(
            &DeleteData,
            &mut store,
            &crate::args! { "removed_path" => path("Never/Created") },
            &ExecutionContext::default(),
        )
        .await;
        let errors: Vec<&FilterError> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::PathNotFound);
        assert_eq!(errors[0].code, -1001);
    }

    #[tokio::test]
    async fn deletes_whole_subtree() {
        let mut store = DataStore::new();
        store.insert_at(&path("Image"), DataObject::Geometry(GeometryKind::Image)).unwrap();
        store.insert_at(&path("Image/Cell Data"), DataObject::Group).unwrap();
        store.insert_at(&path("Keep"), DataObject::Group).unwrap();
        let report = apply_filter(
            &DeleteData,
            &mut store,
            &crate::args! { "removed_path" => path("Image") },
            &ExecutionContext::default(),
        )
        .await;
        assert!(!report.is_failed());
        assert_eq!(store.paths(), vec![path("Keep")]);
    }
}
