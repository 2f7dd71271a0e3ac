use crate::imports::*;

use super::RENAME_UNCHANGED;

static RENAME_DATA_OBJECT_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .parameter(
            ParameterSpecBuilder::new("source_path", ParamType::DataPath)
                .label("Object to Rename")
                .constraint(Constraint::NonEmpty)
                .build(),
        )
        .parameter(
            ParameterSpecBuilder::new("new_name", ParamType::String)
                .label("New Name")
                .constraint(Constraint::NonEmpty)
                .build(),
        )
        .build()
});

#[derive(Debug, Default)]
pub struct RenameDataObject;

impl RenameDataObject {
    pub const UUID: Uuid = Uuid::from_u128(0x911a3aa9_d3c2_4f66_9451_8861c4b12d4d);
}

#[async_trait::async_trait]
impl Filter for RenameDataObject {
    fn identity(&self) -> FilterIdentity {
        FilterIdentity {
            uuid: Self::UUID,
            name: "RenameDataObject",
            human_name: "Rename Data Object",
        }
    }

    fn parameters(&self) -> &'static ParameterSchema {
        &RENAME_DATA_OBJECT_SCHEMA
    }

    fn preflight(&self, store: &DataStore, arguments: &Arguments) -> Result<PreflightResult> {
        let path = arguments.get_required_path("source_path")?;
        let new_name = arguments.get_required_str("new_name")?;
        let mut result = PreflightResult::new();

        if !store.contains(path) {
            result.outcome.push_error(StoreError::PathNotFound(path.clone()));
        }
        let renamed = match path.with_name(new_name) {
            Ok(renamed) => renamed,
            Err(e) => {
                result.outcome.push_error(StoreError::from(e));
                return Ok(result);
            }
        };
        if result.outcome.is_failed() {
            return Ok(result);
        }

        if &renamed == path {
            result.outcome.warn(
                RENAME_UNCHANGED,
                format!("'{}' already has the name '{}'", path, new_name),
            );
            return Ok(result);
        }
        if store.contains(&renamed) {
            result.outcome.push_error(StoreError::DuplicateName {
                parent: path.parent().unwrap_or_default(),
                name: new_name.to_string(),
            });
        }
        result.push(Action::RenameNode {
            path: path.clone(),
            new_name: new_name.to_string(),
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> DataPath {
        DataPath::parse(text).unwrap()
    }

    fn store() -> DataStore {
        let mut store = DataStore::new();
        store.insert_at(&path("Cell Data"), DataObject::Group).unwrap();
        for name in ["Phases", "Euler"] {
            store
                .insert_at(
                    &path("Cell Data").child(name).unwrap(),
                    DataObject::Array(DataArray::new(NumericType::Int32, vec![2], 1).unwrap()),
                )
                .unwrap();
        }
        store
    }

    async fn rename(store: &mut DataStore, from: &str, to: &str) -> FilterReport {
        apply_filter(
            &RenameDataObject,
            store,
            &crate::args! { "source_path" => path(from), "new_name" => to },
            &ExecutionContext::default(),
        )
        .await
    }

    #[tokio::test]
    async fn renames_in_place() {
        let mut store = store();
        let report = rename(&mut store, "Cell Data/Phases", "Grains").await;
        assert!(!report.is_failed());
        assert_eq!(store.children(&path("Cell Data")).unwrap(), vec!["Grains", "Euler"]);
    }

    #[tokio::test]
    async fn sibling_collision_is_duplicate_name() {
        let mut store = store();
        let before = store.clone();
        let report = rename(&mut store, "Cell Data/Phases", "Euler").await;
        assert!(report.preflight.has_error(ErrorKind::DuplicateName));
        assert_eq!(store, before);
    }

    #[tokio::test]
    async fn invalid_name_is_a_constraint_violation() {
        let mut store = store();
        let report = rename(&mut store, "Cell Data/Phases", "a/b").await;
        assert!(report.preflight.has_error(ErrorKind::ConstraintViolation));
    }

    #[tokio::test]
    async fn same_name_warns_without_actions() {
        let mut store = store();
        let report = rename(&mut store, "Cell Data/Euler", "Euler").await;
        assert!(!report.is_failed());
        assert!(report.actions.is_empty());
        assert_eq!(report.preflight.warnings[0].code, RENAME_UNCHANGED);
    }
}
