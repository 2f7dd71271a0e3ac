use crate::imports::*;

/*
    Types:
    * Action - One declarative store mutation produced by a preflight
    * ActionLog - Ordered actions; committed all-or-nothing against a DataStore
    * CommitError - Index and cause of the action that stopped a commit
    * Undo - Inverse of an applied action, replayed newest first when a commit fails
*/
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateArray {
        path: DataPath,
        numeric_type: NumericType,
        tuple_shape: Vec<usize>,
        components: usize,
    },
    CreateGroup {
        path: DataPath,
    },
    CreateGeometry {
        path: DataPath,
        kind: GeometryKind,
    },
    DeleteNode {
        path: DataPath,
    },
    RenameNode {
        path: DataPath,
        new_name: String,
    },
    ResizeArray {
        path: DataPath,
        tuple_shape: Vec<usize>,
    },
}

impl Action {
    pub fn path(&self) -> &DataPath {
        match self {
            Action::CreateArray { path, .. }
            | Action::CreateGroup { path }
            | Action::CreateGeometry { path, .. }
            | Action::DeleteNode { path }
            | Action::RenameNode { path, .. }
            | Action::ResizeArray { path, .. } => path,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateArray { .. } => "CreateArray",
            Action::CreateGroup { .. } => "CreateGroup",
            Action::CreateGeometry { .. } => "CreateGeometry",
            Action::DeleteNode { .. } => "DeleteNode",
            Action::RenameNode { .. } => "RenameNode",
            Action::ResizeArray { .. } => "ResizeArray",
        }
    }

    fn apply(&self, store: &mut DataStore) -> std::result::Result<Undo, StoreError> {
        match self {
            Action::CreateArray {
                path,
                numeric_type,
                tuple_shape,
                components,
            } => {
                let array = DataArray::new(*numeric_type, tuple_shape.clone(), *components)?;
                store.insert_at(path, DataObject::Array(array))?;
                Ok(Undo::Remove(path.clone()))
            }
            Action::CreateGroup { path } => {
                store.insert_at(path, DataObject::Group)?;
                Ok(Undo::Remove(path.clone()))
            }
            Action::CreateGeometry { path, kind } => {
                store.insert_at(path, DataObject::Geometry(*kind))?;
                Ok(Undo::Remove(path.clone()))
            }
            Action::DeleteNode { path } => {
                let parent = path.parent().ok_or(StoreError::RootImmutable)?;
                let position = store.position(path);
                let node = store.remove(path)?;
                Ok(Undo::Reattach {
                    parent,
                    node,
                    position,
                })
            }
            Action::RenameNode { path, new_name } => {
                let old_name = path.name().ok_or(StoreError::RootImmutable)?.to_string();
                let renamed = store.rename(path, new_name)?;
                Ok(Undo::Rename {
                    path: renamed,
                    old_name,
                })
            }
            Action::ResizeArray { path, tuple_shape } => {
                let mut resized = store.array(path)?.clone();
                resized.resize(tuple_shape.clone())?;
                let previous = store.replace_array(path, resized)?;
                Ok(Undo::Restore {
                    path: path.clone(),
                    array: previous,
                })
            }
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::CreateArray {
                path,
                numeric_type,
                tuple_shape,
                components,
            } => write!(
                f,
                "CreateArray '{}' ({} {:?} x {})",
                path, numeric_type, tuple_shape, components
            ),
            Action::CreateGroup { path } => write!(f, "CreateGroup '{}'", path),
            Action::CreateGeometry { path, kind } => {
                write!(f, "CreateGeometry '{}' ({:?})", path, kind)
            }
            Action::DeleteNode { path } => write!(f, "DeleteNode '{}'", path),
            Action::RenameNode { path, new_name } => {
                write!(f, "RenameNode '{}' -> '{}'", path, new_name)
            }
            Action::ResizeArray { path, tuple_shape } => {
                write!(f, "ResizeArray '{}' to {:?}", path, tuple_shape)
            }
        }
    }
}

enum Undo {
    Remove(DataPath),
    Reattach {
        parent: DataPath,
        node: DetachedNode,
        position: Option<usize>,
    },
    Rename {
        path: DataPath,
        old_name: String,
    },
    Restore {
        path: DataPath,
        array: DataArray,
    },
}

impl Undo {
    fn revert(self, store: &mut DataStore) -> std::result::Result<(), StoreError> {
        match self {
            Undo::Remove(path) => store.remove(&path).map(|_| ()),
            Undo::Reattach {
                parent,
                node,
                position,
            } => store.attach(&parent, node, position),
            Undo::Rename { path, old_name } => store.rename(&path, &old_name).map(|_| ()),
            Undo::Restore { path, array } => store.replace_array(&path, array).map(|_| ()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("action {index} ({action}) could not be applied: {source}")]
pub struct CommitError {
    pub index: usize,
    pub action: String,
    #[source]
    pub source: StoreError,
}

impl From<CommitError> for FilterError {
    fn from(err: CommitError) -> Self {
        let kind = FilterError::from(err.source.clone()).kind;
        FilterError::new(kind, err.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Applies every action in order. On failure the store is returned to its state before the call.
    #[tracing::instrument(skip(self, store), fields(action_count = self.actions.len()))]
    pub fn commit(&self, store: &mut DataStore) -> std::result::Result<(), CommitError> {
        let mut applied: Vec<Undo> = Vec::with_capacity(self.actions.len());
        for (index, action) in self.actions.iter().enumerate() {
            match action.apply(store) {
                Ok(undo) => {
                    tracing::debug!(index, action = %action, "Applied action");
                    applied.push(undo);
                }
                Err(source) => {
                    tracing::warn!(index, action = %action, error = %source, "Action failed, rolling back");
                    for undo in applied.into_iter().rev() {
                        if let Err(e) = undo.revert(store) {
                            tracing::warn!(error = %e, "Rollback step failed");
                        }
                    }
                    return Err(CommitError {
                        index,
                        action: action.to_string(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<Action>> for ActionLog {
    fn from(actions: Vec<Action>) -> Self {
        ActionLog { actions }
    }
}

impl FromIterator<Action> for ActionLog {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        ActionLog {
            actions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ActionLog {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_tracing;

    fn path(text: &str) -> DataPath {
        DataPath::parse(text).unwrap()
    }

    fn base_store() -> DataStore {
        let mut store = DataStore::new();
        store.insert_at(&path("Image"), DataObject::Geometry(GeometryKind::Image)).unwrap();
        store.insert_at(&path("Image/Cell Data"), DataObject::Group).unwrap();
        let array = DataArray::from_vec(vec![1i32, 2, 3, 4], vec![4], 1).unwrap();
        store
            .insert_at(&path("Image/Cell Data/Phases"), DataObject::Array(array))
            .unwrap();
        store
            .insert_at(&path("Image/Cell Data/Mask"), DataObject::Array(DataArray::new(NumericType::Bool, vec![4], 1).unwrap()))
            .unwrap();
        store
    }

    #[test]
    fn commit_applies_in_order() {
        init_tracing();
        let mut store = DataStore::new();
        let log = ActionLog::from(vec![
            Action::CreateGeometry {
                path: path("Grid"),
                kind: GeometryKind::RectilinearGrid,
            },
            Action::CreateGroup {
                path: path("Grid/Cell Data"),
            },
            Action::CreateArray {
                path: path("Grid/Cell Data/Density"),
                numeric_type: NumericType::Float64,
                tuple_shape: vec![2, 3],
                components: 1,
            },
        ]);
        log.commit(&mut store).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.array(&path("Grid/Cell Data/Density")).unwrap().len(), 6);
    }

    #[test]
    fn failed_commit_rolls_back_every_kind_of_action() {
        init_tracing();
        let mut store = base_store();
        let before = store.clone();
        let log = ActionLog::from(vec![
            Action::CreateGroup {
                path: path("Image/Extra"),
            },
            Action::ResizeArray {
                path: path("Image/Cell Data/Phases"),
                tuple_shape: vec![2],
            },
            Action::RenameNode {
                path: path("Image/Cell Data/Phases"),
                new_name: "Grains".to_string(),
            },
            Action::DeleteNode {
                path: path("Image/Cell Data/Mask"),
            },
            // Fails: the parent was never created.
            Action::CreateGroup {
                path: path("Missing/Child"),
            },
        ]);
        let err = log.commit(&mut store).unwrap_err();
        assert_eq!(err.index, 4);
        assert!(matches!(err.source, StoreError::ParentNotFound(_)));
        assert_eq!(store, before);
        // Restored array keeps its original contents.
        assert_eq!(
            store.array(&path("Image/Cell Data/Phases")).unwrap().as_slice::<i32>().unwrap(),
            &[1, 2, 3, 4]
        );
    }

    #[test]
    fn commit_error_maps_to_filter_error_kind() {
        let mut store = base_store();
        let log = ActionLog::from(vec![Action::CreateGroup {
            path: path("Image/Cell Data"),
        }]);
        let err: FilterError = log.commit(&mut store).unwrap_err().into();
        assert_eq!(err.kind, ErrorKind::DuplicateName);
        assert!(err.message.starts_with("action 0 (CreateGroup 'Image/Cell Data')"));
    }

    #[test]
    fn oversized_arrays_fail_the_commit_without_allocating() {
        let mut store = base_store();
        let before = store.clone();
        let log = ActionLog::from(vec![
            Action::CreateGroup {
                path: path("Image/Big"),
            },
            Action::CreateArray {
                path: path("Image/Big/Values"),
                numeric_type: NumericType::Int64,
                tuple_shape: vec![1 << 62],
                components: 1,
            },
        ]);
        let err = log.commit(&mut store).unwrap_err();
        assert_eq!(err.index, 1);
        assert!(matches!(err.source, StoreError::ArrayTooLarge { .. }));
        assert_eq!(store, before);

        let log = ActionLog::from(vec![Action::ResizeArray {
            path: path("Image/Cell Data/Phases"),
            tuple_shape: vec![usize::MAX / 2, 4],
        }]);
        let err: FilterError = log.commit(&mut store).unwrap_err().into();
        assert_eq!(err.kind, ErrorKind::ConstraintViolation);
        assert_eq!(store, before);
    }

    #[test]
    fn empty_log_is_a_no_op() {
        let mut store = base_store();
        let before = store.clone();
        ActionLog::new().commit(&mut store).unwrap();
        assert_eq!(store, before);
    }
}
