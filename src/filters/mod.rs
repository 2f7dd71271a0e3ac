use crate::imports::*;
use std::ops::Range;

pub mod arithmetic;
pub mod create_array;
pub mod create_group;
pub mod delete;
pub mod rename;
pub mod resize;

/*
    Built-in filters:
    * CreateDataGroup - Creates an empty group
    * CreateDataArray - Creates an array and fills it with an initial value
    * DeleteData - Removes a node and its subtree
    * RenameDataObject - Renames a node in place
    * ResizeDataArray - Changes an array's tuple shape
    * ArrayScalarArithmetic - Combines every element of an array with one scalar

    Helpers shared by their phases live below.
*/

/// Elements processed between cancellation checks in execute phases.
pub const EXECUTE_CHUNK_LEN: usize = 1 << 16;

/// Warning code for a resize that drops or pads elements.
pub const RESIZE_CHANGES_ELEMENT_COUNT: i32 = 3001;
/// Warning code for a rename to the current name.
pub const RENAME_UNCHANGED: i32 = 3002;

pub fn register_builtins(registry: &mut FilterRegistry) -> Result<()> {
    registry.register(factory::<create_group::CreateDataGroup>())?;
    registry.register(factory::<create_array::CreateDataArray>())?;
    registry.register(factory::<delete::DeleteData>())?;
    registry.register(factory::<rename::RenameDataObject>())?;
    registry.register(factory::<resize::ResizeDataArray>())?;
    registry.register(factory::<arithmetic::ArrayScalarArithmetic>())?;
    Ok(())
}

/// Reports why a new object cannot be created at `path`, if it cannot.
pub(crate) fn check_new_path(store: &DataStore, path: &DataPath, outcome: &mut Outcome) {
    let Some(parent) = path.parent() else {
        outcome.push_error(StoreError::RootImmutable);
        return;
    };
    match store.get(&parent) {
        Ok(node) if node.object().is_container() => {
            if store.contains(path) {
                outcome.push_error(StoreError::DuplicateName {
                    parent,
                    name: path.name().unwrap_or_default().to_string(),
                });
            }
        }
        _ => outcome.push_error(StoreError::ParentNotFound(parent)),
    }
}

/// Calls `visit` over the array at `path` one chunk at a time, yielding to the runtime and
/// checking cancellation between chunks.
pub(crate) async fn visit_in_chunks<F>(
    store: &mut StoreAccess<'_>,
    path: &DataPath,
    context: &ExecutionContext,
    mut visit: F,
) -> Result<()>
where
    F: FnMut(ArrayDataMut<'_>, Range<usize>) -> std::result::Result<(), NumericError> + Send,
{
    let len = store.array(path)?.len();
    let mut start = 0;
    while start < len {
        context.check_cancelled()?;
        let end = (start + EXECUTE_CHUNK_LEN).min(len);
        visit(store.array_data_mut(path)?, start..end)?;
        tracing::trace!(start, end, len, "Processed chunk");
        start = end;
        tokio::task::yield_now().await;
    }
    Ok(())
}
