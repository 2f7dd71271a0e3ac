use crate::imports::*;

use super::RESIZE_CHANGES_ELEMENT_COUNT;

static RESIZE_DATA_ARRAY_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .parameter(
            ParameterSpecBuilder::new("array_path", ParamType::DataPath)
                .label("Array to Resize")
                .constraint(Constraint::NonEmpty)
                .build(),
        )
        .parameter(
            ParameterSpecBuilder::new("tuple_dimensions", ParamType::Dimensions)
                .label("New Tuple Dimensions")
                .hint("Elements past the new length are dropped, new elements are zero")
                .constraint(Constraint::NonEmpty)
                .constraint(Constraint::NoZeroEntries)
                .build(),
        )
        .build()
});

#[derive(Debug, Default)]
pub struct ResizeDataArray;

impl ResizeDataArray {
    pub const UUID: Uuid = Uuid::from_u128(0x1b4f9a8e_72c0_4b3d_8e5f_0c6d2a9b7e33);
}

#[async_trait::async_trait]
impl Filter for ResizeDataArray {
    fn identity(&self) -> FilterIdentity {
        FilterIdentity {
            uuid: Self::UUID,
            name: "ResizeDataArray",
            human_name: "Resize Data Array",
        }
    }

    fn parameters(&self) -> &'static ParameterSchema {
        &RESIZE_DATA_ARRAY_SCHEMA
    }

    fn preflight(&self, store: &DataStore, arguments: &Arguments) -> Result<PreflightResult> {
        let path = arguments.get_required_path("array_path")?;
        let tuple_shape = arguments.get_required_dimensions("tuple_dimensions")?;
        let array = match store.array(path) {
            Ok(array) => array,
            Err(e) => return Ok(Outcome::from_error(e).into()),
        };

        let new_len = match checked_len(array.numeric_type(), tuple_shape, array.components()) {
            Ok(len) => len,
            Err(e) => return Ok(Outcome::from_error(e).into()),
        };

        let mut result = PreflightResult::new();
        let old_len = array.len();
        if old_len != new_len {
            result.outcome.warn(
                RESIZE_CHANGES_ELEMENT_COUNT,
                format!(
                    "'{}' changes from {} to {} elements ({:?} -> {:?})",
                    path,
                    old_len,
                    new_len,
                    array.tuple_shape(),
                    tuple_shape
                ),
            );
        }
        result.push(Action::ResizeArray {
            path: path.clone(),
            tuple_shape: tuple_shape.to_vec(),
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

    #[tokio::test]
    async fn resize_keeps_length_invariant_and_warns() {
        let mut store = DataStore::new();
        let array = DataArray::from_vec(vec![1u32, 2, 3, 4, 5, 6], vec![3], 2).unwrap();
        store.insert_at(&path("Vectors"), DataObject::Array(array)).unwrap();

        let report = apply_filter(
            &ResizeDataArray,
            &mut store,
            &crate::args! { "array_path" => path("Vectors"), "tuple_dimensions" => vec![2usize, 2] },
            &ExecutionContext::default(),
        )
        .await;
        assert!(!report.is_failed());
        assert_eq!(report.preflight.warnings[0].code, RESIZE_CHANGES_ELEMENT_COUNT);
        let array = store.array(&path("Vectors")).unwrap();
        assert_eq!(array.tuple_shape(), &[2, 2]);
        assert_eq!(array.as_slice::<u32>().unwrap(), &[1, 2, 3, 4, 5, 6, 0, 0]);
    }

    #[tokio::test]
    async fn oversized_resize_fails_preflight() {
        let mut store = DataStore::new();
        let array = DataArray::from_vec(vec![1u8, 2], vec![2], 1).unwrap();
        store.insert_at(&path("Bytes"), DataObject::Array(array)).unwrap();

        let report = apply_filter(
            &ResizeDataArray,
            &mut store,
            &crate::args! { "array_path" => path("Bytes"), "tuple_dimensions" => vec![usize::MAX / 2, 4] },
            &ExecutionContext::default(),
        )
        .await;
        assert!(report.is_failed());
        assert!(report.preflight.has_error(ErrorKind::ConstraintViolation));
        assert!(!report.committed);
        assert_eq!(store.array(&path("Bytes")).unwrap().as_slice::<u8>().unwrap(), &[1, 2]);
    }

    #[tokio::test]
    async fn resizing_a_group_is_a_type_mismatch() {
        let mut store = DataStore::new();
        store.insert_at(&path("Group"), DataObject::Group).unwrap();
        let report = apply_filter(
            &ResizeDataArray,
            &mut store,
            &crate::args! { "array_path" => path("Group"), "tuple_dimensions" => vec![2usize] },
            &ExecutionContext::default(),
        )
        .await;
        assert!(report.preflight.has_error(ErrorKind::TypeMismatch));
    }
}
