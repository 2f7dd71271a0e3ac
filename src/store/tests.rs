use super::*;
use crate::test_utils::init_tracing;

fn path(text: &str) -> DataPath {
    DataPath::parse(text).unwrap()
}

fn sample_store() -> DataStore {
    let mut store = DataStore::new();
    store
        .insert(&DataPath::root(), "Image", DataObject::Geometry(GeometryKind::Image))
        .unwrap();
    store
        .insert(&path("Image"), "Cell Data", DataObject::Group)
        .unwrap();
    store
        .insert(
            &path("Image/Cell Data"),
            "Phases",
            DataObject::Array(DataArray::new(NumericType::Int32, vec![4], 1).unwrap()),
        )
        .unwrap();
    store
        .insert(
            &path("Image/Cell Data"),
            "Euler",
            DataObject::Array(DataArray::new(NumericType::Float32, vec![4], 3).unwrap()),
        )
        .unwrap();
    store
}

#[test]
fn resolve_after_insert_returns_node() {
    init_tracing();
    let store = sample_store();
    let node = store.get(&path("Image/Cell Data/Phases")).unwrap();
    assert_eq!(node.name(), "Phases");
    assert_eq!(node.kind(), ObjectKind::Array);
    assert_eq!(node.parent().unwrap().name(), "Cell Data");
    assert_eq!(store.len(), 4);
}

#[test]
fn resolve_root_is_the_root_group() {
    let store = DataStore::new();
    let root = store.get(&DataPath::root()).unwrap();
    assert_eq!(root.kind(), ObjectKind::Group);
    assert!(store.is_empty());
}

#[test]
fn resolve_after_remove_is_not_found() {
    init_tracing();
    let mut store = sample_store();
    let target = path("Image/Cell Data/Phases");
    store.remove(&target).unwrap();
    assert_eq!(
        store.resolve(&target).unwrap_err(),
        StoreError::PathNotFound(target.clone())
    );
    assert_eq!(store.len(), 3);
}

#[test]
fn remove_takes_whole_subtree() {
    let mut store = sample_store();
    let detached = store.remove(&path("Image/Cell Data")).unwrap();
    assert_eq!(detached.children.len(), 2);
    assert_eq!(store.len(), 1);
    assert!(!store.contains(&path("Image/Cell Data/Euler")));
}

#[test]
fn remove_missing_path_fails() {
    let mut store = sample_store();
    let before = store.clone();
    assert!(matches!(
        store.remove(&path("Nope")),
        Err(StoreError::PathNotFound(_))
    ));
    assert_eq!(store, before);
}

#[test]
fn root_cannot_be_removed() {
    let mut store = sample_store();
    assert_eq!(
        store.remove(&DataPath::root()).unwrap_err(),
        StoreError::RootImmutable
    );
}

#[test]
fn duplicate_insert_leaves_store_unchanged() {
    init_tracing();
    let mut store = sample_store();
    let before = store.clone();
    let count = store.len();
    let err = store
        .insert(&path("Image"), "Cell Data", DataObject::Group)
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName { .. }));
    assert_eq!(store.len(), count);
    assert_eq!(store, before);
}

#[test]
fn insert_requires_existing_container_parent() {
    let mut store = sample_store();
    assert_eq!(
        store
            .insert(&path("Missing"), "X", DataObject::Group)
            .unwrap_err(),
        StoreError::ParentNotFound(path("Missing"))
    );
    // Arrays cannot hold children.
    assert_eq!(
        store
            .insert(&path("Image/Cell Data/Phases"), "X", DataObject::Group)
            .unwrap_err(),
        StoreError::ParentNotFound(path("Image/Cell Data/Phases"))
    );
}

#[test]
fn no_implicit_intermediate_groups() {
    let mut store = DataStore::new();
    let err = store
        .insert_at(&path("a/b/c"), DataObject::Group)
        .unwrap_err();
    assert!(matches!(err, StoreError::ParentNotFound(_)));
    assert!(store.is_empty());
}

#[test]
fn insert_rejects_invalid_names() {
    let mut store = DataStore::new();
    let err = store
        .insert(&DataPath::root(), "a/b", DataObject::Group)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidName(_)));
}

#[test]
fn rename_keeps_position_and_children() {
    let mut store = sample_store();
    let renamed = store
        .rename(&path("Image/Cell Data/Phases"), "Grains")
        .unwrap();
    assert_eq!(renamed, path("Image/Cell Data/Grains"));
    assert_eq!(
        store.children(&path("Image/Cell Data")).unwrap(),
        vec!["Grains", "Euler"]
    );
    store.rename(&path("Image"), "Volume").unwrap();
    assert!(store.contains(&path("Volume/Cell Data/Euler")));
}

#[test]
fn rename_to_sibling_name_fails() {
    let mut store = sample_store();
    let before = store.clone();
    let err = store
        .rename(&path("Image/Cell Data/Phases"), "Euler")
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName { .. }));
    assert_eq!(store, before);
}

#[test]
fn detach_and_attach_restores_equal_store() {
    let mut store = sample_store();
    let before = store.clone();
    let target = path("Image/Cell Data/Phases");
    let position = store.position(&target);
    let subtree = store.remove(&target).unwrap();
    assert_ne!(store, before);
    store
        .attach(&path("Image/Cell Data"), subtree, position)
        .unwrap();
    assert_eq!(store, before);
}

#[test]
fn freed_slots_are_reused() {
    let mut store = sample_store();
    store.remove(&path("Image/Cell Data/Euler")).unwrap();
    store
        .insert(&path("Image"), "Extra", DataObject::Group)
        .unwrap();
    assert_eq!(store.nodes.len(), 5);
}

#[test]
fn array_accessors_check_kind() {
    let mut store = sample_store();
    assert_eq!(
        store.array(&path("Image/Cell Data/Euler")).unwrap().len(),
        12
    );
    assert!(matches!(
        store.array(&path("Image")),
        Err(StoreError::NotAnArray {
            actual: ObjectKind::Geometry,
            ..
        })
    ));
    let array = store.array_mut(&path("Image/Cell Data/Phases")).unwrap();
    array.fill("3").unwrap();
    assert_eq!(
        store
            .array(&path("Image/Cell Data/Phases"))
            .unwrap()
            .as_slice::<i32>()
            .unwrap(),
        &[3, 3, 3, 3]
    );
}

#[test]
fn paths_lists_depth_first() {
    let store = sample_store();
    let listed: Vec<String> = store.paths().iter().map(|p| p.to_string()).collect();
    assert_eq!(
        listed,
        vec![
            "Image",
            "Image/Cell Data",
            "Image/Cell Data/Phases",
            "Image/Cell Data/Euler"
        ]
    );
}

#[test]
fn store_access_writes_contents_only() {
    let mut store = sample_store();
    {
        let mut access = StoreAccess::new(&mut store);
        let data = access
            .array_data_mut(&path("Image/Cell Data/Phases"))
            .unwrap();
        struct SetIndex;
        impl SliceVisitorMut for SetIndex {
            type Output = ();
            fn visit<T: Element>(self, values: &mut [T]) {
                if let Some(first) = values.first_mut() {
                    *first = T::parse_text("9").unwrap_or_default();
                }
            }
        }
        data.visit(SetIndex);
    }
    assert_eq!(
        store
            .array(&path("Image/Cell Data/Phases"))
            .unwrap()
            .as_slice::<i32>()
            .unwrap(),
        &[9, 0, 0, 0]
    );
}
