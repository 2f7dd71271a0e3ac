use crate::imports::*;

pub mod array;
#[cfg(test)]
mod tests;

/*
    Types:
    * DataStore - Tree of named DataObjects addressed by DataPath. Owns every node; parent links are
      slot indices used for traversal only.
    * DataObject - Payload of a node (Group, Geometry, Array)
    * ObjectKind - Type tag of a DataObject
    * GeometryKind - Label carried by geometry containers
    * NodeRef - Borrowed view of one resolved node
    * DetachedNode - Owned subtree returned by remove, re-attachable with attach
    * StoreAccess - Execute-phase view: reads plus array content writes, no structural mutation
    * StoreError - Failures of path resolution and tree mutation
*/
pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Image,
    RectilinearGrid,
    Vertex,
    Edge,
    Triangle,
    Quad,
    Tetrahedral,
    Hexahedral,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataObject {
    Group,
    Geometry(GeometryKind),
    Array(DataArray),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Group,
    Geometry,
    Array,
}

impl DataObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            DataObject::Group => ObjectKind::Group,
            DataObject::Geometry(_) => ObjectKind::Geometry,
            DataObject::Array(_) => ObjectKind::Array,
        }
    }

    /// Groups and geometries can hold children, arrays cannot.
    pub fn is_container(&self) -> bool {
        !matches!(self, DataObject::Array(_))
    }

    pub fn as_array(&self) -> Option<&DataArray> {
        match self {
            DataObject::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Group => f.write_str("group"),
            ObjectKind::Geometry => f.write_str("geometry"),
            ObjectKind::Array => f.write_str("array"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("no data object at '{0}'")]
    PathNotFound(DataPath),
    #[error("'{parent}' already contains an object named '{name}'")]
    DuplicateName { parent: DataPath, name: String },
    #[error("'{0}' does not resolve to a group or geometry")]
    ParentNotFound(DataPath),
    #[error("'{path}' is a {actual}, expected an array")]
    NotAnArray { path: DataPath, actual: ObjectKind },
    #[error("buffer holds {actual} elements but the declared shape needs {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("tuple shape {tuple_shape:?} with {components} components is too large to allocate")]
    ArrayTooLarge {
        tuple_shape: Vec<usize>,
        components: usize,
    },
    #[error("the store root cannot be removed, renamed or replaced")]
    RootImmutable,
    #[error(transparent)]
    InvalidName(#[from] DataPathError),
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: IndexMap<String, NodeId>,
    object: DataObject,
}

#[derive(Debug, Clone)]
pub struct DataStore {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
}

impl Default for DataStore {
    fn default() -> Self {
        DataStore {
            nodes: vec![Some(Node {
                name: String::new(),
                parent: None,
                children: IndexMap::new(),
                object: DataObject::Group,
            })],
            free: Vec::new(),
        }
    }
}

/// An owned subtree detached from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct DetachedNode {
    pub name: String,
    pub object: DataObject,
    pub children: Vec<DetachedNode>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: NodeId) -> &Node {
        // Ids handed out by resolve always point at live slots.
        self.nodes[id].as_ref().expect("live node id")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id].as_mut().expect("live node id")
    }

    /// Walks from the root one segment at a time.
    pub fn resolve(&self, path: &DataPath) -> std::result::Result<NodeId, StoreError> {
        let mut current = ROOT;
        for segment in path.segments() {
            current = *self
                .node(current)
                .children
                .get(segment)
                .ok_or_else(|| StoreError::PathNotFound(path.clone()))?;
        }
        Ok(current)
    }

    pub fn contains(&self, path: &DataPath) -> bool {
        self.resolve(path).is_ok()
    }

    pub fn get(&self, path: &DataPath) -> std::result::Result<NodeRef<'_>, StoreError> {
        let id = self.resolve(path)?;
        Ok(NodeRef { store: self, id })
    }

    pub fn object(&self, path: &DataPath) -> std::result::Result<&DataObject, StoreError> {
        let id = self.resolve(path)?;
        Ok(&self.node(id).object)
    }

    pub fn array(&self, path: &DataPath) -> std::result::Result<&DataArray, StoreError> {
        match self.object(path)? {
            DataObject::Array(array) => Ok(array),
            other => Err(StoreError::NotAnArray {
                path: path.clone(),
                actual: other.kind(),
            }),
        }
    }

    pub fn array_mut(&mut self, path: &DataPath) -> std::result::Result<&mut DataArray, StoreError> {
        let id = self.resolve(path)?;
        match &mut self.node_mut(id).object {
            DataObject::Array(array) => Ok(array),
            other => Err(StoreError::NotAnArray {
                path: path.clone(),
                actual: other.kind(),
            }),
        }
    }

    /// Names of the direct children of `path`, in insertion order.
    pub fn children(&self, path: &DataPath) -> std::result::Result<Vec<&str>, StoreError> {
        let id = self.resolve(path)?;
        Ok(self.node(id).children.keys().map(String::as_str).collect())
    }

    /// Number of nodes, root excluded.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every node path, depth first, parents before children.
    pub fn paths(&self) -> Vec<DataPath> {
        let mut out = Vec::new();
        self.collect_paths(ROOT, &DataPath::root(), &mut out);
        out
    }

    fn collect_paths(&self, id: NodeId, prefix: &DataPath, out: &mut Vec<DataPath>) {
        for (name, child) in &self.node(id).children {
            // Names in the tree were validated on insert.
            let mut segments = prefix.segments().to_vec();
            segments.push(name.clone());
            if let Ok(path) = DataPath::from_segments(segments) {
                out.push(path.clone());
                self.collect_paths(*child, &path, out);
            }
        }
    }

    fn container(&self, parent: &DataPath) -> std::result::Result<NodeId, StoreError> {
        let id = self
            .resolve(parent)
            .map_err(|_| StoreError::ParentNotFound(parent.clone()))?;
        if !self.node(id).object.is_container() {
            return Err(StoreError::ParentNotFound(parent.clone()));
        }
        Ok(id)
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    /// Adds `object` named `name` under the container at `parent`.
    #[tracing::instrument(level = "trace", skip(self, object), fields(kind = %object.kind()))]
    pub fn insert(
        &mut self,
        parent: &DataPath,
        name: &str,
        object: DataObject,
    ) -> std::result::Result<DataPath, StoreError> {
        let path = parent.child(name)?;
        let parent_id = self.container(parent)?;
        if self.node(parent_id).children.contains_key(name) {
            return Err(StoreError::DuplicateName {
                parent: parent.clone(),
                name: name.to_string(),
            });
        }
        let id = self.allocate(Node {
            name: name.to_string(),
            parent: Some(parent_id),
            children: IndexMap::new(),
            object,
        });
        self.node_mut(parent_id)
            .children
            .insert(name.to_string(), id);
        Ok(path)
    }

    /// Inserts at `path`, whose parent must already exist.
    pub fn insert_at(
        &mut self,
        path: &DataPath,
        object: DataObject,
    ) -> std::result::Result<(), StoreError> {
        let (parent, name) = split(path)?;
        self.insert(&parent, name, object).map(|_| ())
    }

    /// Detaches the subtree rooted at `path` and frees its slots.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, path: &DataPath) -> std::result::Result<DetachedNode, StoreError> {
        if path.is_root() {
            return Err(StoreError::RootImmutable);
        }
        let id = self.resolve(path)?;
        if let Some(parent) = self.node(id).parent {
            let name = self.node(id).name.clone();
            self.node_mut(parent).children.shift_remove(&name);
        }
        Ok(self.detach(id))
    }

    fn detach(&mut self, id: NodeId) -> DetachedNode {
        let node = self.nodes[id].take().expect("live node id");
        self.free.push(id);
        let children = node
            .children
            .values()
            .map(|child| self.detach(*child))
            .collect();
        DetachedNode {
            name: node.name,
            object: node.object,
            children,
        }
    }

    /// Re-attaches a detached subtree under `parent`. `position` restores sibling order.
    pub fn attach(
        &mut self,
        parent: &DataPath,
        subtree: DetachedNode,
        position: Option<usize>,
    ) -> std::result::Result<(), StoreError> {
        let parent_id = self.container(parent)?;
        if self.node(parent_id).children.contains_key(&subtree.name) {
            return Err(StoreError::DuplicateName {
                parent: parent.clone(),
                name: subtree.name,
            });
        }
        let name = subtree.name.clone();
        let id = self.attach_node(parent_id, subtree);
        let children = &mut self.node_mut(parent_id).children;
        match position {
            Some(index) if index < children.len() => {
                children.shift_insert(index, name, id);
            }
            _ => {
                children.insert(name, id);
            }
        }
        Ok(())
    }

    fn attach_node(&mut self, parent: NodeId, subtree: DetachedNode) -> NodeId {
        let id = self.allocate(Node {
            name: subtree.name,
            parent: Some(parent),
            children: IndexMap::new(),
            object: subtree.object,
        });
        for child in subtree.children {
            let child_name = child.name.clone();
            let child_id = self.attach_node(id, child);
            self.node_mut(id).children.insert(child_name, child_id);
        }
        id
    }

    /// Position of `path` among its siblings.
    pub fn position(&self, path: &DataPath) -> Option<usize> {
        let id = self.resolve(path).ok()?;
        let parent = self.node(id).parent?;
        self.node(parent).children.get_index_of(&self.node(id).name)
    }

    /// Renames the node at `path` in place, keeping its sibling position.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn rename(
        &mut self,
        path: &DataPath,
        new_name: &str,
    ) -> std::result::Result<DataPath, StoreError> {
        if path.is_root() {
            return Err(StoreError::RootImmutable);
        }
        let renamed = path.with_name(new_name)?;
        let id = self.resolve(path)?;
        let old_name = self.node(id).name.clone();
        if old_name == new_name {
            return Ok(renamed);
        }
        let parent = self.node(id).parent.ok_or(StoreError::RootImmutable)?;
        if self.node(parent).children.contains_key(new_name) {
            return Err(StoreError::DuplicateName {
                parent: path.parent().unwrap_or_default(),
                name: new_name.to_string(),
            });
        }
        let children = &mut self.node_mut(parent).children;
        if let Some(index) = children.get_index_of(&old_name) {
            children.shift_remove(&old_name);
            children.shift_insert(index, new_name.to_string(), id);
        }
        self.node_mut(id).name = new_name.to_string();
        Ok(renamed)
    }

    /// Swaps in a new array at `path`, returning the previous one.
    pub fn replace_array(
        &mut self,
        path: &DataPath,
        array: DataArray,
    ) -> std::result::Result<DataArray, StoreError> {
        let slot = self.array_mut(path)?;
        Ok(std::mem::replace(slot, array))
    }
}

fn split(path: &DataPath) -> std::result::Result<(DataPath, &str), StoreError> {
    match (path.parent(), path.name()) {
        (Some(parent), Some(name)) => Ok((parent, name)),
        _ => Err(StoreError::RootImmutable),
    }
}

// Structural comparison: names, sibling order and payloads, independent of slot ids.
impl PartialEq for DataStore {
    fn eq(&self, other: &Self) -> bool {
        fn same(a: &DataStore, a_id: NodeId, b: &DataStore, b_id: NodeId) -> bool {
            let (a_node, b_node) = (a.node(a_id), b.node(b_id));
            a_node.name == b_node.name
                && a_node.object == b_node.object
                && a_node.children.len() == b_node.children.len()
                && a_node
                    .children
                    .iter()
                    .zip(b_node.children.iter())
                    .all(|((a_name, a_child), (b_name, b_child))| {
                        a_name == b_name && same(a, *a_child, b, *b_child)
                    })
        }
        same(self, ROOT, other, ROOT)
    }
}

#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    store: &'a DataStore,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.store.node(self.id).name
    }

    pub fn object(&self) -> &'a DataObject {
        &self.store.node(self.id).object
    }

    pub fn kind(&self) -> ObjectKind {
        self.object().kind()
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let store = self.store;
        store
            .node(self.id)
            .children
            .values()
            .map(move |id| NodeRef { store, id: *id })
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.store
            .node(self.id)
            .parent
            .map(|id| NodeRef { store: self.store, id })
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

/// What an execute phase may do to the store: read anything, write array contents.
pub struct StoreAccess<'a> {
    store: &'a mut DataStore,
}

impl<'a> StoreAccess<'a> {
    pub fn new(store: &'a mut DataStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DataStore {
        self.store
    }

    pub fn array(&self, path: &DataPath) -> std::result::Result<&DataArray, StoreError> {
        self.store.array(path)
    }

    /// Element storage of the array at `path`. The buffer length is fixed through this view.
    pub fn array_data_mut(
        &mut self,
        path: &DataPath,
    ) -> std::result::Result<ArrayDataMut<'_>, StoreError> {
        Ok(self.store.array_mut(path)?.data_mut())
    }
}
