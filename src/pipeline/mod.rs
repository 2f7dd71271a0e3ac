use crate::imports::*;

pub mod draft;
pub mod file;
pub mod ready;
pub mod registry;
pub mod results;
pub mod traits;
pub mod validation;


/*
    Types:
    * Pipeline<T> - Ordered filter bindings, typestate over Draft (editable) and Ready (validated, runnable)
    * PipelineItem - One binding: a filter instance, its raw arguments and an enabled flag
    * Draft / Ready - Typestate markers

    Draft -> compile() -> Ready -> edit() -> Draft. Only a Ready pipeline can be run, and compiling
    checks every enabled binding's arguments against its filter's schema.
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct Draft;

#[derive(Debug, Clone, Copy)]
pub struct Ready(());

pub struct PipelineItem {
    pub(crate) filter: Box<dyn Filter>,
    pub(crate) arguments: Arguments,
    pub(crate) enabled: bool,
}

impl PipelineItem {
    pub fn new(filter: Box<dyn Filter>, arguments: Arguments) -> Self {
        PipelineItem {
            filter,
            arguments,
            enabled: true,
        }
    }

    pub fn filter(&self) -> &dyn Filter {
        self.filter.as_ref()
    }

    pub fn identity(&self) -> FilterIdentity {
        self.filter.identity()
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl std::fmt::Debug for PipelineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineItem")
            .field("filter", &self.filter.identity().name)
            .field("arguments", &self.arguments)
            .field("enabled", &self.enabled)
            .finish()
    }
}

pub struct Pipeline<T = Draft> {
    pub(crate) name: String,
    pub(crate) items: Vec<PipelineItem>,
    pub(crate) state: T,
}

impl<T> Pipeline<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[PipelineItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&PipelineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("items", &self.items)
            .field("state", &self.state)
            .finish()
    }
}
