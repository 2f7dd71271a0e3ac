use super::{Draft, PipelineItem, Ready};
use crate::imports::*;

/// Arguments of one enabled binding that failed schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingProblem {
    pub index: usize,
    pub filter_name: &'static str,
    pub errors: Vec<FilterError>,
}

impl std::fmt::Display for BindingProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}:", self.index, self.filter_name)?;
        for error in &self.errors {
            write!(f, " {};", error)?;
        }
        Ok(())
    }
}

/// Every binding problem found by `compile`, plus the draft so it can be fixed and recompiled.
#[derive(thiserror::Error)]
#[error("pipeline '{name}' has {} invalid filter bindings", .problems.len())]
pub struct CompileError {
    pub name: String,
    pub problems: Vec<BindingProblem>,
    draft: Pipeline<Draft>,
}

impl std::fmt::Debug for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileError")
            .field("pipeline", &self.name)
            .field("problems", &self.problems)
            .finish()
    }
}

impl CompileError {
    pub fn into_draft(self) -> Pipeline<Draft> {
        self.draft
    }
}

impl Pipeline<Draft> {
    pub fn new(name: impl Into<String>) -> Self {
        Pipeline {
            name: name.into(),
            items: Vec::new(),
            state: Draft,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Appends a binding and returns its index.
    pub fn push<F: Filter>(&mut self, filter: F, arguments: Arguments) -> usize {
        self.push_boxed(Box::new(filter), arguments)
    }

    pub fn push_boxed(&mut self, filter: Box<dyn Filter>, arguments: Arguments) -> usize {
        tracing::debug!(
            filter = filter.identity().name,
            index = self.items.len(),
            "Adding filter to pipeline"
        );
        self.items.push(PipelineItem::new(filter, arguments));
        self.items.len() - 1
    }

    pub fn insert(&mut self, index: usize, filter: Box<dyn Filter>, arguments: Arguments) -> Result<()> {
        if index > self.items.len() {
            return Err(anyhow::anyhow!(
                "Cannot insert at index {} in a pipeline of {} filters",
                index,
                self.items.len()
            ));
        }
        self.items.insert(index, PipelineItem::new(filter, arguments));
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<PipelineItem> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Moves the binding at `from` so it ends up at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        self.check_index(index)?;
        self.items[index].enabled = enabled;
        Ok(())
    }

    pub fn set_arguments(&mut self, index: usize, arguments: Arguments) -> Result<()> {
        self.check_index(index)?;
        self.items[index].arguments = arguments;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(anyhow::anyhow!(
                "Filter index {} is out of range for a pipeline of {} filters",
                index,
                self.items.len()
            ));
        }
        Ok(())
    }

    /// Validates every enabled binding's arguments. Nothing is run.
    pub fn problems(&self) -> Vec<BindingProblem> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.enabled)
            .filter_map(|(index, item)| {
                let outcome = item.filter.parameters().validate(&item.arguments);
                if outcome.is_ok() {
                    return None;
                }
                tracing::warn!(
                    index,
                    filter = item.filter.identity().name,
                    error_count = outcome.errors.len(),
                    "Invalid filter arguments"
                );
                Some(BindingProblem {
                    index,
                    filter_name: item.filter.identity().name,
                    errors: outcome.errors,
                })
            })
            .collect()
    }

    #[tracing::instrument(skip(self), fields(pipeline = %self.name, filter_count = self.items.len()))]
    pub fn compile(self) -> std::result::Result<Pipeline<Ready>, CompileError> {
        let problems = self.problems();
        if !problems.is_empty() {
            return Err(CompileError {
                name: self.name.clone(),
                problems,
                draft: self,
            });
        }
        tracing::debug!("Pipeline compilation successful");
        Ok(Pipeline {
            name: self.name,
            items: self.items,
            state: Ready(()),
        })
    }
}

impl Default for Pipeline<Draft> {
    fn default() -> Self {
        Pipeline::new("")
    }
}
