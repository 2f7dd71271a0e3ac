/*
    Pipeline services module:
    * A pipeline service is a type that observes or supports a run without being a filter.
    * PipelineServices is stored in the ExecutionContext and fans each call out to every registered service.

    EventHooks observe the filter state machine: before/after each phase and around the whole run.
    A failing hook never stops a run; the runner records the failure as a warning.
*/
use crate::imports::*;

pub mod hook_events;

mod event_hooks {
    // Built-in implementations of EventHooks
    pub mod debug;
}

pub use event_hooks::debug::DebugEventHooks;

/// Warning code attached to a run or phase when an event hook fails.
pub const HOOK_FAILURE_WARNING: i32 = 2001;

/*
    Hook dispatch helper - collects errors from multiple hook calls and aggregates them into a single Result.
*/
fn collect_hook_errors(errors: Vec<anyhow::Error>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        let msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(anyhow::anyhow!("Hook service errors: {msg}"))
    }
}

macro_rules! hook_dispatch {
    ($method:ident, $event_ty:ty) => {
        pub async fn $method(&self, event: $event_ty) -> Result<()> {
            let mut errors = Vec::new();
            for hook in &self.hooks {
                if let Err(e) = hook.$method(&event).await {
                    errors.push(e);
                }
            }
            collect_hook_errors(errors)
        }
    };
}

#[derive(Clone, Default)]
pub struct PipelineServices {
    hooks: Vec<Arc<dyn EventHooks>>,
}

impl std::fmt::Debug for PipelineServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineServices")
            .field("hooks_count", &self.hooks.len())
            .finish()
    }
}

impl PipelineServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hook<T: EventHooks + 'static>(&mut self, hook: T) {
        self.hooks.push(Arc::new(hook));
    }

    pub fn add_shared_hook(&mut self, hook: Arc<dyn EventHooks>) {
        self.hooks.push(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    // Run
    hook_dispatch!(before_run_pipeline, hook_events::PipelineInfo);
    hook_dispatch!(after_run_pipeline, hook_events::PipelineExecuted);

    // Filter phases
    hook_dispatch!(before_preflight_filter, hook_events::FilterInfo);
    hook_dispatch!(after_preflight_filter, hook_events::FilterPreflighted);
    hook_dispatch!(before_execute_filter, hook_events::FilterInfo);
    hook_dispatch!(after_execute_filter, hook_events::FilterExecuted);

    pub fn defaults() -> Self {
        let mut services = Self::new();
        #[cfg(debug_assertions)]
        {
            services.add_hook(DebugEventHooks);
        }
        services
    }
}

/*
    Service traits:
    * EventHooks - Observers of run and filter phase transitions.

    Default impls on all methods so that types only need to implement what they care about.
*/
#[allow(unused_variables)]
#[async_trait::async_trait]
pub trait EventHooks: Send + Sync {
    async fn before_run_pipeline(&self, event: &hook_events::PipelineInfo) -> Result<()> {
        Ok(())
    }
    async fn after_run_pipeline(&self, event: &hook_events::PipelineExecuted) -> Result<()> {
        Ok(())
    }

    async fn before_preflight_filter(&self, event: &hook_events::FilterInfo) -> Result<()> {
        Ok(())
    }
    async fn after_preflight_filter(&self, event: &hook_events::FilterPreflighted) -> Result<()> {
        Ok(())
    }
    async fn before_execute_filter(&self, event: &hook_events::FilterInfo) -> Result<()> {
        Ok(())
    }
    async fn after_execute_filter(&self, event: &hook_events::FilterExecuted) -> Result<()> {
        Ok(())
    }
}
