use crate::imports::*;

/*
    Types:
    * RunSettings - Switches that change how a pipeline run drives each filter
    * ExecutionContext - Explicit per-run context: services, extensions and settings. Passed to every
      execute call; there is no process-wide current store or configuration.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSettings {
    pub preflight_only: bool,
    pub halt_on_warnings: bool,
}

impl RunSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan and commit every filter but never call execute.
    pub fn preflight_only(mut self, value: bool) -> Self {
        self.preflight_only = value;
        self
    }

    /// Stop the run at the first filter that reports a warning.
    pub fn halt_on_warnings(mut self, value: bool) -> Self {
        self.halt_on_warnings = value;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExecutionContext {
    services: PipelineServices,
    extensions: Extensions,
    settings: RunSettings,
}

impl ExecutionContext {
    pub fn new(services: PipelineServices) -> Self {
        ExecutionContext {
            services,
            extensions: Extensions::new(),
            settings: RunSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RunSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_extension<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    pub fn services(&self) -> &PipelineServices {
        &self.services
    }

    pub fn is_cancelled(&self) -> bool {
        self.extensions.is_cancelled()
    }

    pub fn cancel(&self) {
        self.extensions.cancel();
    }

    /// Fails with a Cancelled error once cancellation was requested. For use inside execute loops.
    pub fn check_cancelled(&self) -> std::result::Result<(), FilterError> {
        if self.is_cancelled() {
            return Err(FilterError::new(
                ErrorKind::Cancelled,
                "execution cancelled",
            ));
        }
        Ok(())
    }
}
