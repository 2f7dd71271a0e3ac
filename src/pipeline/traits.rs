use crate::imports::*;

/*
    Types:
    * FilterIdentity - Stable uuid plus names of a filter type
    * PreflightResult - Action log and outcome returned by a preflight
    * FilterFactory - Factory function type for creating filter instances
    * FilterRun - Drives one filter through validate, preflight, commit and execute, like a wrapper
      around the filter: timing, hooks and error conversion live here, not in filter bodies
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterIdentity {
    pub uuid: Uuid,
    pub name: &'static str,
    pub human_name: &'static str,
}

impl std::fmt::Display for FilterIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.uuid)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreflightResult {
    pub actions: ActionLog,
    pub outcome: Outcome,
}

impl PreflightResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }
}

impl From<Outcome> for PreflightResult {
    fn from(outcome: Outcome) -> Self {
        PreflightResult {
            actions: ActionLog::new(),
            outcome,
        }
    }
}

pub type FilterFactory = Box<dyn Fn() -> Box<dyn Filter> + Send + Sync>;

/// Factory for any filter type with a Default constructor.
pub fn factory<F: Filter + Default>() -> FilterFactory {
    Box::new(|| Box::new(F::default()) as Box<dyn Filter>)
}

/*
    Traits:
    * Filter - The capability set the engine needs: identity, parameter schema, preflight, execute.

    preflight reads the store and returns the mutations it wants as Actions; it must not change anything
    and may be called any number of times. execute runs after the engine committed those actions and gets
    a StoreAccess, which allows array content writes but no structural change.
    Both phases return anyhow::Result; an Err becomes one error in the phase Outcome, keeping its
    ErrorKind when it is a FilterError, StoreError or NumericError.
*/
#[async_trait::async_trait]
pub trait Filter: Send + Sync + 'static {
    fn identity(&self) -> FilterIdentity;

    fn parameters(&self) -> &'static ParameterSchema;

    fn preflight(&self, store: &DataStore, arguments: &Arguments) -> Result<PreflightResult>;

    async fn execute(
        &self,
        _store: &mut StoreAccess<'_>,
        _arguments: &Arguments,
        _context: &ExecutionContext,
    ) -> Result<Outcome> {
        Ok(Outcome::new())
    }
}

pub(crate) struct FilterRun<'a> {
    pub(crate) index: usize,
    pub(crate) filter: &'a dyn Filter,
    pub(crate) arguments: &'a Arguments,
}

impl FilterRun<'_> {
    fn info(&self, identity: &FilterIdentity) -> hook_events::FilterInfo {
        hook_events::FilterInfo {
            index: self.index,
            uuid: identity.uuid,
            filter_name: identity.name,
        }
    }

    /// Schema validation then the filter's own preflight. Actions are dropped when anything failed.
    fn plan(&self, store: &DataStore) -> (Arguments, ActionLog, Outcome) {
        let (resolved, mut outcome) = self.filter.parameters().resolve(self.arguments);
        if outcome.is_failed() {
            tracing::debug!(error_count = outcome.errors.len(), "Arguments rejected, preflight skipped");
            return (resolved, ActionLog::new(), outcome);
        }
        let actions = match self.filter.preflight(store, &resolved) {
            Ok(PreflightResult {
                actions,
                outcome: filter_outcome,
            }) => {
                outcome.merge(filter_outcome);
                actions
            }
            Err(e) => {
                outcome.push_error(FilterError::from_anyhow(&e));
                ActionLog::new()
            }
        };
        if outcome.is_failed() {
            return (resolved, ActionLog::new(), outcome);
        }
        (resolved, actions, outcome)
    }

    #[tracing::instrument(skip_all, fields(
        index = self.index,
        filter = self.filter.identity().name,
        uuid = %self.filter.identity().uuid,
    ))]
    pub(crate) async fn apply(&self, store: &mut DataStore, context: &ExecutionContext) -> FilterReport {
        let start_time = Instant::now();
        let identity = self.filter.identity();
        let services = context.services();
        let mut report = FilterReport::new(self.index, identity);

        report.state = FilterState::Validating;
        if let Err(e) = services.before_preflight_filter(self.info(&identity)).await {
            report.preflight.warn(HOOK_FAILURE_WARNING, e.to_string());
        }

        let (resolved, actions, outcome) = self.plan(store);
        report.preflight.merge(outcome);
        if report.preflight.is_ok() {
            match actions.commit(store) {
                Ok(()) => {
                    report.committed = true;
                    report.actions = actions;
                }
                Err(e) => report.preflight.push_error(e),
            }
        }
        report.state = FilterState::Validated {
            ok: report.preflight.is_ok(),
        };
        tracing::debug!(
            action_count = report.actions.len(),
            warning_count = report.preflight.warnings.len(),
            error_count = report.preflight.errors.len(),
            "Preflight complete"
        );

        let preflighted = hook_events::FilterPreflighted {
            index: self.index,
            uuid: identity.uuid,
            filter_name: identity.name,
            action_count: report.actions.len(),
            committed: report.committed,
            warning_count: report.preflight.warnings.len(),
            error_count: report.preflight.errors.len(),
        };
        if let Err(e) = services.after_preflight_filter(preflighted).await {
            report.preflight.warn(HOOK_FAILURE_WARNING, e.to_string());
        }

        if report.preflight.is_failed() || context.settings().preflight_only {
            report.duration = start_time.elapsed();
            return report;
        }

        report.state = FilterState::Executing;
        let mut outcome = Outcome::new();
        if let Err(e) = services.before_execute_filter(self.info(&identity)).await {
            outcome.warn(HOOK_FAILURE_WARNING, e.to_string());
        }

        let mut access = StoreAccess::new(store);
        match self.filter.execute(&mut access, &resolved, context).await {
            Ok(filter_outcome) => outcome.merge(filter_outcome),
            Err(e) => {
                tracing::warn!(error = %e, "Execute failed");
                outcome.push_error(FilterError::from_anyhow(&e));
            }
        }
        report.state = FilterState::Executed {
            ok: outcome.is_ok(),
        };

        let executed = hook_events::FilterExecuted {
            index: self.index,
            uuid: identity.uuid,
            filter_name: identity.name,
            warning_count: outcome.warnings.len(),
            error_count: outcome.errors.len(),
            executed_at: Instant::now(),
        };
        if let Err(e) = services.after_execute_filter(executed).await {
            outcome.warn(HOOK_FAILURE_WARNING, e.to_string());
        }
        report.execute = Some(outcome);
        report.duration = start_time.elapsed();
        tracing::debug!(
            duration_ms = report.duration.as_millis() as u64,
            state = %report.state,
            "Filter complete"
        );
        report
    }
}

/// Runs one filter outside a pipeline: validate, preflight, commit, then execute unless the
/// context asks for preflight only.
pub async fn apply_filter(
    filter: &dyn Filter,
    store: &mut DataStore,
    arguments: &Arguments,
    context: &ExecutionContext,
) -> FilterReport {
    FilterRun {
        index: 0,
        filter,
        arguments,
    }
    .apply(store, context)
    .await
}
