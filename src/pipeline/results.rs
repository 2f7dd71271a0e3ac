use crate::imports::*;

/*
    Types:
    * FilterState - Where one filter invocation stopped in the preflight/commit/execute sequence
    * FilterReport - Outcomes, timing and final state of one filter invocation
    * PipelineResult - Ordered FilterReports of a run plus the failure point and run-level messages
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    Constructed,
    Validating,
    Validated { ok: bool },
    Executing,
    Executed { ok: bool },
    Skipped,
}

impl FilterState {
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            FilterState::Validated { ok: false } | FilterState::Executed { ok: false }
        )
    }
}

impl std::fmt::Display for FilterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterState::Constructed => f.write_str("constructed"),
            FilterState::Validating => f.write_str("validating"),
            FilterState::Validated { ok: true } => f.write_str("validated"),
            FilterState::Validated { ok: false } => f.write_str("validation failed"),
            FilterState::Executing => f.write_str("executing"),
            FilterState::Executed { ok: true } => f.write_str("executed"),
            FilterState::Executed { ok: false } => f.write_str("execution failed"),
            FilterState::Skipped => f.write_str("skipped"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterReport {
    pub index: usize,
    pub identity: FilterIdentity,
    pub state: FilterState,
    pub preflight: Outcome,
    pub execute: Option<Outcome>,
    pub actions: ActionLog,
    pub committed: bool,
    pub duration: Duration,
}

impl FilterReport {
    pub(crate) fn new(index: usize, identity: FilterIdentity) -> Self {
        FilterReport {
            index,
            identity,
            state: FilterState::Constructed,
            preflight: Outcome::new(),
            execute: None,
            actions: ActionLog::new(),
            committed: false,
            duration: Duration::ZERO,
        }
    }

    pub(crate) fn skipped(index: usize, identity: FilterIdentity) -> Self {
        let mut report = Self::new(index, identity);
        report.state = FilterState::Skipped;
        report
    }

    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }

    pub fn is_skipped(&self) -> bool {
        self.state == FilterState::Skipped
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.preflight
            .warnings
            .iter()
            .chain(self.execute.iter().flat_map(|o| o.warnings.iter()))
    }

    pub fn errors(&self) -> impl Iterator<Item = &FilterError> {
        self.preflight
            .errors
            .iter()
            .chain(self.execute.iter().flat_map(|o| o.errors.iter()))
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// Preflight and execute outcomes merged in phase order.
    pub fn outcome(&self) -> Outcome {
        let mut outcome = self.preflight.clone();
        if let Some(execute) = &self.execute {
            outcome.merge(execute.clone());
        }
        outcome
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineResult {
    pub reports: Vec<FilterReport>,
    pub failed_at: Option<usize>,
    pub cancelled: bool,
    /// Messages not owned by any one filter: cancellation, hook failures around the run.
    pub run: Outcome,
    pub duration: Duration,
}

impl PipelineResult {
    pub fn is_ok(&self) -> bool {
        self.failed_at.is_none() && self.run.is_ok()
    }

    pub fn is_failed(&self) -> bool {
        !self.is_ok()
    }

    pub fn report(&self, index: usize) -> Option<&FilterReport> {
        self.reports.iter().find(|r| r.index == index)
    }

    pub fn failed_report(&self) -> Option<&FilterReport> {
        self.failed_at.and_then(|index| self.report(index))
    }

    /// Every warning of the run, filters first in list order, then run-level ones.
    pub fn warnings(&self) -> Vec<&Warning> {
        self.reports
            .iter()
            .flat_map(|r| r.warnings())
            .chain(self.run.warnings.iter())
            .collect()
    }

    pub fn errors(&self) -> Vec<&FilterError> {
        self.reports
            .iter()
            .flat_map(|r| r.errors())
            .chain(self.run.errors.iter())
            .collect()
    }

    pub fn executed_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.state, FilterState::Executed { .. }))
            .count()
    }

    /// Flattened view for callers that only branch on `errors.is_empty()`.
    pub fn outcome(&self) -> Outcome {
        Outcome {
            warnings: self.warnings().into_iter().cloned().collect(),
            errors: self.errors().into_iter().cloned().collect(),
        }
    }
}

impl std::fmt::Display for PipelineResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for report in &self.reports {
            writeln!(
                f,
                "[{}] {} - {} ({} warnings, {} errors, {:?})",
                report.index,
                report.identity.name,
                report.state,
                report.warnings().count(),
                report.errors().count(),
                report.duration
            )?;
            for error in report.errors() {
                writeln!(f, "    error {}", error)?;
            }
            for warning in report.warnings() {
                writeln!(f, "    warning {}", warning)?;
            }
        }
        for error in &self.run.errors {
            writeln!(f, "run error {}", error)?;
        }
        for warning in &self.run.warnings {
            writeln!(f, "run warning {}", warning)?;
        }
        match self.failed_at {
            Some(index) => write!(f, "stopped at filter {}", index),
            None => write!(f, "completed"),
        }
    }
}
