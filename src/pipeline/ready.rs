use super::{Draft, Ready};
use crate::imports::*;

impl Pipeline<Ready> {
    /// Drives every binding in list order: preflight, commit, execute. Stops at the first filter
    /// that fails (or warns, under `halt_on_warnings`) and at a cancellation seen between filters.
    #[tracing::instrument(skip_all, fields(pipeline = %self.name, filter_count = self.items.len()))]
    pub async fn run(&self, store: &mut DataStore, context: &ExecutionContext) -> PipelineResult {
        let start_time = Instant::now();
        let services = context.services();
        let settings = context.settings();
        let mut result = PipelineResult::default();

        let info = hook_events::PipelineInfo {
            pipeline_name: self.name.clone(),
            filter_count: self.items.len(),
            preflight_only: settings.preflight_only,
        };
        if let Err(e) = services.before_run_pipeline(info).await {
            result.run.warn(HOOK_FAILURE_WARNING, e.to_string());
        }

        tracing::debug!("Starting pipeline run");
        for (index, item) in self.items.iter().enumerate() {
            if context.is_cancelled() {
                tracing::warn!(index, "Run cancelled before filter");
                result.run.error(
                    ErrorKind::Cancelled,
                    format!("run cancelled before filter {}", index),
                );
                result.cancelled = true;
                result.failed_at = Some(index);
                break;
            }
            if !item.enabled {
                tracing::debug!(index, filter = item.filter.identity().name, "Skipping disabled filter");
                result
                    .reports
                    .push(FilterReport::skipped(index, item.filter.identity()));
                continue;
            }

            let report = FilterRun {
                index,
                filter: item.filter.as_ref(),
                arguments: &item.arguments,
            }
            .apply(store, context)
            .await;

            let cancelled = report.errors().any(|e| e.kind == ErrorKind::Cancelled);
            let halted = report.is_failed() || (settings.halt_on_warnings && report.has_warnings());
            result.reports.push(report);
            if cancelled {
                result.cancelled = true;
            }
            if halted {
                tracing::warn!(index, cancelled, "Pipeline stopped at filter");
                result.failed_at = Some(index);
                break;
            }
        }
        result.duration = start_time.elapsed();

        let executed = hook_events::PipelineExecuted {
            pipeline_name: self.name.clone(),
            filter_count: self.items.len(),
            failed_at: result.failed_at,
            cancelled: result.cancelled,
            duration: result.duration,
            executed_at: Instant::now(),
        };
        if let Err(e) = services.after_run_pipeline(executed).await {
            result.run.warn(HOOK_FAILURE_WARNING, e.to_string());
        }
        tracing::debug!(
            duration_ms = result.duration.as_millis() as u64,
            failed_at = ?result.failed_at,
            "Pipeline run complete"
        );
        result
    }

    /// Plans and commits every filter against a copy of `store`, never executing. The caller's
    /// store is left untouched; the copy shows the shape the run would produce.
    pub async fn preflight(&self, store: &DataStore, context: &ExecutionContext) -> (DataStore, PipelineResult) {
        let mut scratch = store.clone();
        let settings = context.settings().preflight_only(true);
        let context = context.clone().with_settings(settings);
        let result = self.run(&mut scratch, &context).await;
        (scratch, result)
    }

    pub fn edit(self) -> Pipeline<Draft> {
        Pipeline {
            name: self.name,
            items: self.items,
            state: Draft,
        }
    }
}
