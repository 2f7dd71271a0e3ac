/*
    An implementation of EventHooks that logs every event at debug level.
*/

use crate::imports::*;

pub struct DebugEventHooks;

#[async_trait::async_trait]
impl EventHooks for DebugEventHooks {
    async fn before_run_pipeline(&self, event: &hook_events::PipelineInfo) -> Result<()> {
        tracing::debug!(?event, "DebugEventHooks - before_run_pipeline");
        Ok(())
    }
    async fn after_run_pipeline(&self, event: &hook_events::PipelineExecuted) -> Result<()> {
        tracing::debug!(?event, "DebugEventHooks - after_run_pipeline");
        Ok(())
    }

    async fn before_preflight_filter(&self, event: &hook_events::FilterInfo) -> Result<()> {
        tracing::debug!(?event, "DebugEventHooks - before_preflight_filter");
        Ok(())
    }
    async fn after_preflight_filter(&self, event: &hook_events::FilterPreflighted) -> Result<()> {
        tracing::debug!(?event, "DebugEventHooks - after_preflight_filter");
        Ok(())
    }
    async fn before_execute_filter(&self, event: &hook_events::FilterInfo) -> Result<()> {
        tracing::debug!(?event, "DebugEventHooks - before_execute_filter");
        Ok(())
    }
    async fn after_execute_filter(&self, event: &hook_events::FilterExecuted) -> Result<()> {
        tracing::debug!(?event, "DebugEventHooks - after_execute_filter");
        Ok(())
    }
}
