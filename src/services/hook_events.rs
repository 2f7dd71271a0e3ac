/*
    Types for supporting the EventHooks trait:
    * PipelineInfo - Fired before a run starts
    * PipelineExecuted - Fired once a run stops, successful or not
    * FilterInfo - Fired before a filter phase
    * FilterPreflighted - Fired after preflight (and commit, when preflight succeeded)
    * FilterExecuted - Fired after execute
*/
use crate::imports::*;

#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub pipeline_name: String,
    pub filter_count: usize,
    pub preflight_only: bool,
}

#[derive(Debug, Clone)]
pub struct PipelineExecuted {
    pub pipeline_name: String,
    pub filter_count: usize,
    pub failed_at: Option<usize>,
    pub cancelled: bool,
    pub duration: Duration,
    pub executed_at: Instant,
}

#[derive(Debug, Clone)]
pub struct FilterInfo {
    pub index: usize,
    pub uuid: Uuid,
    pub filter_name: &'static str,
}

#[derive(Debug, Clone)]
pub struct FilterPreflighted {
    pub index: usize,
    pub uuid: Uuid,
    pub filter_name: &'static str,
    pub action_count: usize,
    pub committed: bool,
    pub warning_count: usize,
    pub error_count: usize,
}

#[derive(Debug, Clone)]
pub struct FilterExecuted {
    pub index: usize,
    pub uuid: Uuid,
    pub filter_name: &'static str,
    pub warning_count: usize,
    pub error_count: usize,
    pub executed_at: Instant,
}
