mod actions;
mod extensions;
mod filters;
mod pipeline;
mod result;
mod services;
mod spec;
mod store;
mod values;

#[cfg(test)]
pub(crate) mod test_utils;

// Library exports
pub mod prelude {
    // Built-in filters
    pub use crate::filters::arithmetic::ArrayScalarArithmetic;
    pub use crate::filters::create_array::CreateDataArray;
    pub use crate::filters::create_group::CreateDataGroup;
    pub use crate::filters::delete::DeleteData;
    pub use crate::filters::rename::RenameDataObject;
    pub use crate::filters::resize::ResizeDataArray;
    pub use crate::filters::{RENAME_UNCHANGED, RESIZE_CHANGES_ELEMENT_COUNT};

    // Pipeline
    pub use crate::pipeline::draft::{BindingProblem, CompileError};
    pub use crate::pipeline::file::{FilterEntry, PIPELINE_FILE_VERSION, PipelineDocument};
    pub use crate::pipeline::registry::FilterRegistry;
    pub use crate::pipeline::results::{FilterReport, FilterState, PipelineResult};
    pub use crate::pipeline::traits::{
        Filter, FilterFactory, FilterIdentity, PreflightResult, apply_filter, factory,
    };
    pub use crate::pipeline::{Draft, Pipeline, PipelineItem, Ready};

    // Data store
    pub use crate::store::array::{DataArray, SliceVisitorMut};
    pub use crate::store::{
        DataObject, DataStore, DetachedNode, GeometryKind, NodeRef, ObjectKind, StoreAccess, StoreError,
    };
    pub use crate::values::data_path::{DataPath, DataPathError};
    pub use crate::values::numeric::{ArithmeticOp, Element, NumericError, NumericType, NumericVisitor};

    // Parameters
    pub use crate::spec::builder::{ParameterSpecBuilder, SchemaBuilder};
    pub use crate::spec::{Constraint, ParamType, ParameterSchema};
    pub use crate::values::arguments::{ArgValue, Arguments};

    // Results and actions
    pub use crate::actions::{Action, ActionLog};
    pub use crate::result::{ErrorKind, FilterError, Outcome, Warning};

    // Context and services
    pub use crate::extensions::Extensions;
    pub use crate::services::hook_events;
    pub use crate::services::{DebugEventHooks, EventHooks, HOOK_FAILURE_WARNING, PipelineServices};
    pub use crate::values::context::{ExecutionContext, RunSettings};
}

// Internal imports for use within the crate
#[allow(unused_imports)]
pub(crate) mod imports {
    // Values
    pub use crate::values::arguments::{ArgValue, Arguments, JsonMap, JsonValue};
    pub use crate::values::context::{ExecutionContext, RunSettings};
    pub use crate::values::data_path::{DataPath, DataPathError, PATH_SEPARATOR};
    pub use crate::values::numeric::{
        ALL_NUMERIC_TYPES, ARITHMETIC_OP_NAMES, ArithmeticOp, Element, NumericError, NumericType,
        NumericVisitor, normalize_text,
    };

    // Store
    pub use crate::store::array::{
        ArrayData, ArrayDataMut, ArrayVisitor, ArrayVisitorMut, DataArray, SliceVisitorMut,
        checked_len, element_count,
    };
    pub use crate::store::{
        DataObject, DataStore, DetachedNode, GeometryKind, NodeId, NodeRef, ObjectKind, StoreAccess,
        StoreError,
    };

    // Results and actions
    pub use crate::actions::{Action, ActionLog, CommitError};
    pub use crate::result::{ErrorKind, FilterError, Outcome, Warning};

    // Parameter schema
    pub use crate::pipeline::validation::{resolve_json_arguments, validate_arguments};
    pub use crate::spec::builder::{ParameterSpecBuilder, SchemaBuilder};
    pub use crate::spec::parameter::ParameterSpec;
    pub use crate::spec::{
        Constraint, DATA_OBJECT_NAME_POLICY, NamePolicy, PARAMETER_KEY_POLICY, ParamType,
        ParameterSchema, SchemaRule,
    };

    // Context and services
    pub use crate::extensions::Extensions;
    pub use crate::services::{EventHooks, HOOK_FAILURE_WARNING, PipelineServices, hook_events};

    // Pipeline
    pub(crate) use crate::pipeline::traits::FilterRun;
    pub use crate::pipeline::registry::FilterRegistry;
    pub use crate::pipeline::results::{FilterReport, FilterState, PipelineResult};
    pub use crate::pipeline::traits::{
        Filter, FilterFactory, FilterIdentity, PreflightResult, apply_filter, factory,
    };
    pub use crate::pipeline::{Draft, Pipeline, PipelineItem, Ready};

    // Result and error handling
    pub type Result<T> = anyhow::Result<T>;
    pub use anyhow::Context as _;

    // Identity
    pub use uuid::Uuid;

    // File I/O
    pub use std::path::{Path, PathBuf};

    // Collections
    pub use indexmap::IndexMap;
    pub use std::collections::{HashMap, HashSet};

    // Shared state
    pub use std::sync::Arc;

    // Time
    pub use std::time::{Duration, Instant};

    // Lazy initialization
    pub use std::sync::LazyLock;
}
