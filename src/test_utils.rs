use crate::imports::*;
use std::sync::Mutex;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Warning code emitted by a ProbeFilter in `Warn` mode.
pub const PROBE_WARNING: i32 = 9001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMode {
    #[default]
    Pass,
    FailPreflight,
    FailExecute,
    CancelOnExecute,
    Warn,
}

static PROBE_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .parameter(ParameterSpecBuilder::new("label", ParamType::String).build())
        .parameter(
            ParameterSpecBuilder::new("group_name", ParamType::String)
                .hint("When set, preflight plans a group with this name under the root")
                .default_value("")
                .build(),
        )
        .build()
});

/// Filter that records every phase call as "preflight:<label>" / "execute:<label>".
#[derive(Debug, Clone, Default)]
pub struct ProbeFilter {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub mode: ProbeMode,
}

impl ProbeFilter {
    pub const UUID: Uuid = Uuid::from_u128(0x00000000_0000_4000_8000_00000000beef);

    pub fn new(calls: &Arc<Mutex<Vec<String>>>, mode: ProbeMode) -> Self {
        ProbeFilter {
            calls: Arc::clone(calls),
            mode,
        }
    }

    fn record(&self, phase: &str, arguments: &Arguments) {
        let label = arguments.get_required_str("label").unwrap_or("?");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{}:{}", phase, label));
        }
    }
}

pub fn probe_calls(calls: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    calls.lock().map(|calls| calls.clone()).unwrap_or_default()
}

#[async_trait::async_trait]
impl Filter for ProbeFilter {
    fn identity(&self) -> FilterIdentity {
        FilterIdentity {
            uuid: Self::UUID,
            name: "ProbeFilter",
            human_name: "Probe Filter",
        }
    }

    fn parameters(&self) -> &'static ParameterSchema {
        &PROBE_SCHEMA
    }

    fn preflight(&self, _store: &DataStore, arguments: &Arguments) -> Result<PreflightResult> {
        self.record("preflight", arguments);
        let mut result = PreflightResult::new();
        match self.mode {
            ProbeMode::FailPreflight => {
                result
                    .outcome
                    .error(ErrorKind::ConstraintViolation, "probe rejected its arguments");
            }
            ProbeMode::Warn => result.outcome.warn(PROBE_WARNING, "probe warning"),
            _ => {}
        }
        let group_name = arguments.get_required_str("group_name")?;
        if !group_name.is_empty() {
            result.push(Action::CreateGroup {
                path: DataPath::root().child(group_name)?,
            });
        }
        Ok(result)
    }

    async fn execute(
        &self,
        _store: &mut StoreAccess<'_>,
        arguments: &Arguments,
        context: &ExecutionContext,
    ) -> Result<Outcome> {
        self.record("execute", arguments);
        match self.mode {
            ProbeMode::FailExecute => Err(anyhow::anyhow!("probe failed during execute")),
            ProbeMode::CancelOnExecute => {
                context.cancel();
                Ok(Outcome::new())
            }
            _ => Ok(Outcome::new()),
        }
    }
}
