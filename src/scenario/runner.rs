//! # Sequential runner over scenario cases.

use std::sync::Arc;

use super::ScenarioCase;
use crate::{
    config::HarnessConfig,
    core::Execution,
    error::{MainError, ScenarioError},
    hooks::{HookRef, Hooks, PanicHooks},
    logging::Logger,
    mains::MainRef,
};

/// Runs named cases against one entry point.
///
/// # Example
/// ```rust
/// use mainvisor::{CaptureHooks, Logger, MainContext, MainError, MainFn, MainRef, Scenario, ScenarioCase};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let main: MainRef = MainFn::arc("fails", |_ctx: MainContext, _args: Vec<String>, _logger: Logger| async {
///     Err(MainError::fail("whoops"))
/// });
///
/// let capture = CaptureHooks::new();
/// Scenario::new(main)
///     .hooks(capture.clone())
///     .case(ScenarioCase::new("fails").expect_err("whoops").during(move |_ctx, exec| async move {
///         exec.ready().await;
///     }))
///     .run()
///     .await
///     .expect("scenario");
/// assert!(capture.is_empty());
/// # }
/// ```
pub struct Scenario {
    main: MainRef,
    cfg: HarnessConfig,
    hooks: HookRef,
    cases: Vec<ScenarioCase>,
}

impl Scenario {
    /// Creates a runner for `main` with default config and [`PanicHooks`].
    pub fn new(main: MainRef) -> Self {
        Self {
            main,
            cfg: HarnessConfig::default(),
            hooks: Arc::new(PanicHooks),
            cases: Vec::new(),
        }
    }

    pub fn config(mut self, cfg: HarnessConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the hooks shared by every case.
    pub fn hooks(self, hooks: impl Hooks) -> Self {
        self.hooks_ref(Arc::new(hooks))
    }

    pub fn hooks_ref(mut self, hooks: HookRef) -> Self {
        self.hooks = hooks;
        self
    }

    /// Appends one case.
    pub fn case(mut self, case: ScenarioCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Appends several cases, keeping their order.
    pub fn cases(mut self, cases: impl IntoIterator<Item = ScenarioCase>) -> Self {
        self.cases.extend(cases);
        self
    }

    /// Runs every case in order; stops at the first failure.
    ///
    /// # Errors
    /// The [`ScenarioError`] of the first failing case.
    pub async fn run(self) -> Result<(), ScenarioError> {
        let Scenario {
            main,
            cfg,
            hooks,
            cases,
        } = self;

        for (index, case) in cases.into_iter().enumerate() {
            run_case(&main, &cfg, &hooks, index, case).await?;
        }
        Ok(())
    }
}

async fn run_case(
    main: &MainRef,
    cfg: &HarnessConfig,
    hooks: &HookRef,
    index: usize,
    case: ScenarioCase,
) -> Result<(), ScenarioError> {
    let ScenarioCase {
        name,
        args,
        err,
        before,
        during,
        after,
    } = case;
    // Unnamed cases are reported by position.
    let name = if name.is_empty() {
        index.to_string()
    } else {
        name.into_owned()
    };

    let (logger, logs) = Logger::observed(cfg);
    let exec = Execution::builder(Arc::clone(main))
        .args(args)
        .config(cfg.clone())
        .logger(logger.clone())
        .hooks_ref(Arc::clone(hooks))
        .build();
    logger.in_scope(|| tracing::debug!(case = %name, "running scenario case"));

    if let Some(before) = before {
        before(&logger, &exec);
    }
    exec.start().map_err(|source| ScenarioError::Harness {
        case: name.clone(),
        source,
    })?;

    // Without `during`, the entry point is only stopped; one that blocks on quit hangs here.
    if let Some(during) = during {
        let ctx = exec.child_token();
        during(ctx.clone(), exec.clone()).await;
        ctx.cancel();
    }

    exec.stop();
    let res = exec.done().await;
    check_completion(&name, &err, res)?;

    if let Some(after) = after {
        after(&logs);
    }
    Ok(())
}

/// Compares the terminal result with the expected error text (`""` = no error).
fn check_completion(
    case: &str,
    expected: &str,
    res: Result<(), MainError>,
) -> Result<(), ScenarioError> {
    match res {
        Ok(()) if expected.is_empty() => Ok(()),
        Ok(()) => Err(ScenarioError::MissingError {
            case: case.to_string(),
            expected: expected.to_string(),
        }),
        Err(e) if expected.is_empty() => Err(ScenarioError::UnexpectedError {
            case: case.to_string(),
            actual: e.to_string(),
        }),
        Err(e) if e.to_string() == expected => Ok(()),
        Err(e) => Err(ScenarioError::ErrorMismatch {
            case: case.to_string(),
            expected: expected.to_string(),
            actual: e.to_string(),
        }),
    }
}
