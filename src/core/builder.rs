use std::sync::Arc;

use super::execution::Execution;
use super::signals::Signals;
use crate::{
    config::HarnessConfig,
    events::Bus,
    hooks::{HookRef, Hooks, PanicHooks},
    logging::Logger,
    mains::MainRef,
};

/// Builder for constructing an [`Execution`] with optional collaborators.
pub struct ExecutionBuilder {
    main: MainRef,
    args: Vec<String>,
    cfg: HarnessConfig,
    logger: Option<Logger>,
    hooks: HookRef,
}

impl ExecutionBuilder {
    /// Creates a new builder for `main` with no arguments.
    pub fn new(main: MainRef) -> Self {
        Self {
            main,
            args: Vec::new(),
            cfg: HarnessConfig::default(),
            logger: None,
            hooks: Arc::new(PanicHooks),
        }
    }

    /// Sets the arguments that follow the program name.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the configuration (program name, bus capacity).
    pub fn config(mut self, cfg: HarnessConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the logger handed to the entry point.
    ///
    /// Without one, the caller's current `tracing` dispatcher is captured at build time.
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Sets the fatal/error hooks.
    pub fn hooks(self, hooks: impl Hooks) -> Self {
        self.hooks_ref(Arc::new(hooks))
    }

    /// Sets already-shared fatal/error hooks.
    pub fn hooks_ref(mut self, hooks: HookRef) -> Self {
        self.hooks = hooks;
        self
    }

    /// Builds the execution. Nothing runs until [`Execution::start`].
    pub fn build(self) -> Execution {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let args = self.cfg.argv(self.args);
        let logger = self.logger.unwrap_or_else(Logger::current);

        Execution::from_parts(self.main, args, logger, self.hooks, Signals::new(bus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MainContext, MainError, MainFn};

    fn noop() -> MainRef {
        MainFn::arc(
            "noop",
            |_ctx: MainContext, _args: Vec<String>, _logger: Logger| async {
                Ok::<_, MainError>(())
            },
        )
    }

    #[test]
    fn program_name_is_prepended() {
        let exec = ExecutionBuilder::new(noop()).args(["1", "2", "3"]).build();
        assert_eq!(exec.args(), ["main", "1", "2", "3"]);
        assert!(!exec.is_started());
    }

    #[test]
    fn config_controls_program_name() {
        let cfg = HarnessConfig {
            program_name: "svc".into(),
            ..HarnessConfig::default()
        };
        let exec = ExecutionBuilder::new(noop()).config(cfg).build();
        assert_eq!(exec.args(), ["svc"]);
    }
}
