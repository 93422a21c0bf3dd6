//! Shared solver environment and configuration hooks.

use crate::ffi::{HighsHandle, HighsOption, highs_version};
use tether_solver::{SolverConfig, SolverError};
use tracing::debug;

/// Process-wide settings shared by an [`crate::Integration`] and every
/// solver it builds. Immutable once created.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    options: Vec<(String, HighsOption)>,
    version: Option<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            version: highs_version(),
        }
    }

    /// Add a HiGHS option applied to every native model before each solve.
    pub fn with_option(mut self, name: impl Into<String>, value: HighsOption) -> Self {
        self.options.push((name.into(), value));
        self
    }

    pub fn options(&self) -> &[(String, HighsOption)] {
        &self.options
    }

    /// HiGHS library version, if available.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Hook run against the native model before each solve.
///
/// Hooks run in registration order, after the default configuration, so a
/// later hook overrides an earlier setting.
pub trait Configurator: Send {
    fn configure(
        &self,
        environment: &Environment,
        handle: &mut HighsHandle,
        config: &SolverConfig,
    ) -> Result<(), SolverError>;
}

impl<F> Configurator for F
where
    F: Fn(&Environment, &mut HighsHandle, &SolverConfig) -> Result<(), SolverError> + Send,
{
    fn configure(
        &self,
        environment: &Environment,
        handle: &mut HighsHandle,
        config: &SolverConfig,
    ) -> Result<(), SolverError> {
        self(environment, handle, config)
    }
}

/// Always applied first: the environment's options, then the fields of the
/// [`SolverConfig`] that are set. With no options and an empty config this
/// changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfigurator;

/// HiGHS options corresponding to the fields of `config` that are set.
pub fn config_options(config: &SolverConfig) -> Vec<(&'static str, HighsOption)> {
    let mut options = Vec::new();
    if let Some(limit) = config.time_limit {
        options.push(("time_limit", HighsOption::Float(limit)));
    }
    if let Some(gap) = config.mip_gap {
        options.push(("mip_rel_gap", HighsOption::Float(gap)));
    }
    if let Some(level) = config.verbosity {
        options.push(("log_dev_level", HighsOption::Int(level.min(3) as i32)));
    }
    if let Some(presolve) = config.presolve {
        let presolve_str = if presolve { "on" } else { "off" };
        options.push(("presolve", HighsOption::Str(presolve_str.to_string())));
    }
    if let Some(threads) = config.threads {
        options.push(("threads", HighsOption::Int(threads.min(i32::MAX as u32) as i32)));
    }
    if let Some(tolerance) = config.tolerance {
        options.push((
            "primal_feasibility_tolerance",
            HighsOption::Float(tolerance),
        ));
        options.push(("dual_feasibility_tolerance", HighsOption::Float(tolerance)));
    }
    if let Some(seed) = config.random_seed {
        options.push(("random_seed", HighsOption::Int(seed.min(i32::MAX as u32) as i32)));
    }
    options
}

impl Configurator for DefaultConfigurator {
    fn configure(
        &self,
        environment: &Environment,
        handle: &mut HighsHandle,
        config: &SolverConfig,
    ) -> Result<(), SolverError> {
        let config_options = config_options(config);
        let options = environment
            .options()
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .chain(config_options.iter().map(|(name, value)| (*name, value)));

        let mut applied = 0usize;
        for (name, value) in options {
            handle
                .set_option(name, value)
                .map_err(|err| SolverError::solve("set_option", err))?;
            applied += 1;
        }

        debug!(
            component = "solver",
            operation = "configure",
            status = "success",
            applied,
            "Applied default configuration"
        );
        Ok(())
    }
}
