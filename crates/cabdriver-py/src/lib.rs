#![allow(unsafe_op_in_unsafe_fn)]

use ::cabdriver_env::{
    Action, CabSession, EnvConfig, EnvError, NestedHours, State, TimeMatrix, load_time_matrix_json,
    load_time_matrix_yaml, save_time_matrix_json, save_time_matrix_yaml,
};
use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

type StateTuple = (usize, usize, usize);
type ActionTuple = (usize, usize);

fn env_err_to_py(err: EnvError) -> PyErr {
    match err {
        EnvError::Io(io) => PyOSError::new_err(io.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn state_tuple(state: State) -> StateTuple {
    state.as_tuple()
}

#[pyclass(name = "EnvConfig", module = "cabdriver")]
#[derive(Clone)]
/// EnvConfig()
/// --
///
/// Environment hyperparameters. The default matches the bundled YAML:
/// 5 locations, 24 hours, 7 days, cost 5, revenue 9, 720 hour episodes.
pub struct PyEnvConfig {
    inner: EnvConfig,
}

#[pymethods]
impl PyEnvConfig {
    #[new]
    fn new() -> Self {
        Self {
            inner: EnvConfig::default(),
        }
    }

    /// from_yaml_str(yaml, /)
    /// --
    ///
    /// Parse and validate a config from YAML text. Missing keys use defaults.
    ///
    /// Raises:
    ///     ValueError: If YAML is malformed or the config is invalid.
    #[staticmethod]
    #[pyo3(text_signature = "(yaml, /)")]
    fn from_yaml_str(yaml: &str) -> PyResult<Self> {
        EnvConfig::from_yaml_str(yaml)
            .map(|inner| Self { inner })
            .map_err(env_err_to_py)
    }

    /// from_yaml_file(path, /)
    /// --
    ///
    /// Parse and validate a config from a YAML file.
    #[staticmethod]
    #[pyo3(text_signature = "(path, /)")]
    fn from_yaml_file(path: &str) -> PyResult<Self> {
        EnvConfig::from_yaml_path(path)
            .map(|inner| Self { inner })
            .map_err(env_err_to_py)
    }

    #[getter]
    fn locations(&self) -> usize {
        self.inner.locations
    }

    #[getter]
    fn hours_per_day(&self) -> usize {
        self.inner.hours_per_day
    }

    #[getter]
    fn days_per_week(&self) -> usize {
        self.inner.days_per_week
    }

    #[getter]
    fn hourly_cost(&self) -> f64 {
        self.inner.hourly_cost
    }

    #[getter]
    fn hourly_revenue(&self) -> f64 {
        self.inner.hourly_revenue
    }

    #[getter]
    fn episode_hours(&self) -> u64 {
        self.inner.episode_hours
    }

    fn __repr__(&self) -> String {
        format!(
            "EnvConfig(locations={}, hours_per_day={}, days_per_week={}, hourly_cost={}, hourly_revenue={}, episode_hours={})",
            self.inner.locations,
            self.inner.hours_per_day,
            self.inner.days_per_week,
            self.inner.hourly_cost,
            self.inner.hourly_revenue,
            self.inner.episode_hours
        )
    }
}

#[pyclass(name = "TimeMatrix", module = "cabdriver", frozen)]
/// TimeMatrix(nested, /)
/// --
///
/// Read-only travel-time table indexed `[origin][dest][hour][day]`.
///
/// Build it once from `numpy_array.tolist()` and pass it to every call;
/// it can be shared by any number of environments.
pub struct PyTimeMatrix {
    inner: TimeMatrix,
}

#[pymethods]
impl PyTimeMatrix {
    #[new]
    fn new(nested: NestedHours) -> PyResult<Self> {
        TimeMatrix::from_nested(nested)
            .map(|inner| Self { inner })
            .map_err(env_err_to_py)
    }

    /// random(seed, low=1, high=11, config=None)
    /// --
    ///
    /// Uniform random trip times in `[low, high]`; same-location trips take 0 hours.
    #[staticmethod]
    #[pyo3(signature = (seed, low=1, high=11, config=None))]
    fn random(
        seed: u64,
        low: u32,
        high: u32,
        config: Option<PyRef<'_, PyEnvConfig>>,
    ) -> PyResult<Self> {
        if low > high {
            return Err(PyValueError::new_err("low must not exceed high"));
        }
        let config = config.map(|c| c.inner.clone()).unwrap_or_default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Ok(Self {
            inner: TimeMatrix::random(&config, &mut rng, low..=high),
        })
    }

    /// load_yaml(path, /)
    /// --
    ///
    /// Load a nested time matrix from a YAML file.
    #[staticmethod]
    #[pyo3(text_signature = "(path, /)")]
    fn load_yaml(path: &str) -> PyResult<Self> {
        load_time_matrix_yaml(path)
            .map(|inner| Self { inner })
            .map_err(env_err_to_py)
    }

    /// load_json(path, /)
    /// --
    ///
    /// Load a nested time matrix from a JSON file.
    #[staticmethod]
    #[pyo3(text_signature = "(path, /)")]
    fn load_json(path: &str) -> PyResult<Self> {
        load_time_matrix_json(path)
            .map(|inner| Self { inner })
            .map_err(env_err_to_py)
    }

    #[pyo3(text_signature = "($self, path, /)")]
    fn save_yaml(&self, path: &str) -> PyResult<()> {
        save_time_matrix_yaml(path, &self.inner).map_err(env_err_to_py)
    }

    #[pyo3(text_signature = "($self, path, /)")]
    fn save_json(&self, path: &str) -> PyResult<()> {
        save_time_matrix_json(path, &self.inner).map_err(env_err_to_py)
    }

    #[getter]
    fn shape(&self) -> (usize, usize, usize, usize) {
        let [o, d, h, w] = self.inner.shape();
        (o, d, h, w)
    }

    /// get($self, origin, dest, hour, day, /)
    /// --
    ///
    /// Travel hours from `origin` to `dest` departing at `(hour, day)`.
    #[pyo3(text_signature = "($self, origin, dest, hour, day, /)")]
    fn get(&self, origin: usize, dest: usize, hour: usize, day: usize) -> PyResult<u32> {
        self.inner
            .get(origin, dest, hour, day)
            .map_err(env_err_to_py)
    }

    fn tolist(&self) -> NestedHours {
        self.inner.to_nested()
    }
}

#[pyclass(name = "CabDriverEnv", module = "cabdriver")]
/// CabDriverEnv(seed, config=None)
/// --
///
/// Seeded cab driver environment with its own episode clock.
///
/// States are `(location, hour, day)` tuples and actions are
/// `(pickup, drop)` tuples, with `(0, 0)` meaning no ride.
/// Call `reward_func` before `next_state_func` on each step, or use `step`.
pub struct PyCabDriverEnv {
    inner: CabSession,
}

#[pymethods]
impl PyCabDriverEnv {
    #[new]
    #[pyo3(signature = (seed, config=None))]
    fn new(seed: u64, config: Option<PyRef<'_, PyEnvConfig>>) -> PyResult<Self> {
        let config = config.map(|c| c.inner.clone()).unwrap_or_default();
        CabSession::from_config(config, seed)
            .map(|inner| Self { inner })
            .map_err(env_err_to_py)
    }

    /// state_space($self, /)
    /// --
    ///
    /// All `(location, hour, day)` states in enumeration order.
    #[pyo3(text_signature = "($self, /)")]
    fn state_space(&self) -> Vec<StateTuple> {
        self.inner
            .env()
            .state_space()
            .states()
            .iter()
            .copied()
            .map(state_tuple)
            .collect()
    }

    /// action_space($self, /)
    /// --
    ///
    /// All `(pickup, drop)` actions; the last entry is `(0, 0)`.
    #[pyo3(text_signature = "($self, /)")]
    fn action_space(&self) -> Vec<ActionTuple> {
        self.inner
            .env()
            .action_space()
            .actions()
            .iter()
            .map(|action| action.as_pair())
            .collect()
    }

    #[getter]
    fn state_init(&self) -> StateTuple {
        state_tuple(self.inner.env().state_init())
    }

    #[getter]
    fn state_size(&self) -> usize {
        self.inner.env().config().state_size()
    }

    #[getter]
    fn time_elapsed(&self) -> u64 {
        self.inner.elapsed_hours()
    }

    #[getter]
    fn terminal(&self) -> bool {
        self.inner.is_terminal()
    }

    /// state_encod_arch1($self, state, /)
    /// --
    ///
    /// One-hot encoding of a state, length `m + t + d`.
    #[pyo3(text_signature = "($self, state, /)")]
    fn state_encod_arch1(&self, state: StateTuple) -> PyResult<Vec<u8>> {
        self.inner
            .env()
            .encode_state(State::from(state))
            .map_err(env_err_to_py)
    }

    /// state_encod_arch2($self, state, action, /)
    /// --
    ///
    /// One-hot encoding of a state-action pair, length `m + t + d + 2m`.
    #[pyo3(text_signature = "($self, state, action, /)")]
    fn state_encod_arch2(&self, state: StateTuple, action: ActionTuple) -> PyResult<Vec<u8>> {
        self.inner
            .env()
            .encode_state_action(State::from(state), Action::from(action))
            .map_err(env_err_to_py)
    }

    /// requests($self, state, /)
    /// --
    ///
    /// Sample ride requests at `state`.
    ///
    /// Returns:
    ///     tuple[list[int], list[tuple[int, int]]]: action indices and actions,
    ///     always ending with the no-ride action.
    #[pyo3(text_signature = "($self, state, /)")]
    fn requests(&mut self, state: StateTuple) -> PyResult<(Vec<usize>, Vec<ActionTuple>)> {
        let requests = self
            .inner
            .requests(State::from(state))
            .map_err(env_err_to_py)?;
        let actions = requests.actions.iter().map(|a| a.as_pair()).collect();
        Ok((requests.indices, actions))
    }

    /// reward_func($self, state, action, time_matrix, /)
    /// --
    ///
    /// Reward for taking `action` in `state`.
    #[pyo3(text_signature = "($self, state, action, time_matrix, /)")]
    fn reward_func(
        &self,
        state: StateTuple,
        action: ActionTuple,
        time_matrix: PyRef<'_, PyTimeMatrix>,
    ) -> PyResult<f64> {
        self.inner
            .reward(State::from(state), Action::from(action), &time_matrix.inner)
            .map_err(env_err_to_py)
    }

    /// next_state_func($self, state, action, time_matrix, /)
    /// --
    ///
    /// Advance the episode clock and return `(next_state, terminal)`.
    #[pyo3(text_signature = "($self, state, action, time_matrix, /)")]
    fn next_state_func(
        &mut self,
        state: StateTuple,
        action: ActionTuple,
        time_matrix: PyRef<'_, PyTimeMatrix>,
    ) -> PyResult<(StateTuple, bool)> {
        let (next, terminal) = self
            .inner
            .next_state(State::from(state), Action::from(action), &time_matrix.inner)
            .map_err(env_err_to_py)?;
        Ok((state_tuple(next), terminal))
    }

    /// step($self, state, action, time_matrix, /)
    /// --
    ///
    /// Reward then transition in one call.
    ///
    /// Returns:
    ///     tuple[float, tuple[int, int, int], bool]: `(reward, next_state, terminal)`.
    #[pyo3(text_signature = "($self, state, action, time_matrix, /)")]
    fn step(
        &mut self,
        state: StateTuple,
        action: ActionTuple,
        time_matrix: PyRef<'_, PyTimeMatrix>,
    ) -> PyResult<(f64, StateTuple, bool)> {
        let outcome = self
            .inner
            .step(State::from(state), Action::from(action), &time_matrix.inner)
            .map_err(env_err_to_py)?;
        Ok((outcome.reward, state_tuple(outcome.next_state), outcome.terminal))
    }

    /// reset($self, /)
    /// --
    ///
    /// Clear the episode clock and return `(state_space, action_space, state_init)`.
    #[pyo3(text_signature = "($self, /)")]
    fn reset(&mut self) -> (Vec<StateTuple>, Vec<ActionTuple>, StateTuple) {
        let (states, actions, init) = self.inner.reset();
        (
            states.states().iter().copied().map(state_tuple).collect(),
            actions.actions().iter().map(|a| a.as_pair()).collect(),
            state_tuple(init),
        )
    }
}

#[pymodule]
fn cabdriver(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyEnvConfig>()?;
    module.add_class::<PyTimeMatrix>()?;
    module.add_class::<PyCabDriverEnv>()?;
    module.add("DEFAULT_CONFIG_YAML", EnvConfig::default_yaml())?;
    Ok(())
}
