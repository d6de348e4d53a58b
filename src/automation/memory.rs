//! In-process engine for tests and offline rehearsal
//!
//! [`MemoryEngine`] implements [`Automation`] on top of plain maps. It keeps a
//! journal of every call so callers can assert on the exact sequence sent to
//! the engine, and it can be primed with values, tables, command results and
//! one-shot faults.
//!
//! Clones share state, so a test can keep one clone while a session owns the
//! other:
//!
//! ```rust
//! use plantsim_remote::automation::{MemoryDispatcher, MemoryEngine};
//! use plantsim_remote::session::Session;
//! use plantsim_remote::types::Value;
//!
//! let engine = MemoryEngine::new();
//! let session = Session::connect(&MemoryDispatcher::new(engine.clone()), None)?;
//! session.set_value("Model.Source.Interval", Value::from(30))?;
//! assert_eq!(engine.value("Model.Source.Interval"), Some(Value::Integer(30)));
//! # Ok::<(), plantsim_remote::PlantSimError>(())
//! ```
//!
//! Table objects answer `<table>.writeFile("<file>")` by writing their
//! tab-delimited text to `<file>`, which is what the table bridge relies on.

use super::{Automation, AutomationFault, ConnectFault, Dispatcher, FaultResult, E_FAIL};
use crate::types::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;

/// The call was made on a handle whose engine has quit (`0x80010108`)
const RPC_E_DISCONNECTED: i32 = 0x8001_0108_u32 as i32;

/// Remote-control methods, used to target injected faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineMethod {
    /// `SetLicenseType`
    SetLicenseType,
    /// `LoadModel`
    LoadModel,
    /// `SetVisible`
    SetVisible,
    /// `SetTrustModels`
    SetTrustModels,
    /// `SetPathContext`
    SetPathContext,
    /// `ResetSimulation`
    ResetSimulation,
    /// `StartSimulation`
    StartSimulation,
    /// `StopSimulation`
    StopSimulation,
    /// `IsSimulationRunning`
    IsSimulationRunning,
    /// `GetValue`
    GetValue,
    /// `SetValue`
    SetValue,
    /// `ExecuteSimTalk`
    ExecuteSimTalk,
    /// `Quit`
    Quit,
}

/// One recorded call, with its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// `SetLicenseType(license_type)`
    SetLicenseType(String),
    /// `LoadModel(path)`
    LoadModel(String),
    /// `SetVisible(visible)`
    SetVisible(bool),
    /// `SetTrustModels(trust_models)`
    SetTrustModels(bool),
    /// `SetPathContext(path_context)`
    SetPathContext(String),
    /// `ResetSimulation(event_controller)`
    ResetSimulation(String),
    /// `StartSimulation(event_controller)`
    StartSimulation(String),
    /// `StopSimulation()`
    StopSimulation,
    /// `IsSimulationRunning()`
    IsSimulationRunning,
    /// `GetValue(path)`
    GetValue(String),
    /// `SetValue(path, value)`
    SetValue(String, Value),
    /// `ExecuteSimTalk(command, params)`
    ExecuteSimTalk(String, Vec<Value>),
    /// `Quit()`
    Quit,
}

impl EngineCall {
    /// The method this call invoked
    pub fn method(&self) -> EngineMethod {
        match self {
            EngineCall::SetLicenseType(_) => EngineMethod::SetLicenseType,
            EngineCall::LoadModel(_) => EngineMethod::LoadModel,
            EngineCall::SetVisible(_) => EngineMethod::SetVisible,
            EngineCall::SetTrustModels(_) => EngineMethod::SetTrustModels,
            EngineCall::SetPathContext(_) => EngineMethod::SetPathContext,
            EngineCall::ResetSimulation(_) => EngineMethod::ResetSimulation,
            EngineCall::StartSimulation(_) => EngineMethod::StartSimulation,
            EngineCall::StopSimulation => EngineMethod::StopSimulation,
            EngineCall::IsSimulationRunning => EngineMethod::IsSimulationRunning,
            EngineCall::GetValue(_) => EngineMethod::GetValue,
            EngineCall::SetValue(_, _) => EngineMethod::SetValue,
            EngineCall::ExecuteSimTalk(_, _) => EngineMethod::ExecuteSimTalk,
            EngineCall::Quit => EngineMethod::Quit,
        }
    }
}

#[derive(Debug, Default)]
struct EngineState {
    values: HashMap<String, Value>,
    /// Tab-delimited text each table object writes out
    tables: HashMap<String, String>,
    command_results: HashMap<String, Value>,
    faults: HashMap<EngineMethod, VecDeque<AutomationFault>>,
    journal: Vec<EngineCall>,
    written_files: Vec<PathBuf>,
    run_length: usize,
    remaining_polls: usize,
    running: bool,
    quit: bool,
}

/// In-process engine implementing [`Automation`]
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    state: Rc<RefCell<EngineState>>,
}

impl MemoryEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryEngine::insert_value`]
    pub fn with_value(self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_value(path, value);
        self
    }

    /// Store a value under `path`
    pub fn insert_value(&self, path: impl Into<String>, value: impl Into<Value>) {
        self.state.borrow_mut().values.insert(path.into(), value.into());
    }

    /// Current value stored under `path`, without journaling a call
    pub fn value(&self, path: &str) -> Option<Value> {
        self.state.borrow().values.get(path).cloned()
    }

    /// Register a table object that writes `header` and `rows` tab-delimited
    pub fn insert_table(&self, path: impl Into<String>, header: &[&str], rows: &[&[&str]]) {
        let mut text = header.join("\t");
        text.push('\n');
        for row in rows {
            text.push_str(&row.join("\t"));
            text.push('\n');
        }
        self.insert_table_text(path, text);
    }

    /// Register a table object that writes `text` verbatim
    pub fn insert_table_text(&self, path: impl Into<String>, text: impl Into<String>) {
        self.state.borrow_mut().tables.insert(path.into(), text.into());
    }

    /// Make `ExecuteSimTalk(command)` return `value`
    pub fn set_command_result(&self, command: impl Into<String>, value: impl Into<Value>) {
        self.state.borrow_mut().command_results.insert(command.into(), value.into());
    }

    /// Number of `IsSimulationRunning` polls that report `true` after a start
    pub fn set_run_length(&self, polls: usize) {
        self.state.borrow_mut().run_length = polls;
    }

    /// Fail the next call of `method` with `fault`
    ///
    /// Faults queue up per method and are consumed in order.
    pub fn fail_next(&self, method: EngineMethod, fault: AutomationFault) {
        self.state.borrow_mut().faults.entry(method).or_default().push_back(fault);
    }

    /// Every call made so far, in order
    pub fn journal(&self) -> Vec<EngineCall> {
        self.state.borrow().journal.clone()
    }

    /// The SimTalk commands executed so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.state
            .borrow()
            .journal
            .iter()
            .filter_map(|call| match call {
                EngineCall::ExecuteSimTalk(command, _) => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of journaled calls of `method`
    pub fn call_count(&self, method: EngineMethod) -> usize {
        self.state.borrow().journal.iter().filter(|call| call.method() == method).count()
    }

    /// Forget the journal, keeping values and tables
    pub fn clear_journal(&self) {
        self.state.borrow_mut().journal.clear();
    }

    /// Files written by table objects so far
    pub fn written_files(&self) -> Vec<PathBuf> {
        self.state.borrow().written_files.clone()
    }

    /// Whether `Quit` has been called
    pub fn has_quit(&self) -> bool {
        self.state.borrow().quit
    }

    /// Journal the call and hand out a queued fault, if any
    fn record(&self, call: EngineCall) -> FaultResult<()> {
        let mut state = self.state.borrow_mut();
        let method = call.method();
        state.journal.push(call);

        if state.quit {
            return Err(AutomationFault::new(
                RPC_E_DISCONNECTED,
                "The object invoked has disconnected from its clients.",
            ));
        }

        match state.faults.get_mut(&method).and_then(VecDeque::pop_front) {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    fn write_table(&self, object: &str, file: &str) -> FaultResult<()> {
        let text = self.state.borrow().tables.get(object).cloned().ok_or_else(|| {
            AutomationFault::exception(E_FAIL, format!("'{}' is not a table", object))
        })?;

        fs::write(file, text).map_err(|e| {
            AutomationFault::exception(E_FAIL, format!("Could not write file '{}': {}", file, e))
        })?;

        debug!(object, file, "memory engine wrote table");
        self.state.borrow_mut().written_files.push(PathBuf::from(file));
        Ok(())
    }
}

/// Split `<object>.writeFile("<file>")` into object and file
fn parse_write_file(command: &str) -> Option<(&str, &str)> {
    let command = command.trim().trim_end_matches(';').trim_end();
    if command.contains(';') {
        return None;
    }
    let (object, rest) = command.split_once(".writeFile(\"")?;
    let file = rest.strip_suffix("\")")?;
    Some((object, file))
}

impl Automation for MemoryEngine {
    fn set_license_type(&self, license_type: &str) -> FaultResult<()> {
        self.record(EngineCall::SetLicenseType(license_type.to_string()))
    }

    fn load_model(&self, path: &str) -> FaultResult<()> {
        self.record(EngineCall::LoadModel(path.to_string()))
    }

    fn set_visible(&self, visible: bool) -> FaultResult<()> {
        self.record(EngineCall::SetVisible(visible))
    }

    fn set_trust_models(&self, trust_models: bool) -> FaultResult<()> {
        self.record(EngineCall::SetTrustModels(trust_models))
    }

    fn set_path_context(&self, path_context: &str) -> FaultResult<()> {
        self.record(EngineCall::SetPathContext(path_context.to_string()))
    }

    fn reset_simulation(&self, event_controller: &str) -> FaultResult<()> {
        self.record(EngineCall::ResetSimulation(event_controller.to_string()))?;
        let mut state = self.state.borrow_mut();
        state.running = false;
        state.remaining_polls = 0;
        Ok(())
    }

    fn start_simulation(&self, event_controller: &str) -> FaultResult<()> {
        self.record(EngineCall::StartSimulation(event_controller.to_string()))?;
        let mut state = self.state.borrow_mut();
        state.running = true;
        state.remaining_polls = state.run_length;
        Ok(())
    }

    fn stop_simulation(&self) -> FaultResult<()> {
        self.record(EngineCall::StopSimulation)?;
        let mut state = self.state.borrow_mut();
        state.running = false;
        state.remaining_polls = 0;
        Ok(())
    }

    fn is_simulation_running(&self) -> FaultResult<bool> {
        self.record(EngineCall::IsSimulationRunning)?;
        let mut state = self.state.borrow_mut();
        if !state.running {
            return Ok(false);
        }
        if state.remaining_polls == 0 {
            state.running = false;
            return Ok(false);
        }
        state.remaining_polls -= 1;
        Ok(true)
    }

    fn get_value(&self, path: &str) -> FaultResult<Value> {
        self.record(EngineCall::GetValue(path.to_string()))?;
        self.state.borrow().values.get(path).cloned().ok_or_else(|| {
            AutomationFault::exception(E_FAIL, format!("The object '{}' does not exist", path))
        })
    }

    fn set_value(&self, path: &str, value: &Value) -> FaultResult<()> {
        self.record(EngineCall::SetValue(path.to_string(), value.clone()))?;
        self.state.borrow_mut().values.insert(path.to_string(), value.clone());
        Ok(())
    }

    fn execute_simtalk(&self, command: &str, params: &[Value]) -> FaultResult<Value> {
        self.record(EngineCall::ExecuteSimTalk(command.to_string(), params.to_vec()))?;

        if let Some(result) = self.state.borrow().command_results.get(command) {
            return Ok(result.clone());
        }

        if let Some((object, file)) = parse_write_file(command) {
            self.write_table(object, file)?;
        }

        Ok(Value::Empty)
    }

    fn quit(&self) -> FaultResult<()> {
        self.record(EngineCall::Quit)?;
        let mut state = self.state.borrow_mut();
        state.quit = true;
        state.running = false;
        Ok(())
    }
}

/// Dispatcher handing out handles to one shared [`MemoryEngine`]
#[derive(Debug)]
pub struct MemoryDispatcher {
    engine: MemoryEngine,
    corrupted_dispatches: Cell<usize>,
    refusal: Option<AutomationFault>,
    cache_clears: Cell<usize>,
    targets: RefCell<Vec<String>>,
}

impl MemoryDispatcher {
    /// Create a dispatcher for `engine`
    pub fn new(engine: MemoryEngine) -> Self {
        Self {
            engine,
            corrupted_dispatches: Cell::new(0),
            refusal: None,
            cache_clears: Cell::new(0),
            targets: RefCell::new(Vec::new()),
        }
    }

    /// Report a corrupted type cache for the next `attempts` dispatches
    pub fn with_corrupted_cache(self, attempts: usize) -> Self {
        self.corrupted_dispatches.set(attempts);
        self
    }

    /// Refuse every dispatch (after cache corruption is used up) with `fault`
    pub fn refusing(mut self, fault: AutomationFault) -> Self {
        self.refusal = Some(fault);
        self
    }

    /// The engine handles are bound to
    pub fn engine(&self) -> &MemoryEngine {
        &self.engine
    }

    /// How many times the type cache was cleared
    pub fn cache_clears(&self) -> usize {
        self.cache_clears.get()
    }

    /// Targets dispatched so far, in order
    pub fn targets(&self) -> Vec<String> {
        self.targets.borrow().clone()
    }
}

impl Dispatcher for MemoryDispatcher {
    fn dispatch(&self, target: &str) -> Result<Box<dyn Automation>, ConnectFault> {
        self.targets.borrow_mut().push(target.to_string());

        let corrupted = self.corrupted_dispatches.get();
        if corrupted > 0 {
            self.corrupted_dispatches.set(corrupted - 1);
            return Err(ConnectFault::TypeCacheCorrupted(
                "module has no attribute 'CLSIDToClassMap'".to_string(),
            ));
        }

        if let Some(fault) = &self.refusal {
            return Err(ConnectFault::Fault(fault.clone()));
        }

        Ok(Box::new(self.engine.clone()))
    }

    fn clear_type_cache(&self) -> io::Result<()> {
        self.cache_clears.set(self.cache_clears.get() + 1);
        Ok(())
    }
}
