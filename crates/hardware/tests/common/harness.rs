//! Simulator test context.
//!
//! Wraps a [`Simulator`] with the conveniences most tests need: a program
//! loaded at the start PC, infallible run helpers and register accessors.
//! Set `RUST_LOG=axp_core=trace` to see the pipeline trace of a failing test.

use axp_core::common::constants::INSTRUCTION_BYTES;
use axp_core::core::arch::state::ArchitecturalState;
use axp_core::{Config, RunOutcome, Simulator};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A simulator plus the configuration it was built from.
pub struct TestContext {
    /// The simulator under test.
    pub sim: Simulator,
    /// Configuration used to build `sim`; `pc_of` reads its start PC.
    pub config: Config,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Context with the default 21264 configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Context built from `config`. Panics if the configuration is invalid.
    pub fn with_config(config: Config) -> Self {
        init_tracing();
        let sim = Simulator::new(&config).unwrap();
        Self { sim, config }
    }

    /// Loads `program` at the start PC.
    pub fn load(mut self, program: &[u32]) -> Self {
        let base = self.config.general.start_pc;
        self.sim.load_program(base, program).unwrap();
        self
    }

    /// Loads `program` at `addr`.
    pub fn load_at(mut self, addr: u64, program: &[u32]) -> Self {
        self.sim.load_program(addr, program).unwrap();
        self
    }

    /// Address of the `index`th instruction of the program.
    pub fn pc_of(&self, index: u64) -> u64 {
        self.config.general.start_pc + index * INSTRUCTION_BYTES
    }

    /// Runs until `count` instructions retire, a trap, or HALT.
    pub fn run(&mut self, count: u64) -> RunOutcome {
        self.sim.run(count).unwrap()
    }

    /// Committed architectural state.
    pub fn state(&self) -> ArchitecturalState {
        self.sim.read_architectural_state()
    }

    /// Committed value of integer register `index`.
    pub fn reg(&self, index: usize) -> u64 {
        self.state().int(index)
    }

    /// Sets integer register `index` before the next run.
    pub fn set_reg(&mut self, index: u8, value: u64) {
        self.sim.set_int_reg(index, value).unwrap();
    }

    /// Little-endian quadword at `addr`, read around the pipeline.
    pub fn read_u64(&self, addr: u64) -> u64 {
        let bytes = self.sim.read_memory(addr, 8).unwrap();
        u64::from_le_bytes(bytes.try_into().unwrap())
    }

    /// Writes a little-endian quadword at `addr`.
    pub fn write_u64(&mut self, addr: u64, value: u64) {
        self.sim.write_memory(addr, &value.to_le_bytes()).unwrap();
    }
}
