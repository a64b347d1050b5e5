//! Configuration Tests.
//!
//! JSON loading with defaults, and rejection of machines the engine cannot
//! build.

use axp_core::config::{BranchPredictor, Config, ConfigError, TrapVector};
use axp_core::{SimError, Simulator};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn empty_document_is_the_default_machine() {
    let config = Config::from_json("{}").unwrap();
    let default = Config::default();
    assert_eq!(config.general.start_pc, default.general.start_pc);
    assert_eq!(config.memory.size, default.memory.size);
    assert_eq!(config.pipeline.rob_size, default.pipeline.rob_size);
    assert_eq!(config.pipeline.branch_predictor, BranchPredictor::Tournament);
    assert!(config.traps.halt_on_call_pal_halt);
}

#[test]
fn vectors_default_to_pal_base_offsets() {
    let config = Config::from_json(r#"{ "traps": { "pal_base": 65536 } }"#).unwrap();
    assert_eq!(config.traps.handler(TrapVector::Unaligned), 0x1_0280);
    assert_eq!(config.traps.handler(TrapVector::Interrupt), 0x1_0680);
}

#[test]
fn protection_regions_parse_with_defaults() {
    let json = r#"{ "memory": { "protected": [ { "base": 4096, "size": 4096, "ure": true } ] } }"#;
    let config = Config::from_json(json).unwrap();
    let region = config.memory.protected[0];
    assert_eq!(region.base, 0x1000);
    assert!(region.ure);
    assert!(!region.uwe);
    assert!(!region.kre);
}

#[rstest]
#[case::too_few_int_regs(r#"{ "pipeline": { "int_phys_regs": 32 } }"#)]
#[case::too_few_fp_regs(r#"{ "pipeline": { "fp_phys_regs": 16 } }"#)]
fn small_register_pools_are_rejected(#[case] json: &str) {
    assert!(matches!(
        Config::from_json(json),
        Err(ConfigError::TooFewPhysicalRegisters { minimum: 33, .. })
    ));
}

#[rstest]
#[case::zero_rob(r#"{ "pipeline": { "rob_size": 0 } }"#, "pipeline.rob_size")]
#[case::zero_retire(r#"{ "pipeline": { "retire_width": 0 } }"#, "pipeline.retire_width")]
#[case::zero_deadlock(r#"{ "general": { "deadlock_cycles": 0 } }"#, "general.deadlock_cycles")]
fn zero_sizes_are_rejected(#[case] json: &str, #[case] expected: &str) {
    let Err(ConfigError::Zero { field }) = Config::from_json(json) else {
        panic!("{json} was accepted");
    };
    assert_eq!(field, expected);
}

#[test]
fn misaligned_addresses_are_rejected() {
    assert!(matches!(
        Config::from_json(r#"{ "general": { "start_pc": 2 } }"#),
        Err(ConfigError::Misaligned { field: "general.start_pc", value: 2 })
    ));
    assert!(matches!(
        Config::from_json(r#"{ "traps": { "vectors": { "Arith": 4097 } } }"#),
        Err(ConfigError::Misaligned { field: "traps.vectors", .. })
    ));
}

#[test]
fn other_inconsistencies_are_rejected() {
    assert!(matches!(
        Config::from_json(r#"{ "pipeline": { "btb_size": 100 } }"#),
        Err(ConfigError::NotPowerOfTwo { .. })
    ));
    assert!(matches!(
        Config::from_json(r#"{ "pipeline": { "gshare_bits": 17 } }"#),
        Err(ConfigError::TableBits { value: 17, .. })
    ));
    assert!(matches!(
        Config::from_json(r#"{ "memory": { "size": 4096, "protected": [ { "base": 0, "size": 8192 } ] } }"#),
        Err(ConfigError::RegionOutOfRange { .. })
    ));
    assert!(matches!(
        Config::from_json(r#"{ "pipeline": { "branch_predictor": "Perceptron" } }"#),
        Err(ConfigError::Json(_))
    ));
}

/// The simulator refuses a configuration that was never validated.
#[test]
fn simulator_validates_its_configuration() {
    let mut config = Config::default();
    config.traps.pal_base = 0x8001;
    assert!(matches!(
        Simulator::new(&config),
        Err(SimError::Config(ConfigError::Misaligned { .. }))
    ));
}
