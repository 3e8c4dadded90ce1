//! Tests for the patch bank operations

use std::collections::HashSet;

use rand::Rng;

use patchbank::{BankError, Ranged};
use patchbank::bank::{Program, OPERATOR_COUNT};
use patchbank::bank::command::Command;
use patchbank::bank::operator::{Operator, OperatorField};
use patchbank::bank::patch::Patch;
use patchbank::bank::patchbank::PatchBank;

const BANK_JSON: &str = r#"{
  "patches": [
    {
      "program": 10,
      "modmode": 1,
      "feedback": 128,
      "keyShift": 0,
      "operators": [
        { "frequency": 0, "waveform": 0, "volume": 255, "attack": 0, "decay": 64, "sustain": 0, "release": 0 },
        { "frequency": 16384, "waveform": 0, "volume": 128, "attack": 0, "decay": 50, "sustain": 0, "release": 4 }
      ]
    },
    {
      "program": 36,
      "modmode": 4,
      "feedback": 131,
      "keyShift": 12,
      "operators": [
        { "frequency": 0, "waveform": 0, "volume": 255, "attack": 0, "decay": 96, "sustain": 0, "release": 4 }
      ]
    },
    {
      "program": 80
    }
  ]
}"#;

fn init_logging() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init();
}

fn make_bank(programs: &[i32]) -> PatchBank {
    let patches = programs.iter().map(|p| Patch::new(Program::new(*p))).collect();
    PatchBank::from_patches(patches).expect("unique programs")
}

fn program_values(bank: &PatchBank) -> Vec<i32> {
    bank.programs().iter().map(|p| p.value()).collect()
}

fn assert_unique_programs(bank: &PatchBank) {
    let unique: HashSet<Program> = bank.programs().into_iter().collect();
    assert_eq!(unique.len(), bank.len());
}

#[test]
fn new_patches_in_empty_bank() {
    init_logging();
    let mut bank = PatchBank::new();
    for _ in 0..3 {
        bank.new_patch().unwrap();
    }
    assert_eq!(program_values(&bank), vec![0, 1, 2]);
}

#[test]
fn new_patch_takes_smallest_gap() {
    let mut bank = make_bank(&[0, 2]);
    assert_eq!(bank.new_patch().unwrap().program.value(), 1);
}

#[test]
fn duplicate_to_existing_program_fails() {
    let mut bank = make_bank(&[5]);
    let result = bank.duplicate_patch(0, Program::new(5)).map(|p| p.program);
    assert_eq!(result, Err(BankError::DuplicateProgram(5)));
    assert_eq!(bank.len(), 1);
}

#[test]
fn signed_feedback() {
    let mut bank = make_bank(&[0]);
    bank.apply(Command::SetFeedback { index: 0, value: 200 }).unwrap();
    assert_eq!(bank.patch(0).unwrap().signed_feedback(), 72);
    bank.apply(Command::SetSignedFeedback { index: 0, value: -10 }).unwrap();
    assert_eq!(bank.patch(0).unwrap().feedback.value(), 118);
}

#[test]
fn sort_reorders_only() {
    let mut bank = make_bank(&[10, 3, 7]);
    bank.apply(Command::SetKeyShift { index: 0, value: -24 }).unwrap();
    bank.apply(Command::SetModMode { index: 1, value: 0 }).unwrap();
    let before: Vec<Patch> = bank.patches().to_vec();

    bank.sort_by_program();

    assert_eq!(program_values(&bank), vec![3, 7, 10]);
    assert_eq!(bank.patch(0).unwrap(), &before[1]);
    assert_eq!(bank.patch(1).unwrap(), &before[2]);
    assert_eq!(bank.patch(2).unwrap(), &before[0]);
}

#[test]
fn full_bank_rejects_new_patch() {
    let mut bank = PatchBank::new();
    for _ in 0..128 {
        bank.new_patch().unwrap();
    }
    let before = bank.clone();
    assert_eq!(bank.new_patch().map(|p| p.program), Err(BankError::BankFull));
    assert_eq!(bank, before);
}

#[test]
fn round_trip_keeps_content() {
    let bank = PatchBank::from_json(BANK_JSON).unwrap();
    let json = bank.to_json().unwrap();
    let reloaded = PatchBank::from_json(&json).unwrap();
    assert_eq!(reloaded, bank);

    // Stored operator counts survive, nothing is padded.
    let counts: Vec<usize> = reloaded.iter().map(|p| p.operator_count()).collect();
    assert_eq!(counts, vec![2, 1, 0]);
}

#[test]
fn round_trip_random_banks() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let mut bank = PatchBank::new();
        let count = rng.random_range(0..=128);
        for program in 0..count {
            bank.add_patch(Patch::random(Program::new(program))).unwrap();
        }
        let json = bank.to_json().unwrap();
        assert_eq!(PatchBank::from_json(&json).unwrap(), bank);
    }
}

#[test]
fn loaded_defaults() {
    let bank = PatchBank::from_json(BANK_JSON).unwrap();
    let patch = bank.patch(2).unwrap();
    assert_eq!(patch.modmode.value(), 4);
    assert_eq!(patch.feedback.value(), 128);
    assert_eq!(patch.key_shift.value(), 0);
    assert_eq!(patch.instrument_name(), "Lead 1 (square)");
}

#[test]
fn out_of_range_values_are_clamped_on_load() {
    let json = r#"{ "patches": [ { "program": 20, "modmode": 40, "keyShift": -120,
        "operators": [ { "waveform": 31, "volume": 256, "frequency": 65536, "attack": -3 } ] } ] }"#;
    let bank = PatchBank::from_json(json).unwrap();
    let patch = bank.patch(0).unwrap();
    assert_eq!(patch.program.value(), 20);
    assert_eq!(patch.modmode.value(), 12);
    assert_eq!(patch.key_shift.value(), -96);
    assert_eq!(patch.operators[0].waveform.value(), 15);
    assert_eq!(patch.operators[0].volume, 255);
    assert_eq!(patch.operators[0].frequency, u16::MAX);
    assert_eq!(patch.operators[0].attack, 0);
}

#[test]
fn out_of_range_program_is_reported() {
    let json = r#"{ "patches": [ { "program": 200 }, { "program": 127 } ] }"#;
    match PatchBank::from_json(json) {
        Err(BankError::MalformedFile(message)) => {
            assert!(message.contains("200"), "{}", message);
            assert!(!message.contains("more than once"), "{}", message);
        },
        other => panic!("expected a malformed file, got {:?}", other),
    }
}

#[test]
fn duplicate_programs_are_rejected_by_serde() {
    let json = r#"{ "patches": [ { "program": 3 }, { "program": 3 } ] }"#;
    assert!(serde_json::from_str::<PatchBank>(json).is_err());
    assert!(matches!(PatchBank::from_json(json), Err(BankError::MalformedFile(_))));
}

#[test]
fn factory_bank_and_fallback() {
    let bank = PatchBank::factory();
    assert!(bank.contains_program(Program::new(0)));
    assert_eq!(bank.patch_for_program(Program::new(80)).instrument_name(), "Lead 1 (square)");

    // Programs without a patch play the default patch.
    let fallback = bank.patch_for_program(Program::new(127));
    assert_eq!(fallback, &*patchbank::bank::factory::DEFAULT_PATCH);
    assert_eq!(fallback.operator_count(), OPERATOR_COUNT);
}

#[test]
fn malformed_files_are_rejected() {
    for json in ["", "{", "{}", r#"{ "patches": 3 }"#, r#"{ "patches": [ { "program": "one" } ] }"#] {
        assert!(matches!(PatchBank::from_json(json), Err(BankError::MalformedFile(_))), "{}", json);
    }
}

#[test]
fn frequency_decomposition() {
    let mut op = Operator::new();
    for value in 0..=u16::MAX {
        op.set_frequency(value);
        let (msb, lsb) = op.frequency_bytes();
        assert_eq!((msb, lsb), ((value >> 8) as u8, (value & 0xff) as u8));
        op.set_frequency_bytes(msb, lsb);
        assert_eq!(op.frequency(), value);
    }
}

#[test]
fn lazy_fill_creates_exactly_missing_operators() {
    let mut bank = PatchBank::from_json(BANK_JSON).unwrap();
    let first = *bank.operator_at(1, 0).unwrap();
    let again = *bank.operator_at(1, 0).unwrap();
    assert_eq!(first, again);
    assert_eq!(bank.patch(1).unwrap().operator_count(), 1);

    bank.operator_at(1, 4).unwrap();
    let patch = bank.patch(1).unwrap();
    assert_eq!(patch.operator_count(), 5);
    assert!(patch.operators[1..].iter().all(|op| *op == Operator::new()));
    assert_eq!(patch.operators[0], first);
}

#[test]
fn random_operations_keep_programs_unique() {
    init_logging();
    let mut rng = rand::rng();
    let mut bank = PatchBank::new();

    for _ in 0..2000 {
        let len = bank.len();
        let index = rng.random_range(0..=len);
        let command = match rng.random_range(0..7) {
            0 => Command::NewPatch,
            1 => Command::DeletePatch { index },
            2 => Command::DuplicatePatch { source: index, program: Program::random() },
            3 => Command::SortByProgram,
            4 => Command::SetProgram { index, program: Program::random() },
            5 => Command::AddPatch(Patch::random(Program::random())),
            _ => Command::SetOperatorField {
                index,
                operator: rng.random_range(0..=OPERATOR_COUNT),
                field: OperatorField::Volume,
                value: rng.random_range(-10..300),
            },
        };

        let before = bank.clone();
        if bank.apply(command).is_err() {
            assert_eq!(bank, before);
        }
        assert_unique_programs(&bank);
        assert!(bank.iter().all(|p| p.operator_count() <= OPERATOR_COUNT));
    }
}

#[test]
fn save_and_load_file() {
    let path = std::env::temp_dir().join(format!("patchbank-test-{}.json", std::process::id()));

    let mut bank = PatchBank::from_json(BANK_JSON).unwrap();
    bank.new_patch().unwrap();
    bank.save(&path).unwrap();

    let loaded = PatchBank::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, bank);
}

#[test]
fn load_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("patchbank-test-does-not-exist.json");
    assert!(matches!(PatchBank::load(&path), Err(BankError::Io(_))));
}
