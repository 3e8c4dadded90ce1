use std::fmt;

use log::debug;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::{BankError, Ranged};
use crate::bank::{
    Feedback,
    KeyShift,
    ModMode,
    Program,
    OPERATOR_COUNT,
};
use crate::bank::operator::Operator;
use crate::bank::registers::{self, Registers};

/// A patch, addressed by its MIDI program number.
///
/// The operator list can be shorter than eight entries when the patch
/// was loaded from a file that lists only some of them. Missing
/// operators read as zero and are created when first written.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    #[serde(default, deserialize_with = "program_in_range")]
    pub program: Program,
    #[serde(default)]
    pub modmode: ModMode,
    #[serde(default)]
    pub feedback: Feedback,
    #[serde(default, rename = "keyShift")]
    pub key_shift: KeyShift,
    #[serde(default)]
    pub operators: Vec<Operator>,
}

// Program numbers identify patches, so one outside 0...127 makes the
// file malformed instead of being clamped onto another patch.
fn program_in_range<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Program, D::Error> {
    let value = i64::deserialize(deserializer)?;
    if value < Program::FIRST as i64 || value > Program::LAST as i64 {
        return Err(de::Error::custom(format!("program number {} out of range [{}...{}]",
            value, Program::FIRST, Program::LAST)));
    }
    Ok(Program::new(value as i32))
}

impl Patch {
    /// Creates a new patch with the default settings and eight
    /// zero-valued operators.
    pub fn new(program: Program) -> Self {
        Self {
            program,
            modmode: ModMode::default(),
            feedback: Feedback::default(),
            key_shift: KeyShift::default(),
            operators: vec![Operator::new(); OPERATOR_COUNT],
        }
    }

    /// Makes a new patch with random settings.
    pub fn random(program: Program) -> Self {
        Self {
            program,
            modmode: ModMode::random(),
            feedback: Feedback::random(),
            key_shift: KeyShift::random(),
            operators: (0..OPERATOR_COUNT).map(|_| Operator::random()).collect(),
        }
    }

    pub fn program(&self) -> Program {
        self.program
    }

    /// Gets the instrument name for the program number of this patch.
    pub fn instrument_name(&self) -> String {
        self.program.instrument_name()
    }

    pub fn mod_mode_name(&self) -> String {
        self.modmode.name()
    }

    pub fn set_mod_mode(&mut self, value: i32) {
        self.modmode = ModMode::clamped(value);
    }

    pub fn set_feedback(&mut self, value: i32) {
        self.feedback = Feedback::clamped(value);
    }

    pub fn signed_feedback(&self) -> i32 {
        self.feedback.signed()
    }

    /// Sets the feedback from its signed form (-128...127).
    pub fn set_signed_feedback(&mut self, value: i32) {
        self.feedback = Feedback::from_signed(value);
    }

    pub fn set_key_shift(&mut self, value: i32) {
        self.key_shift = KeyShift::clamped(value);
    }

    /// Gets the number of operators actually stored in this patch.
    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }

    /// Gets the operator at `index` for writing. If the operator list is
    /// shorter than `index + 1`, it is first padded with zero-valued
    /// operators up to and including `index`.
    pub fn operator_at(&mut self, index: usize) -> Result<&mut Operator, BankError> {
        if index >= OPERATOR_COUNT {
            return Err(BankError::InvalidIndex(index, OPERATOR_COUNT));
        }

        if index >= self.operators.len() {
            debug!("Padding operators of program {} from {} to {}",
                self.program, self.operators.len(), index + 1);
            self.operators.resize(index + 1, Operator::new());
        }

        Ok(&mut self.operators[index])
    }

    /// Gets the operator at `index` if it is stored.
    pub fn operator(&self, index: usize) -> Option<&Operator> {
        self.operators.get(index)
    }

    /// Gets the settings of the operator at `index` without modifying
    /// the patch. An operator that is not stored reads as zero.
    pub fn operator_view(&self, index: usize) -> Result<Operator, BankError> {
        if index >= OPERATOR_COUNT {
            return Err(BankError::InvalidIndex(index, OPERATOR_COUNT));
        }
        Ok(self.operator(index).copied().unwrap_or_default())
    }

    /// Gets the register image of this patch for a MIDI channel volume.
    pub fn to_registers(&self, midi_volume: u8) -> Registers {
        registers::encode(self, midi_volume)
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{:3}: {}", self.program.value(), self.instrument_name())?;
        writeln!(f, "Mod mode = {} ({}), feedback = {} ({:+}), key shift = {}",
            self.modmode,
            self.mod_mode_name(),
            self.feedback,
            self.signed_feedback(),
            self.key_shift)?;
        for (index, op) in self.operators.iter().enumerate() {
            writeln!(f, "OP{}: {}", index, op)?;
        }
        Ok(())
    }
}
