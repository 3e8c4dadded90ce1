//! Commands and read-only views for driving a bank from an editor.
//!
//! An editor issues a `Command`, and then re-reads whatever it shows
//! through `PatchView` and `OperatorView`. Derived values such as the
//! instrument name or the signed feedback are computed on every read
//! and are never stored in the bank.

use std::fmt;

use log::debug;

use crate::{BankError, Ranged};
use crate::bank::Program;
use crate::bank::operator::OperatorField;
use crate::bank::patch::Patch;
use crate::bank::patchbank::PatchBank;

/// A change to a bank. Patches and operators are addressed by index.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Command {
    NewPatch,
    AddPatch(Patch),
    DeletePatch { index: usize },
    DuplicatePatch { source: usize, program: Program },
    SortByProgram,
    SetProgram { index: usize, program: Program },
    SetModMode { index: usize, value: i32 },
    SetFeedback { index: usize, value: i32 },
    SetSignedFeedback { index: usize, value: i32 },
    SetKeyShift { index: usize, value: i32 },
    SetOperatorField { index: usize, operator: usize, field: OperatorField, value: i32 },
    SetFrequencyBytes { index: usize, operator: usize, msb: u8, lsb: u8 },
}

/// The result of a command that succeeded.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    Created(usize),  // index of the new patch
    Deleted(Patch),
    Updated(usize),  // index of the changed patch
    Sorted,
}

impl PatchBank {
    /// Applies `command` to the bank. If the command fails,
    /// the bank is unchanged.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, BankError> {
        debug!("Applying {:?}", command);

        match command {
            Command::NewPatch => {
                self.new_patch()?;
                Ok(Outcome::Created(self.len() - 1))
            },
            Command::AddPatch(patch) => {
                Ok(Outcome::Created(self.add_patch(patch)?))
            },
            Command::DeletePatch { index } => {
                Ok(Outcome::Deleted(self.delete_patch(index)?))
            },
            Command::DuplicatePatch { source, program } => {
                self.duplicate_patch(source, program)?;
                Ok(Outcome::Created(self.len() - 1))
            },
            Command::SortByProgram => {
                self.sort_by_program();
                Ok(Outcome::Sorted)
            },
            Command::SetProgram { index, program } => {
                self.set_program(index, program)?;
                Ok(Outcome::Updated(index))
            },
            Command::SetModMode { index, value } => {
                self.patch_mut(index)?.set_mod_mode(value);
                Ok(Outcome::Updated(index))
            },
            Command::SetFeedback { index, value } => {
                self.patch_mut(index)?.set_feedback(value);
                Ok(Outcome::Updated(index))
            },
            Command::SetSignedFeedback { index, value } => {
                self.patch_mut(index)?.set_signed_feedback(value);
                Ok(Outcome::Updated(index))
            },
            Command::SetKeyShift { index, value } => {
                self.patch_mut(index)?.set_key_shift(value);
                Ok(Outcome::Updated(index))
            },
            Command::SetOperatorField { index, operator, field, value } => {
                self.operator_at(index, operator)?.set_field(field, value);
                Ok(Outcome::Updated(index))
            },
            Command::SetFrequencyBytes { index, operator, msb, lsb } => {
                self.operator_at(index, operator)?.set_frequency_bytes(msb, lsb);
                Ok(Outcome::Updated(index))
            },
        }
    }

    /// Gets the editor view of the patch at `index`.
    pub fn patch_view(&self, index: usize) -> Result<PatchView, BankError> {
        let patch = self.patch(index)?;
        Ok(PatchView {
            index,
            program: patch.program.value(),
            instrument_name: patch.instrument_name(),
            modmode: patch.modmode.value(),
            modmode_name: patch.mod_mode_name(),
            feedback: patch.feedback.value(),
            signed_feedback: patch.signed_feedback(),
            key_shift: patch.key_shift.value(),
            operator_count: patch.operator_count(),
        })
    }

    /// Gets the editor view of operator `operator` of the patch at `index`.
    /// An operator that is not stored yet shows as all zero.
    pub fn operator_view(&self, index: usize, operator: usize) -> Result<OperatorView, BankError> {
        let op = self.patch(index)?.operator_view(operator)?;
        Ok(OperatorView {
            index,
            operator,
            frequency: op.frequency(),
            frequency_msb: op.frequency_msb(),
            frequency_lsb: op.frequency_lsb(),
            waveform: op.waveform.value(),
            waveform_name: op.waveform.name(),
            volume: op.volume,
            attack: op.attack,
            decay: op.decay,
            sustain: op.sustain,
            release: op.release,
        })
    }
}

/// Patch settings with their derived display values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PatchView {
    pub index: usize,
    pub program: i32,
    pub instrument_name: String,
    pub modmode: i32,
    pub modmode_name: String,
    pub feedback: i32,
    pub signed_feedback: i32,
    pub key_shift: i32,
    pub operator_count: usize,
}

impl fmt::Display for PatchView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Program number: {} ({})
Modulation mode: {} ({})
Feedback amount: {} ({})
Key shift: {}",
            self.program, self.instrument_name,
            self.modmode, self.modmode_name,
            self.feedback, self.signed_feedback,
            self.key_shift)
    }
}

/// Operator settings with their derived display values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OperatorView {
    pub index: usize,
    pub operator: usize,
    pub frequency: u16,
    pub frequency_msb: u8,
    pub frequency_lsb: u8,
    pub waveform: i32,
    pub waveform_name: String,
    pub volume: u8,
    pub attack: u8,
    pub decay: u8,
    pub sustain: u8,
    pub release: u8,
}

impl fmt::Display for OperatorView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "OP{}
FU (MSB): {} (0x{:02X})
FL (LSB): {} (0x{:02X})
Frequency: {} (0x{:04X})
Waveform: {} ({})
Volume: {}
Attack: {}
Decay: {}
Sustain: {}
Release: {}",
            self.operator,
            self.frequency_msb, self.frequency_msb,
            self.frequency_lsb, self.frequency_lsb,
            self.frequency, self.frequency,
            self.waveform, self.waveform_name,
            self.volume,
            self.attack,
            self.decay,
            self.sustain,
            self.release)
    }
}
