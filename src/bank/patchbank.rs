use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{BankError, Ranged};
use crate::bank::{Program, OPERATOR_COUNT, PROGRAM_COUNT};
use crate::bank::operator::Operator;
use crate::bank::patch::Patch;

/// One line of the patch list: position, program number and
/// the instrument name derived from it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PatchSummary {
    pub index: usize,
    pub program: Program,
    pub instrument_name: String,
}

impl fmt::Display for PatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:3}: {}", self.program.value(), self.instrument_name)
    }
}

/// A bank of patches. No two patches in the bank have the same
/// program number. The order of the patches is the display order.
///
/// Every mutating operation either succeeds or returns an error
/// with the bank left exactly as it was.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBank")]
pub struct PatchBank {
    patches: Vec<Patch>,
}

// The bank as it appears in a file, before it is checked.
#[derive(Deserialize)]
struct RawBank {
    patches: Vec<Patch>,
}

impl TryFrom<RawBank> for PatchBank {
    type Error = String;

    fn try_from(raw: RawBank) -> Result<Self, Self::Error> {
        let bank = PatchBank { patches: raw.patches };

        if let Some(program) = bank.first_duplicate() {
            return Err(format!("program number {} appears more than once", program));
        }

        if let Some(patch) = bank.patches.iter().find(|p| p.operators.len() > OPERATOR_COUNT) {
            return Err(format!("program {} has {} operators, expected at most {}",
                patch.program, patch.operators.len(), OPERATOR_COUNT));
        }

        Ok(bank)
    }
}

impl PatchBank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Default::default()
    }

    /// Makes a bank from a list of patches, checking that their
    /// program numbers are unique.
    pub fn from_patches(patches: Vec<Patch>) -> Result<Self, BankError> {
        for patch in &patches {
            check_operator_count(patch)?;
        }
        let bank = PatchBank { patches };
        if let Some(program) = bank.first_duplicate() {
            return Err(BankError::DuplicateProgram(program.value()));
        }
        Ok(bank)
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter()
    }

    /// Gets the patch at `index`.
    pub fn patch(&self, index: usize) -> Result<&Patch, BankError> {
        self.patches.get(index).ok_or(BankError::InvalidIndex(index, self.patches.len()))
    }

    pub(crate) fn patch_mut(&mut self, index: usize) -> Result<&mut Patch, BankError> {
        let length = self.patches.len();
        self.patches.get_mut(index).ok_or(BankError::InvalidIndex(index, length))
    }

    /// Gets the program numbers in bank order.
    pub fn programs(&self) -> Vec<Program> {
        self.patches.iter().map(|p| p.program).collect()
    }

    /// Finds the position of the patch with `program`.
    pub fn find_program(&self, program: Program) -> Option<usize> {
        self.patches.iter().position(|p| p.program == program)
    }

    pub fn contains_program(&self, program: Program) -> bool {
        self.find_program(program).is_some()
    }

    /// Finds the smallest program number not used by any patch.
    pub fn next_free_program(&self) -> Option<Program> {
        let used: HashSet<Program> = self.patches.iter().map(|p| p.program).collect();
        (0..PROGRAM_COUNT as i32)
            .map(Program::new)
            .find(|program| !used.contains(program))
    }

    // Rejects `program` if a patch other than the one at `except` has it.
    fn check_program_free(&self, program: Program, except: Option<usize>) -> Result<(), BankError> {
        match self.find_program(program) {
            Some(index) if Some(index) != except => {
                warn!("Program number {} already exists", program);
                Err(BankError::DuplicateProgram(program.value()))
            },
            _ => Ok(()),
        }
    }

    fn first_duplicate(&self) -> Option<Program> {
        let mut seen = HashSet::new();
        self.patches.iter().map(|p| p.program).find(|program| !seen.insert(*program))
    }

    /// Appends `patch` to the bank. Returns the index of the new patch.
    pub fn add_patch(&mut self, patch: Patch) -> Result<usize, BankError> {
        check_operator_count(&patch)?;
        self.check_program_free(patch.program, None)?;
        debug!("Adding patch for program {}", patch.program);
        self.patches.push(patch);
        Ok(self.patches.len() - 1)
    }

    /// Creates a patch with the default settings for the smallest
    /// unused program number and appends it to the bank.
    pub fn new_patch(&mut self) -> Result<&Patch, BankError> {
        let program = match self.next_free_program() {
            Some(program) => program,
            None => {
                warn!("Patch limit reached, cannot create new patch");
                return Err(BankError::BankFull);
            }
        };

        debug!("New patch for program {}", program);
        self.patches.push(Patch::new(program));
        Ok(&self.patches[self.patches.len() - 1])
    }

    /// Removes the patch at `index` and returns it.
    pub fn delete_patch(&mut self, index: usize) -> Result<Patch, BankError> {
        if index >= self.patches.len() {
            return Err(BankError::InvalidIndex(index, self.patches.len()));
        }
        let patch = self.patches.remove(index);
        debug!("Deleted patch for program {} at {}", patch.program, index);
        Ok(patch)
    }

    /// Appends a copy of the patch at `source` with the program
    /// number `program`.
    pub fn duplicate_patch(&mut self, source: usize, program: Program) -> Result<&Patch, BankError> {
        let mut copy = self.patch(source)?.clone();
        self.check_program_free(program, None)?;

        debug!("Duplicating patch {} to program {}", copy.program, program);
        copy.program = program;
        self.patches.push(copy);
        Ok(&self.patches[self.patches.len() - 1])
    }

    /// Orders the patches by ascending program number.
    pub fn sort_by_program(&mut self) {
        self.patches.sort_by_key(|p| p.program);
    }

    /// Changes the program number of the patch at `index`.
    /// Setting a patch to its current program number succeeds.
    pub fn set_program(&mut self, index: usize, program: Program) -> Result<(), BankError> {
        self.patch(index)?;
        self.check_program_free(program, Some(index))?;
        let patch = self.patch_mut(index)?;
        debug!("Program {} changed to {}", patch.program, program);
        patch.program = program;
        Ok(())
    }

    /// Applies `f` to a copy of the patch at `index`, and stores
    /// the result only if the bank stays valid.
    pub fn update_patch<F>(&mut self, index: usize, f: F) -> Result<(), BankError>
    where
        F: FnOnce(&mut Patch),
    {
        let mut patch = self.patch(index)?.clone();
        f(&mut patch);
        check_operator_count(&patch)?;
        self.check_program_free(patch.program, Some(index))?;
        self.patches[index] = patch;
        Ok(())
    }

    /// Gets the operator `operator` of the patch at `index` for writing,
    /// creating it and any missing operators before it.
    pub fn operator_at(&mut self, index: usize, operator: usize) -> Result<&mut Operator, BankError> {
        if operator >= OPERATOR_COUNT {
            return Err(BankError::InvalidIndex(operator, OPERATOR_COUNT));
        }
        self.patch_mut(index)?.operator_at(operator)
    }

    /// Lists the patches with their derived instrument names.
    pub fn summaries(&self) -> Vec<PatchSummary> {
        self.patches.iter().enumerate().map(|(index, patch)| PatchSummary {
            index,
            program: patch.program,
            instrument_name: patch.instrument_name(),
        }).collect()
    }

    /// Parses a bank from JSON.
    ///
    /// Operators missing from a patch are not added here; they are
    /// created when first written.
    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let bank: PatchBank = serde_json::from_str(json)?;
        debug!("Parsed bank with {} patches", bank.len());
        Ok(bank)
    }

    /// Gets the bank as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, BankError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replaces the contents of this bank with the bank in `json`.
    /// On error the bank is left as it was.
    pub fn reload_from_json(&mut self, json: &str) -> Result<(), BankError> {
        *self = PatchBank::from_json(json)?;
        Ok(())
    }

    /// Reads a bank from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let json = fs::read_to_string(path.as_ref())?;
        let bank = PatchBank::from_json(&json)?;
        debug!("Loaded {} patches from {}", bank.len(), path.as_ref().display());
        Ok(bank)
    }

    /// Writes the bank to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BankError> {
        let json = self.to_json()?;
        fs::write(path.as_ref(), json)?;
        debug!("Saved {} patches to {}", self.len(), path.as_ref().display());
        Ok(())
    }
}

// A patch never holds more than eight operators.
fn check_operator_count(patch: &Patch) -> Result<(), BankError> {
    if patch.operators.len() > OPERATOR_COUNT {
        warn!("Program {} has {} operators", patch.program, patch.operators.len());
        return Err(BankError::InvalidIndex(patch.operators.len(), OPERATOR_COUNT));
    }
    Ok(())
}

impl fmt::Display for PatchBank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for summary in self.summaries() {
            writeln!(f, "{}", summary)?;
        }
        Ok(())
    }
}
