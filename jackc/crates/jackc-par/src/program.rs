//! Whole-program compilation state.

use jackc_util::Symbol;

use crate::obligation::Obligation;
use crate::symbols::ScopeStack;
use crate::vm::{Instr, VmFile};

/// State accumulated across all translation units: the scope stack (whose
/// program root persists for the whole run), the deferred work-list, and
/// the per-unit output buffers.
///
/// The driver owns one `Program`, threads it through a parser per unit,
/// hands it to the resolver, and finally writes the surviving output
/// buffers to disk.
#[derive(Debug, Default)]
pub struct Program {
    pub scopes: ScopeStack,
    pub obligations: Vec<Obligation>,
    pub outputs: Vec<VmFile>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the output buffer for the next translation unit. Subsequent
    /// emission and diagnostics attach to it.
    pub fn begin_unit(&mut self, name: Symbol, discard: bool) {
        self.outputs.push(VmFile::new(name, discard));
    }

    /// The unit currently being compiled.
    pub fn current_unit(&self) -> Symbol {
        self.outputs
            .last()
            .map(|f| f.name)
            .unwrap_or_else(|| Symbol::intern(""))
    }

    /// The current unit's output buffer.
    pub fn out(&mut self) -> &mut VmFile {
        if self.outputs.is_empty() {
            self.outputs.push(VmFile::new(Symbol::intern(""), true));
        }
        self.outputs.last_mut().expect("just ensured non-empty")
    }

    /// Appends an instruction to the current unit.
    pub fn emit(&mut self, instr: Instr) {
        self.out().push(instr);
    }

    /// Drops everything the standard-library ingestion accumulated besides
    /// symbols: its obligations were checked when the library was built,
    /// and its IR is linked in pre-built.
    pub fn discard_stdlib_artifacts(&mut self) {
        self.obligations.clear();
        self.outputs.retain(|file| !file.discard);
    }
}
