//! Symbol tables and the scope stack.
//!
//! A [`SymbolTable`] is a flat, ordered list of [`Binding`]s with one
//! offset counter per storage kind; insertion assigns the counter's current
//! value as the binding's offset and post-increments it. Lookup is linear,
//! first match wins.
//!
//! Scoping is a [`ScopeStack`] of tables. The bottom table is the program
//! scope and lives for the whole run: it holds one entry per class, per
//! subroutine, and per field/static (fields and statics join subroutines
//! there so `C.x` resolves the same way as `C.f()`). A class scope is
//! pushed per translation unit and a subroutine scope per subroutine body.
//! Variable lookups walk top-down through the scopes above the program
//! root; the root is addressed explicitly, since its class and subroutine
//! entries are not variables.

use jackc_util::Symbol;

use crate::vm::Segment;

/// What a name is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Static,
    Field,
    Argument,
    Local,
    Subroutine,
    ClassName,
}

/// One symbol-table entry.
#[derive(Clone, Debug)]
pub struct Binding {
    pub name: Symbol,
    /// Source type name (`int`, `boolean`, a class name, or `void` for a
    /// void subroutine). For a class entry, the class's own name.
    pub ty: Symbol,
    pub kind: BindingKind,
    /// Storage slot within the binding's segment; assigned at insertion,
    /// zero for non-storage kinds.
    pub offset: u32,
    pub initialised: bool,
    /// Declared parameter types, populated for subroutine entries only.
    pub params: Vec<Symbol>,
}

impl Binding {
    pub fn new(name: Symbol, ty: Symbol, kind: BindingKind) -> Self {
        Self {
            name,
            ty,
            kind,
            offset: 0,
            initialised: false,
            params: Vec::new(),
        }
    }

    /// The VM segment and slot this binding loads from and stores to, for
    /// storage kinds.
    pub fn storage(&self) -> Option<(Segment, u32)> {
        let segment = match self.kind {
            BindingKind::Static => Segment::Static,
            BindingKind::Field => Segment::This,
            BindingKind::Argument => Segment::Argument,
            BindingKind::Local => Segment::Local,
            BindingKind::Subroutine | BindingKind::ClassName => return None,
        };
        Some((segment, self.offset))
    }
}

/// A flat, ordered symbol table with per-kind offset counters.
#[derive(Debug, Default)]
pub struct SymbolTable {
    bindings: Vec<Binding>,
    statics: u32,
    fields: u32,
    arguments: u32,
    locals: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a binding, assigning its offset from the counter for its
    /// storage kind.
    pub fn insert(&mut self, mut binding: Binding) {
        let counter = match binding.kind {
            BindingKind::Static => Some(&mut self.statics),
            BindingKind::Field => Some(&mut self.fields),
            BindingKind::Argument => Some(&mut self.arguments),
            BindingKind::Local => Some(&mut self.locals),
            BindingKind::Subroutine | BindingKind::ClassName => None,
        };
        if let Some(counter) = counter {
            binding.offset = *counter;
            *counter += 1;
        }
        self.bindings.push(binding);
    }

    /// First binding with the given name, in insertion order.
    pub fn lookup(&self, name: Symbol) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.name == name)
    }

    pub fn lookup_mut(&mut self, name: Symbol) -> Option<&mut Binding> {
        self.bindings.iter_mut().find(|b| b.name == name)
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.lookup(name).is_some()
    }

    /// Flips the first matching binding's `initialised` flag to true.
    pub fn mark_initialised(&mut self, name: Symbol) {
        if let Some(binding) = self.lookup_mut(name) {
            binding.initialised = true;
        }
    }

    /// Reads the flag; false when the name is absent.
    pub fn is_initialised(&self, name: Symbol) -> bool {
        self.lookup(name).map_or(false, |b| b.initialised)
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Number of fields inserted so far.
    pub fn fields_count(&self) -> u32 {
        self.fields
    }

    /// Number of locals inserted so far.
    pub fn locals_count(&self) -> u32 {
        self.locals
    }
}

/// The stack of live scopes: program scope at the bottom, then the class
/// scope, then the subroutine scope while one is being parsed.
#[derive(Debug)]
pub struct ScopeStack {
    tables: Vec<SymbolTable>,
}

impl ScopeStack {
    /// A stack holding only the program scope.
    pub fn new() -> Self {
        Self {
            tables: vec![SymbolTable::new()],
        }
    }

    /// Pushes a fresh scope.
    pub fn push(&mut self) {
        self.tables.push(SymbolTable::new());
    }

    /// Pops the innermost scope, discarding it. The program root is never
    /// popped.
    pub fn pop(&mut self) {
        if self.tables.len() > 1 {
            self.tables.pop();
        }
    }

    /// The program scope.
    pub fn program(&self) -> &SymbolTable {
        &self.tables[0]
    }

    pub fn program_mut(&mut self) -> &mut SymbolTable {
        &mut self.tables[0]
    }

    /// The innermost scope.
    pub fn top(&self) -> &SymbolTable {
        self.tables.last().expect("scope stack is never empty")
    }

    pub fn top_mut(&mut self) -> &mut SymbolTable {
        self.tables.last_mut().expect("scope stack is never empty")
    }

    /// Looks a variable up through the scopes above the program root,
    /// innermost first.
    pub fn lookup(&self, name: Symbol) -> Option<&Binding> {
        self.tables
            .iter()
            .skip(1)
            .rev()
            .find_map(|table| table.lookup(name))
    }

    pub fn lookup_mut(&mut self, name: Symbol) -> Option<&mut Binding> {
        self.tables
            .iter_mut()
            .skip(1)
            .rev()
            .find_map(|table| table.lookup_mut(name))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
