//! The resolver pass over the whole-program work-list.

use indexmap::IndexMap;

use jackc_par::obligation::{Obligation, ObligationKind};
use jackc_par::program::Program;
use jackc_par::symbols::BindingKind;
use jackc_par::vm::{Instr, Segment, VmFile};
use jackc_util::{Diagnostic, Handler, Symbol};

use crate::compat::compatible;

/// Runs deferred resolution over the parsed program.
///
/// Warnings flow through `handler`; the first error aborts and is
/// returned. On success the output buffers are fully patched and ready to
/// write.
pub fn resolve(program: &mut Program, handler: &mut Handler) -> Result<(), Diagnostic> {
    let return_types = return_type_table(program);
    substitute_return_types(&mut program.obligations, &return_types);
    patch_discards(&mut program.outputs, &return_types);

    fold_expressions(&mut program.obligations)?;
    check_returns(&mut program.obligations);
    check_array_indices(&program.obligations)?;

    resolve_names(program);
    check_assignments(&mut program.obligations);

    report(program, handler)
}

/// Name → declared type for every program-scope subroutine, field, and
/// static, first declaration wins. Fields and statics participate because
/// `C.x` parses the same way as `C.f()`.
fn return_type_table(program: &Program) -> IndexMap<Symbol, Symbol> {
    let mut table = IndexMap::new();
    for binding in program.scopes.program().bindings() {
        match binding.kind {
            BindingKind::Subroutine | BindingKind::Field | BindingKind::Static => {
                table.entry(binding.name).or_insert(binding.ty);
            },
            _ => {},
        }
    }
    table
}

/// Replaces subroutine names in the flat typing records with their
/// declared types, so the records fold over types only.
fn substitute_return_types(
    obligations: &mut [Obligation],
    return_types: &IndexMap<Symbol, Symbol>,
) {
    for obligation in obligations {
        let record = match &mut obligation.kind {
            ObligationKind::Call { args, .. } => args,
            ObligationKind::Assignment { expr, .. } => expr,
            ObligationKind::Return { expr, .. } => expr,
            ObligationKind::ArrayIndex { expr } => expr,
            ObligationKind::UnresolvedType { .. } => continue,
        };
        for entry in record {
            if let Some(ty) = return_types.get(entry) {
                *entry = *ty;
            }
        }
    }
}

/// Clears `do`-call patch markers now that callee return types are known.
///
/// A `do`-call is emitted as `call C.f n` (marker = bare callee name)
/// followed by `pop temp 0`. For a void callee the discard is correct and
/// only the marker goes; for a non-void callee the following `pop temp 0`
/// goes too, leaving the return value on the stack. Markers whose name
/// stays unknown are left in place; the same name also sits unresolved on
/// the work-list, which becomes a fatal error in [`report`].
fn patch_discards(outputs: &mut [VmFile], return_types: &IndexMap<Symbol, Symbol>) {
    for file in outputs {
        let code = &mut file.code;
        let mut i = 0;
        while i < code.len() {
            let pending = match &code[i] {
                Instr::Call {
                    marker: Some(name), ..
                } => return_types.get(name).copied(),
                _ => None,
            };
            if let Some(ty) = pending {
                if let Instr::Call { marker, .. } = &mut code[i] {
                    *marker = None;
                }
                if ty.as_str() != "void"
                    && matches!(code.get(i + 1), Some(Instr::Pop(Segment::Temp, 0)))
                {
                    code.remove(i + 1);
                }
            }
            i += 1;
        }
    }
}

/// The operators the typing pass folds over.
fn is_fold_operator(entry: &str) -> bool {
    matches!(entry, "*" | "/" | "+" | "-" | "<" | ">" | "=")
}

/// Folds every typing record left-to-right: each operator between two
/// compatible operand types collapses to the left type; an incompatible
/// pair is fatal.
fn fold_expressions(obligations: &mut [Obligation]) -> Result<(), Diagnostic> {
    for obligation in obligations.iter_mut() {
        let (file, line) = (obligation.file, obligation.line);
        let record = match &mut obligation.kind {
            ObligationKind::Call { args, .. } => args,
            ObligationKind::Assignment { expr, .. } => expr,
            ObligationKind::Return { expr, .. } => expr,
            ObligationKind::ArrayIndex { expr } => expr,
            ObligationKind::UnresolvedType { .. } => continue,
        };
        fold(record, file, line)?;
    }
    Ok(())
}

fn fold(record: &mut Vec<Symbol>, file: Symbol, line: u32) -> Result<(), Diagnostic> {
    let mut j = 0;
    while j < record.len() {
        if is_fold_operator(record[j].as_str()) && j >= 1 && j + 1 < record.len() {
            let left = record[j - 1];
            let right = record[j + 1];
            if compatible(left.as_str(), right.as_str()) {
                record.remove(j); // the operator
                record.remove(j); // the right operand type
                j = 0;
            } else {
                return Err(Diagnostic::error(
                    file.as_str(),
                    line,
                    None,
                    format!(
                        "Can't perform operation '{}' on non compatible types '{}' and '{}'.",
                        record[j], left, right
                    ),
                ));
            }
        } else {
            j += 1;
        }
    }
    Ok(())
}

/// Marks each return obligation compatible or not: declared subroutine
/// type against the folded expression type, the empty type for a bare
/// `return;`.
fn check_returns(obligations: &mut [Obligation]) {
    for obligation in obligations {
        if let ObligationKind::Return {
            declared,
            expr,
            compatible: ok,
        } = &mut obligation.kind
        {
            let found = expr.first().map_or("", |s| s.as_str());
            *ok = compatible(declared.as_str(), found);
        }
    }
}

/// Array subscripts must fold to a numeric-compatible type.
fn check_array_indices(obligations: &[Obligation]) -> Result<(), Diagnostic> {
    for obligation in obligations {
        if let ObligationKind::ArrayIndex { expr } = &obligation.kind {
            let ty = expr.first().map_or("", |s| s.as_str());
            if ty != "int" && ty != "char" && ty != "ArrayEntry" {
                return Err(resolve_error(
                    obligation,
                    "Array index must evaluate to an 'int' value.",
                ));
            }
        }
    }
    Ok(())
}

/// Resolves unresolved-type and call obligations against the program
/// scope, in program-scope insertion order.
fn resolve_names(program: &mut Program) {
    let Program {
        scopes,
        obligations,
        ..
    } = program;

    for binding in scopes.program().bindings() {
        match binding.kind {
            BindingKind::ClassName => {
                // `Main` is an entry point, not a usable type.
                if binding.name.as_str() == "Main" {
                    continue;
                }
                for obligation in obligations.iter_mut() {
                    if let ObligationKind::UnresolvedType { ty, resolved } = &mut obligation.kind {
                        if *ty == binding.name {
                            *resolved = true;
                        }
                    }
                }
            },
            BindingKind::Subroutine | BindingKind::Field | BindingKind::Static => {
                for obligation in obligations.iter_mut() {
                    let ObligationKind::Call {
                        name,
                        ctor,
                        args,
                        resolved,
                        args_match,
                    } = &mut obligation.kind
                    else {
                        continue;
                    };
                    let matches = match ctor {
                        None => *name == binding.name,
                        // A constructor call matches on name and on the
                        // constructed class, which is the constructor's
                        // declared return type.
                        Some(class) => *name == binding.name && *class == binding.ty,
                    };
                    if !matches {
                        continue;
                    }
                    *resolved = true;
                    if args.len() == binding.params.len() {
                        *args_match = true;
                        for (declared, found) in binding.params.iter().zip(args.iter()) {
                            if declared != found
                                && !compatible(declared.as_str(), found.as_str())
                            {
                                *args_match = false;
                            }
                        }
                    }
                }
            },
            _ => {},
        }
    }
}

/// Marks each assignment compatible or not: declared left-hand type
/// against the folded right-hand type.
fn check_assignments(obligations: &mut [Obligation]) {
    for obligation in obligations {
        if let ObligationKind::Assignment {
            lhs,
            expr,
            compatible: ok,
        } = &mut obligation.kind
        {
            let rhs = expr.first().map_or("", |s| s.as_str());
            *ok = compatible(lhs.as_str(), rhs);
        }
    }
}

/// Final diagnostics: fatal unknowns first, then the non-fatal mismatch
/// warnings, each category in work-list order.
fn report(program: &Program, handler: &mut Handler) -> Result<(), Diagnostic> {
    for obligation in &program.obligations {
        if let ObligationKind::UnresolvedType {
            ty,
            resolved: false,
        } = &obligation.kind
        {
            return Err(resolve_error(
                obligation,
                format!("Unknown type '{}'.", ty),
            ));
        }
    }

    for obligation in &program.obligations {
        if let ObligationKind::Call {
            name,
            ctor,
            resolved,
            args_match,
            ..
        } = &obligation.kind
        {
            match ctor {
                None => {
                    if *resolved && !args_match {
                        handler.emit(resolve_warning(
                            obligation,
                            "call arguments do not match subroutine declaration.",
                        ));
                    } else if !resolved {
                        return Err(resolve_error(
                            obligation,
                            format!("Unknown subroutine '{}()'.", name),
                        ));
                    }
                },
                Some(class) => {
                    if *resolved && !args_match {
                        handler.emit(resolve_warning(
                            obligation,
                            "call arguments do not match constructor declaration.",
                        ));
                    } else if !resolved {
                        return Err(resolve_error(
                            obligation,
                            format!("Unknown constructor '{}.{}()'.", class, name),
                        ));
                    }
                },
            }
        }
    }

    for obligation in &program.obligations {
        if let ObligationKind::Assignment {
            lhs,
            expr,
            compatible: false,
        } = &obligation.kind
        {
            let rhs = expr.first().map_or("", |s| s.as_str());
            handler.emit(resolve_warning(
                obligation,
                format!("The type '{}' is not compatible with '{}'.", lhs, rhs),
            ));
        }
    }

    for obligation in &program.obligations {
        if let ObligationKind::Return {
            declared,
            expr,
            compatible: false,
        } = &obligation.kind
        {
            let found = expr.first().map_or("", |s| s.as_str());
            handler.emit(resolve_warning(
                obligation,
                format!("The type '{}' is not compatible with '{}'.", declared, found),
            ));
        }
    }

    Ok(())
}

fn resolve_error(obligation: &Obligation, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(obligation.file.as_str(), obligation.line, None, message)
}

fn resolve_warning(obligation: &Obligation, message: impl Into<String>) -> Diagnostic {
    Diagnostic::warning(obligation.file.as_str(), obligation.line, None, message)
}
