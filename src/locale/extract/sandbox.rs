//! Bounded whole-module evaluation (the most permissive strategy).
//!
//! Some resource modules only reveal their key table after "running": the
//! literal is bound to a local, reshuffled, then assigned to
//! `module.exports` or `exports.default`. Instead of executing anything we
//! parse the full module with swc and interpret the top level with a tiny
//! evaluator that models nothing but local bindings and the export surface.
//! There is no host access by construction, and a fuel budget bounds the
//! walk so a pathological module degrades to ordinary strategy failure.

use std::collections::HashMap;
use std::sync::Arc;

use swc_common::{FileName, GLOBALS, Globals, SourceMap};
use swc_ecma_ast::{
    AssignTarget, Decl, Expr, MemberExpr, MemberProp, Module, ModuleDecl, ModuleItem, Pat,
    SimpleAssignTarget, Stmt,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax};

use crate::locale::extract::object::{as_object_literal, collect_string_entries};

/// Inputs larger than this never enter the evaluator.
const MAX_MODULE_BYTES: usize = 1 << 20;

/// Evaluation budget: one unit per statement or expression step.
const FUEL: usize = 200_000;

type Entries = Vec<(String, String)>;

/// Evaluate the whole module text and read back the export surface.
///
/// `exports.default` wins over `module.exports`, matching how a consumer
/// of the module would import it. Returns `None` on parse failure, fuel
/// exhaustion, or an empty export surface.
pub fn evaluate_module(text: &str) -> Option<Entries> {
    if text.len() > MAX_MODULE_BYTES {
        return None;
    }

    let module = parse_module(text)?;
    let mut sandbox = Sandbox {
        fuel: FUEL,
        bindings: HashMap::new(),
        exports: None,
        default_export: None,
    };
    sandbox.run(&module)?;

    let entries = sandbox.default_export.or(sandbox.exports)?;
    if entries.is_empty() { None } else { Some(entries) }
}

fn parse_module(text: &str) -> Option<Module> {
    GLOBALS.set(&Globals::new(), || {
        let source_map: Arc<SourceMap> = Arc::default();
        let source_file = source_map.new_source_file(FileName::Anon.into(), text.to_string());

        let syntax = Syntax::Es(EsSyntax::default());
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);
        parser.parse_module().ok()
    })
}

struct Sandbox {
    fuel: usize,
    /// Top-level `const`/`let`/`var` bindings whose value is a key table.
    bindings: HashMap<String, Entries>,
    /// Accumulated `module.exports` / `exports.<name>` assignments.
    exports: Option<Entries>,
    /// The `exports.default` / `export default` slot.
    default_export: Option<Entries>,
}

impl Sandbox {
    fn run(&mut self, module: &Module) -> Option<()> {
        for item in &module.body {
            self.spend()?;
            match item {
                ModuleItem::Stmt(stmt) => self.eval_stmt(stmt)?,
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                    if let Some(entries) = self.eval_expr(&export.expr) {
                        self.default_export = Some(entries);
                    }
                }
                // Imports, named exports, and declarations other than the
                // export surface carry no key data for us.
                ModuleItem::ModuleDecl(_) => {}
            }
        }
        Some(())
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> Option<()> {
        self.spend()?;
        match stmt {
            Stmt::Decl(Decl::Var(var)) => {
                for declarator in &var.decls {
                    self.spend()?;
                    let Pat::Ident(ident) = &declarator.name else {
                        continue;
                    };
                    let Some(init) = &declarator.init else {
                        continue;
                    };
                    if let Some(entries) = self.eval_expr(init) {
                        self.bindings.insert(ident.sym.to_string(), entries);
                    }
                }
            }
            Stmt::Expr(expr_stmt) => {
                if let Expr::Assign(assign) = expr_stmt.expr.as_ref() {
                    self.eval_assignment(&assign.left, &assign.right)?;
                }
            }
            _ => {}
        }
        Some(())
    }

    fn eval_assignment(&mut self, target: &AssignTarget, value: &Expr) -> Option<()> {
        self.spend()?;
        let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = target else {
            return Some(());
        };
        let Some(entries) = self.eval_expr(value) else {
            return Some(());
        };

        match export_slot(member) {
            Some(ExportSlot::ModuleExports) => merge_into(&mut self.exports, entries),
            Some(ExportSlot::Default) => self.default_export = Some(entries),
            Some(ExportSlot::Named) => merge_into(&mut self.exports, entries),
            None => {}
        }
        Some(())
    }

    /// Evaluate an expression to a key table, if it is one we can model.
    fn eval_expr(&mut self, expr: &Expr) -> Option<Entries> {
        self.spend()?;
        match expr {
            Expr::Object(_) | Expr::Paren(_) => {
                let object = as_object_literal(expr)?;
                let mut entries = Vec::new();
                collect_string_entries(object, &mut entries);
                Some(entries)
            }
            Expr::Ident(ident) => self.bindings.get(ident.sym.as_ref()).cloned(),
            _ => None,
        }
    }

    fn spend(&mut self) -> Option<()> {
        self.fuel = self.fuel.checked_sub(1)?;
        Some(())
    }
}

enum ExportSlot {
    /// `module.exports = ...`
    ModuleExports,
    /// `exports.default = ...`
    Default,
    /// `exports.<name> = ...`
    Named,
}

fn export_slot(member: &MemberExpr) -> Option<ExportSlot> {
    let Expr::Ident(object) = member.obj.as_ref() else {
        return None;
    };
    let MemberProp::Ident(prop) = &member.prop else {
        return None;
    };

    match (object.sym.as_ref(), prop.sym.as_ref()) {
        ("module", "exports") => Some(ExportSlot::ModuleExports),
        ("exports", "default") => Some(ExportSlot::Default),
        ("exports", _) => Some(ExportSlot::Named),
        _ => None,
    }
}

fn merge_into(slot: &mut Option<Entries>, entries: Entries) {
    match slot {
        Some(existing) => existing.extend(entries),
        None => *slot = Some(entries),
    }
}
