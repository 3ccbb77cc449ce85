//! Source-like rendering of trees, for diagnostics and reports.

use crate::ast::{Expr, Function, FunctionId, Loop, Owner, Program, RECEIVER_NAME};
use alloc::string::String;
use core::fmt::Write;

const INDENT: &str = "    ";

impl<'a> Program<'a> {
    /// Render an expression in Kotlin-like syntax.
    pub fn render(&self, expr: &Expr<'a>) -> String {
        let mut out = String::new();
        Renderer { program: self, out: &mut out }.expr(expr, 0);
        out
    }

    /// Render a function declaration with its body.
    pub fn render_function(&self, id: FunctionId) -> String {
        let mut out = String::new();
        if let Some(function) = self.function(id) {
            Renderer { program: self, out: &mut out }.function(function);
        }
        out
    }

    /// Name of a function for messages: `evalFib`, `kotlin.Int.plus`, or the id
    /// if it does not exist.
    pub fn function_name(&self, id: FunctionId) -> String {
        match self.function(id) {
            Some(function) => function.fq_name(),
            None => alloc::format!("{}", id),
        }
    }
}

struct Renderer<'p, 'a> {
    program: &'p Program<'a>,
    out: &'p mut String,
}

impl<'a> Renderer<'_, 'a> {
    fn function(&mut self, function: &Function<'a>) {
        self.out.push_str("fun ");
        if let Owner::Class(ty) = function.owner {
            let _ = write!(self.out, "{}.", ty);
        }
        self.out.push_str(function.name);
        self.out.push('(');
        for (i, param) in function.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            let _ = write!(self.out, "{}: {}", param.name, param.ty);
        }
        let _ = write!(self.out, "): {}", function.return_type);
        if let Some(body) = function.body {
            self.out.push(' ');
            self.expr(body, 0);
        }
    }

    fn expr(&mut self, expr: &Expr<'a>, depth: usize) {
        match expr {
            Expr::Const(lit) => self.out.push_str(&lit.to_source()),
            Expr::VariableRef { name, .. } => self.name(name),
            Expr::VariableDecl { name, ty, init } => {
                let _ = write!(self.out, "var {}: {}", name, ty);
                if let Some(init) = init {
                    self.out.push_str(" = ");
                    self.expr(init, depth);
                }
            }
            Expr::Assign { name, value, .. } => {
                self.name(name);
                self.out.push_str(" = ");
                self.expr(value, depth);
            }
            Expr::Call(call) => self.call(call, depth),
            Expr::Block(statements) => {
                if statements.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push_str("{\n");
                for statement in statements.iter() {
                    self.indent(depth + 1);
                    self.expr(statement, depth + 1);
                    self.out.push('\n');
                }
                self.indent(depth);
                self.out.push('}');
            }
            Expr::Branch(arms) => {
                self.out.push_str("when {\n");
                for arm in arms.iter() {
                    self.indent(depth + 1);
                    self.expr(arm.cond, depth + 1);
                    self.out.push_str(" -> ");
                    self.expr(arm.result, depth + 1);
                    self.out.push('\n');
                }
                self.indent(depth);
                self.out.push('}');
            }
            Expr::WhileLoop(lp) => {
                self.label(lp);
                self.out.push_str("while (");
                self.expr(lp.cond, depth);
                self.out.push_str(") ");
                self.loop_body(lp, depth);
            }
            Expr::DoWhileLoop(lp) => {
                self.label(lp);
                self.out.push_str("do ");
                self.loop_body(lp, depth);
                self.out.push_str(" while (");
                self.expr(lp.cond, depth);
                self.out.push(')');
            }
            Expr::Return { value, .. } => {
                self.out.push_str("return ");
                self.expr(value, depth);
            }
            Expr::Break { target } => {
                let _ = write!(self.out, "break@{}", target);
            }
            Expr::Continue { target } => {
                let _ = write!(self.out, "continue@{}", target);
            }
        }
    }

    fn call(&mut self, call: &crate::ast::Call<'a>, depth: usize) {
        let name = self
            .program
            .function(call.callee)
            .map(|f| f.name)
            .unwrap_or("<unknown>");
        let infix = match name {
            "plus" => Some("+"),
            "minus" => Some("-"),
            "times" => Some("*"),
            "div" => Some("/"),
            "rem" => Some("%"),
            "less" => Some("<"),
            "lessOrEqual" => Some("<="),
            "greater" => Some(">"),
            "greaterOrEqual" => Some(">="),
            "EQEQ" | "ieee754equals" => Some("=="),
            "ANDAND" => Some("&&"),
            "OROR" => Some("||"),
            _ => None,
        };
        let operands: alloc::vec::Vec<_> = call.operands().collect();
        match (infix, operands.as_slice()) {
            (Some(op), [lhs, rhs]) => {
                self.out.push('(');
                self.expr(lhs, depth);
                let _ = write!(self.out, " {} ", op);
                self.expr(rhs, depth);
                self.out.push(')');
            }
            _ if name == "not" && call.receiver.is_some() && call.args.is_empty() => {
                self.out.push('!');
                self.operand(call.receiver, depth);
            }
            _ if name == "length" && call.receiver.is_some() && call.args.is_empty() => {
                self.operand(call.receiver, depth);
                self.out.push_str(".length");
            }
            _ => {
                if let Some(receiver) = call.receiver {
                    self.expr(receiver, depth);
                    self.out.push('.');
                }
                self.out.push_str(name);
                self.out.push('(');
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg, depth);
                }
                self.out.push(')');
            }
        }
    }

    fn operand(&mut self, expr: Option<&Expr<'a>>, depth: usize) {
        if let Some(expr) = expr {
            self.expr(expr, depth);
        }
    }

    fn loop_body(&mut self, lp: &Loop<'a>, depth: usize) {
        match lp.body {
            Some(body) => self.expr(body, depth),
            None => self.out.push_str("{}"),
        }
    }

    fn label(&mut self, lp: &Loop<'a>) {
        match lp.label {
            Some(label) => {
                let _ = write!(self.out, "{}@ ", label);
            }
            None => {
                let _ = write!(self.out, "{}@ ", lp.id);
            }
        }
    }

    fn name(&mut self, name: &str) {
        if name == RECEIVER_NAME {
            self.out.push_str("this");
        } else {
            self.out.push_str(name);
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }
}
