//! Pre-pass scanning the whole tree for what the rendered Python needs
//! up front: its imports and any inline helper functions. Python's
//! `import` statements have to sit above the code that uses them, so
//! this has to run as a separate pass before the main walk rather than
//! be discovered lazily mid-walk the way `fabula_fmt::walker` can get
//! away with (it never needs a prelude).

use fabula_parser::{Expr, LambdaBody, Module, ObjectProperty, Pattern, PrimitiveTarget, Stmt, Type};

use fabula_fmt::ir::{concat, hardline, text, FormatIR};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    pub dataclass: bool,
    pub enum_: bool,
    pub enum_auto: bool,
    pub protocol: bool,
    pub abc: bool,
    pub logging: bool,
    pub unittest: bool,
    pub asyncio: bool,
    pub literal_typing: bool,
    pub callable_typing: bool,
    pub fallback_numerus: bool,
    pub fallback_fractus: bool,
}

impl Requirements {
    pub fn scan(module: &Module) -> Requirements {
        let mut reqs = Requirements::default();
        for stmt in &module.statements {
            reqs.visit_stmt(stmt);
        }
        reqs
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block { statements, .. } => self.visit_block(statements),

            Stmt::Expr { expr, .. } => self.visit_expr(expr),
            Stmt::Empty { .. } => {}

            Stmt::VarDecl { init, ty, .. } => {
                if let Some(init) = init {
                    self.visit_expr(init);
                }
                if let Some(ty) = ty {
                    self.visit_type(ty);
                }
            }

            Stmt::FunctionDecl { params, ret, body, is_abstract, .. } => {
                if *is_abstract {
                    self.abc = true;
                }
                for p in params {
                    if let Some(ty) = &p.ty {
                        self.visit_type(ty);
                    }
                    if let Some(default) = &p.default {
                        self.visit_expr(default);
                    }
                }
                if let Some(ret) = ret {
                    self.visit_type(ret);
                }
                if let Some(body) = body {
                    self.visit_block(body);
                }
            }

            Stmt::ClassDecl { fields, methods, is_abstract, .. } => {
                self.dataclass = true;
                if *is_abstract {
                    self.abc = true;
                }
                for f in fields {
                    self.visit_type(&f.ty);
                    if let Some(default) = &f.default {
                        self.visit_expr(default);
                    }
                }
                for m in methods {
                    self.visit_stmt(m);
                }
            }

            Stmt::InterfaceDecl { methods, .. } => {
                self.protocol = true;
                for m in methods {
                    for p in &m.params {
                        if let Some(ty) = &p.ty {
                            self.visit_type(ty);
                        }
                    }
                    if let Some(ret) = &m.ret {
                        self.visit_type(ret);
                    }
                }
            }

            Stmt::EnumDecl { members, .. } => {
                self.enum_ = true;
                for m in members {
                    match &m.value {
                        Some(value) => self.visit_expr(value),
                        None => self.enum_auto = true,
                    }
                }
            }

            Stmt::UnionDecl { variants, .. } => {
                self.dataclass = true;
                for v in variants {
                    for f in &v.fields {
                        self.visit_type(&f.ty);
                        if let Some(default) = &f.default {
                            self.visit_expr(default);
                        }
                    }
                }
            }

            Stmt::Import { .. } | Stmt::TypeAlias { .. } => {}

            Stmt::If { cond, then_branch, else_branch, .. } => {
                self.visit_expr(cond);
                self.visit_stmt(then_branch);
                if let Some(e) = else_branch {
                    self.visit_stmt(e);
                }
            }

            Stmt::While { cond, body, .. } => {
                self.visit_expr(cond);
                self.visit_stmt(body);
            }

            Stmt::DoWhile { body, cond, .. } => {
                self.visit_stmt(body);
                self.visit_expr(cond);
            }

            Stmt::For { iterator, body, is_async, .. } => {
                if *is_async {
                    self.asyncio = true;
                }
                self.visit_expr(iterator);
                self.visit_stmt(body);
            }

            Stmt::Switch { subject, cases, default, .. } => {
                self.visit_expr(subject);
                for c in cases {
                    self.visit_expr(&c.pattern);
                    self.visit_case_body(&c.body);
                }
                if let Some(default) = default {
                    self.visit_case_body(default);
                }
            }

            Stmt::Match { scrutinees, cases, .. } => {
                for s in scrutinees {
                    self.visit_expr(s);
                }
                for c in cases {
                    for pattern in &c.patterns {
                        self.visit_pattern(pattern);
                    }
                    self.visit_block(&c.body);
                }
            }

            Stmt::Guard { clauses, .. } => {
                for clause in clauses {
                    self.visit_expr(&clause.cond);
                    self.visit_block(&clause.body);
                }
            }

            Stmt::Try { block, catch, finally, .. } => {
                self.visit_stmt(block);
                if let Some(catch) = catch {
                    self.visit_block(&catch.body);
                }
                if let Some(finally) = finally {
                    self.visit_stmt(finally);
                }
            }

            Stmt::Return { value, .. } => {
                if let Some(v) = value {
                    self.visit_expr(v);
                }
            }

            Stmt::Throw { value, .. } => self.visit_expr(value),

            Stmt::Print { value, severity, .. } => {
                if !matches!(severity, fabula_parser::PrintSeverity::Info) {
                    self.logging = true;
                }
                self.visit_expr(value);
            }

            Stmt::Assert { cond, message, .. } => {
                self.visit_expr(cond);
                if let Some(m) = message {
                    self.visit_expr(m);
                }
            }

            Stmt::Break { .. } | Stmt::Continue { .. } => {}

            Stmt::EntryPoint { body, is_async, .. } => {
                if *is_async {
                    self.asyncio = true;
                }
                self.visit_block(body);
            }

            Stmt::TestSuite { body, .. } => {
                self.unittest = true;
                for m in body {
                    self.visit_stmt(m);
                }
            }

            Stmt::TestCase { body, .. } => {
                self.unittest = true;
                self.visit_block(body);
            }
        }
    }

    fn visit_block(&mut self, statements: &[Stmt]) {
        for s in statements {
            self.visit_stmt(s);
        }
    }

    fn visit_case_body(&mut self, body: &fabula_parser::CaseBody) {
        match body {
            fabula_parser::CaseBody::Block { statements } => self.visit_block(statements),
            fabula_parser::CaseBody::Return { expr } => self.visit_expr(expr),
        }
    }

    fn visit_pattern(&mut self, _pattern: &Pattern) {}

    fn visit_object_properties(&mut self, properties: &[ObjectProperty]) {
        for prop in properties {
            self.visit_expr(&prop.value);
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier { .. } | Expr::SelfRef { .. } | Expr::Literal { .. } => {}

            Expr::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }

            Expr::Unary { operand, .. } => self.visit_expr(operand),

            Expr::Assign { target, value, .. } => {
                self.visit_expr(target);
                self.visit_expr(value);
            }

            Expr::Ternary { cond, consequent, alternative, .. } => {
                self.visit_expr(cond);
                self.visit_expr(consequent);
                self.visit_expr(alternative);
            }

            Expr::Call { callee, args, .. } => {
                self.visit_expr(callee);
                for a in args {
                    self.visit_expr(a);
                }
            }

            Expr::Member { object, .. } => self.visit_expr(object),

            Expr::ArrayLiteral { elements, .. } => {
                for e in elements {
                    self.visit_expr(e);
                }
            }

            Expr::ObjectLiteral { properties, .. } => self.visit_object_properties(properties),

            Expr::Lambda { params, body, is_async, .. } => {
                if *is_async {
                    self.asyncio = true;
                }
                for p in params {
                    if let Some(default) = &p.default {
                        self.visit_expr(default);
                    }
                }
                match body {
                    LambdaBody::Expr { expr } => self.visit_expr(expr),
                    LambdaBody::Block { statements } => self.visit_block(statements),
                }
            }

            Expr::New { callee, args, init, .. } => {
                self.visit_expr(callee);
                for a in args {
                    self.visit_expr(a);
                }
                if let Some(init) = init {
                    self.visit_object_properties(init);
                }
            }

            Expr::Await { operand, .. } => {
                self.asyncio = true;
                self.visit_expr(operand);
            }

            Expr::TypeAssert { operand, target, .. } => {
                self.visit_expr(operand);
                self.visit_type(target);
            }

            Expr::VariantConstruct { fields, type_hint, .. } => {
                self.visit_object_properties(fields);
                if let Some(ty) = type_hint {
                    self.visit_type(ty);
                }
            }

            Expr::Template { args, .. } => {
                for a in args {
                    self.visit_expr(a);
                }
            }

            Expr::Range { start, end, .. } => {
                self.visit_expr(start);
                self.visit_expr(end);
            }

            Expr::Convert { operand, target, fallback, .. } => {
                self.visit_expr(operand);
                if let Some(fallback) = fallback {
                    self.visit_expr(fallback);
                    match target {
                        PrimitiveTarget::Number => self.fallback_numerus = true,
                        PrimitiveTarget::Fraction => self.fallback_fractus = true,
                        _ => {}
                    }
                }
            }
        }
    }

    fn visit_type(&mut self, ty: &Type) {
        match ty {
            Type::Named { .. } => {}
            Type::Generic { args, .. } => {
                for a in args {
                    self.visit_type(a);
                }
            }
            Type::Function { params, ret, .. } => {
                self.callable_typing = true;
                for p in params {
                    self.visit_type(p);
                }
                self.visit_type(ret);
            }
            Type::Nullable { inner, .. } => self.visit_type(inner),
            Type::Union { members, .. } => {
                for m in members {
                    self.visit_type(m);
                }
            }
            Type::Literal { .. } => self.literal_typing = true,
        }
    }

    /// Render the import/helper prelude this scan calls for. Returns
    /// `FormatIR::Empty` when nothing is needed.
    pub fn render(&self) -> FormatIR {
        let mut lines: Vec<FormatIR> = Vec::new();

        if self.asyncio {
            lines.push(text("import asyncio"));
        }
        if self.logging {
            lines.push(text("import logging"));
        }
        if self.unittest {
            lines.push(text("import unittest"));
        }
        if self.dataclass {
            lines.push(text("from dataclasses import dataclass"));
        }
        if self.abc {
            lines.push(text("from abc import ABC, abstractmethod"));
        }
        if self.protocol {
            lines.push(text("from typing import Protocol"));
        }
        if self.enum_ {
            if self.enum_auto {
                lines.push(text("from enum import Enum, auto"));
            } else {
                lines.push(text("from enum import Enum"));
            }
        }
        if self.literal_typing && self.callable_typing {
            lines.push(text("from typing import Callable, Literal"));
        } else if self.literal_typing {
            lines.push(text("from typing import Literal"));
        } else if self.callable_typing {
            lines.push(text("from typing import Callable"));
        }

        let mut parts = Vec::new();
        if !lines.is_empty() {
            parts.push(lines.remove(0));
            for line in lines {
                parts.push(hardline());
                parts.push(line);
            }
        }

        if self.fallback_numerus {
            if !parts.is_empty() {
                parts.push(hardline());
                parts.push(hardline());
            }
            parts.push(fallback_helper("_fallback_numerus", "int"));
        }
        if self.fallback_fractus {
            if !parts.is_empty() {
                parts.push(hardline());
                parts.push(hardline());
            }
            parts.push(fallback_helper("_fallback_fractus", "float"));
        }

        if parts.is_empty() {
            FormatIR::Empty
        } else {
            concat(parts)
        }
    }
}

fn fallback_helper(name: &str, conv: &str) -> FormatIR {
    concat(vec![
        text(format!("def {name}(value, fallback):")),
        hardline(),
        text("    try:"),
        hardline(),
        text(format!("        return {conv}(value)")),
        hardline(),
        text("    except (TypeError, ValueError):"),
        hardline(),
        text("        return fallback"),
    ])
}
