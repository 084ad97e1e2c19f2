//! Visitor traits for walking the AST.

use ast::*;

/// A visitor which can visit a whole module.
pub trait ModuleVisitor {
    fn visit_module(&mut self, module: &Module);
}

/// A visitor which can visit declarations.
pub trait DeclVisitor {
    fn visit_decl(&mut self, decl: &Decl) {
        match *decl {
            Decl::Prop(ref prop) => {
                self.visit_prop_decl(prop);
            }
            Decl::Fun(ref fun) => {
                self.visit_fun_decl(fun);
            }
            Decl::Nominal(ref nominal) => {
                self.visit_nominal_decl(nominal);
            }
        }
    }

    fn visit_prop_decl(&mut self, prop: &PropDecl);
    fn visit_fun_decl(&mut self, fun: &FunDecl);
    fn visit_nominal_decl(&mut self, nominal: &NominalDecl);
}

/// A visitor which can visit statements.
pub trait StmtVisitor: DeclVisitor + ExprVisitor {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match *stmt {
            Stmt::Decl(ref decl) => {
                self.visit_decl(decl);
            }
            Stmt::Expression(ref expr) => {
                self.visit_expression(expr);
            }
            Stmt::Binding(ref binding) => {
                self.visit_binding_stmt(binding);
            }
            Stmt::Return(ref return_) => {
                self.visit_return_stmt(return_);
            }
        }
    }

    fn visit_block(&mut self, block: &Block);
    fn visit_binding_stmt(&mut self, binding: &BindingStmt);
    fn visit_return_stmt(&mut self, return_: &ReturnStmt);
}

/// A visitor which can visit expressions.
pub trait ExprVisitor {
    fn visit_expression(&mut self, expr: &Expression) {
        match *expr {
            Expression::Literal(ref literal) => {
                self.visit_literal_expr(literal);
            }
            Expression::Ident(ref ident) => {
                self.visit_ident_expr(ident);
            }
            Expression::Binary(ref binary) => {
                self.visit_binary_expr(binary);
            }
            Expression::Call(ref call) => {
                self.visit_call_expr(call);
            }
            Expression::Select(ref select) => {
                self.visit_select_expr(select);
            }
            Expression::Subscript(ref subscript) => {
                self.visit_subscript_expr(subscript);
            }
            Expression::Lambda(ref lambda) => {
                self.visit_lambda_expr(lambda);
            }
            Expression::If(ref if_expr) => {
                self.visit_if_expr(if_expr);
            }
        }
    }

    fn visit_literal_expr(&mut self, literal: &Literal);
    fn visit_ident_expr(&mut self, ident: &Ident);
    fn visit_binary_expr(&mut self, binary: &BinaryExpr);
    fn visit_call_expr(&mut self, call: &CallExpr);
    fn visit_select_expr(&mut self, select: &SelectExpr);
    fn visit_subscript_expr(&mut self, subscript: &SubscriptExpr);
    fn visit_lambda_expr(&mut self, lambda: &LambdaExpr);
    fn visit_if_expr(&mut self, if_expr: &IfExpr);
}
