//! Methods for walking the AST.

use ast::*;
use ast::visit::visitor::*;

/// Visit each statement in a `Module`.
#[inline]
pub fn walk_module<V>(visitor: &mut V, module: &Module)
                  where V: StmtVisitor {
    for stmt in module.stmts() {
        visitor.visit_stmt(stmt);
    }
}

/// Visit each statement in a block.
#[inline]
pub fn walk_block<V>(visitor: &mut V, block: &Block)
                 where V: StmtVisitor {
    for stmt in block.stmts() {
        visitor.visit_stmt(stmt);
    }
}

/// Visit the `FunDecl`'s parameter defaults and body.
#[inline]
pub fn walk_fun_decl<V>(visitor: &mut V, fun: &FunDecl)
                    where V: StmtVisitor {
    for param in fun.params() {
        if let Some(default) = param.default() {
            visitor.visit_expression(default);
        }
    }
    if let Some(body) = fun.body() {
        visitor.visit_block(body);
    }
}

/// Visit each member declaration of a nominal.
#[inline]
pub fn walk_nominal_decl<V>(visitor: &mut V, nominal: &NominalDecl)
                        where V: DeclVisitor {
    for member in nominal.members() {
        visitor.visit_decl(member);
    }
}

#[inline]
pub fn walk_binary_expr<V>(visitor: &mut V, binary: &BinaryExpr)
                       where V: ExprVisitor {
    visitor.visit_expression(binary.left());
    visitor.visit_expression(binary.right());
}

/// Visit the callee, then each argument in order.
#[inline]
pub fn walk_call_expr<V>(visitor: &mut V, call: &CallExpr)
                     where V: ExprVisitor {
    visitor.visit_expression(call.callee());
    for arg in call.args() {
        visitor.visit_expression(arg.value());
    }
}

#[inline]
pub fn walk_subscript_expr<V>(visitor: &mut V, subscript: &SubscriptExpr)
                          where V: ExprVisitor {
    visitor.visit_expression(subscript.callee());
    for arg in subscript.args() {
        visitor.visit_expression(arg.value());
    }
}

#[inline]
pub fn walk_select_expr<V>(visitor: &mut V, select: &SelectExpr)
                       where V: ExprVisitor {
    if let Some(owner) = select.owner() {
        visitor.visit_expression(owner);
    }
}

#[inline]
pub fn walk_if_expr<V>(visitor: &mut V, if_expr: &IfExpr)
                   where V: ExprVisitor {
    visitor.visit_expression(if_expr.condition());
    visitor.visit_expression(if_expr.then_branch());
    if let Some(else_branch) = if_expr.else_branch() {
        visitor.visit_expression(else_branch);
    }
}
