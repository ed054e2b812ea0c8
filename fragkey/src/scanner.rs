//! Finds the expressions a component returns at its own top level.
//!
//! A `return` can only appear in statement position, and every statement
//! list that is not this function's own belongs to some nested function or
//! class. Walking statements only, and never descending into expressions
//! or nested declarations, therefore yields exactly the returns whose
//! nearest enclosing function is the one being scanned.

use oxc::ast::ast::{Expression, FunctionBody, IfStatement, Statement, TryStatement};

/// Strips any parentheses wrapping `expr`.
pub fn unparenthesize<'a, 'b>(expr: &'b mut Expression<'a>) -> &'b mut Expression<'a> {
	match expr {
		Expression::ParenthesizedExpression(paren) => unparenthesize(&mut paren.expression),
		_ => expr,
	}
}

/// Whether `expr` is a JSX element or fragment.
pub fn is_renderable(mut expr: &Expression<'_>) -> bool {
	while let Expression::ParenthesizedExpression(paren) = expr {
		expr = &paren.expression;
	}
	matches!(expr, Expression::JSXElement(_) | Expression::JSXFragment(_))
}

/// Collects every candidate returned node of a function-like node, in
/// source order.
///
/// An arrow whose expression body is itself JSX yields that body and nothing
/// else. Otherwise the argument of every `return` owned by the function is
/// yielded; bare `return;` yields nothing.
pub fn top_level_returns<'a, 'b>(
	body: &'b mut FunctionBody<'a>,
	expression_body: bool,
) -> Vec<&'b mut Expression<'a>> {
	let mut found = Vec::new();

	if expression_body {
		if let Some(Statement::ExpressionStatement(stmt)) = body.statements.first_mut() {
			if is_renderable(&stmt.expression) {
				found.push(unparenthesize(&mut stmt.expression));
			}
		}
		return found;
	}

	collect_statements(&mut body.statements, &mut found);
	found
}

/// Walks a statement list for owned returns.
fn collect_statements<'a, 'b>(
	stmts: &'b mut [Statement<'a>],
	found: &mut Vec<&'b mut Expression<'a>>,
) {
	for stmt in stmts {
		collect_statement(stmt, found);
	}
}

/// Walks a single statement for owned returns.
fn collect_statement<'a, 'b>(
	stmt: &'b mut Statement<'a>,
	found: &mut Vec<&'b mut Expression<'a>>,
) {
	match stmt {
		Statement::ReturnStatement(ret) => {
			if let Some(argument) = ret.argument.as_mut() {
				found.push(unparenthesize(argument));
			}
		}
		Statement::BlockStatement(block) => collect_statements(&mut block.body, found),
		Statement::IfStatement(stmt) => {
			let IfStatement {
				consequent,
				alternate,
				..
			} = &mut **stmt;
			collect_statement(consequent, found);
			if let Some(alternate) = alternate.as_mut() {
				collect_statement(alternate, found);
			}
		}
		Statement::ForStatement(stmt) => collect_statement(&mut stmt.body, found),
		Statement::ForInStatement(stmt) => collect_statement(&mut stmt.body, found),
		Statement::ForOfStatement(stmt) => collect_statement(&mut stmt.body, found),
		Statement::WhileStatement(stmt) => collect_statement(&mut stmt.body, found),
		Statement::DoWhileStatement(stmt) => collect_statement(&mut stmt.body, found),
		Statement::LabeledStatement(stmt) => collect_statement(&mut stmt.body, found),
		Statement::WithStatement(stmt) => collect_statement(&mut stmt.body, found),
		Statement::SwitchStatement(stmt) => {
			for case in stmt.cases.iter_mut() {
				collect_statements(&mut case.consequent, found);
			}
		}
		Statement::TryStatement(stmt) => {
			let TryStatement {
				block,
				handler,
				finalizer,
				..
			} = &mut **stmt;
			collect_statements(&mut block.body, found);
			if let Some(handler) = handler.as_mut() {
				collect_statements(&mut handler.body.body, found);
			}
			if let Some(finalizer) = finalizer.as_mut() {
				collect_statements(&mut finalizer.body, found);
			}
		}
		// Nested functions and classes own their returns; everything else
		// cannot contain a return at all.
		_ => {}
	}
}
