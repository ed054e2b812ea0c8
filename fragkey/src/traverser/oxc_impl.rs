use oxc::ast::ast::{ArrowFunctionExpression, Function, FunctionType, Program};
use oxc_traverse::{Traverse, TraverseCtx};

use crate::component_name::{FunctionForm, is_method, resolve_name};

impl<'a> Traverse<'a> for super::FragmentKeyTraverser<'a, '_> {
	fn enter_program(&mut self, node: &mut Program<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.registry.get_or_create(self.file);
		self.fragment_binding = super::find_fragment_import(node);
	}

	fn enter_function(&mut self, node: &mut Function<'a>, ctx: &mut TraverseCtx<'a>) {
		let form = match node.r#type {
			FunctionType::FunctionDeclaration => FunctionForm::Declaration,
			FunctionType::FunctionExpression => FunctionForm::Expression,
			FunctionType::TSDeclareFunction | FunctionType::TSEmptyBodyFunctionExpression => return,
		};

		if is_method(ctx) {
			return;
		}

		let name = resolve_name(form, node.id.as_ref().map(|id| id.name), ctx);
		if let Some(body) = node.body.as_mut() {
			self.process_component(body, false, name, ctx);
		}
	}

	fn enter_arrow_function_expression(
		&mut self,
		node: &mut ArrowFunctionExpression<'a>,
		ctx: &mut TraverseCtx<'a>,
	) {
		let name = resolve_name(FunctionForm::Arrow, None, ctx);
		self.process_component(&mut node.body, node.expression, name, ctx);
	}

	fn exit_program(&mut self, node: &mut Program<'a>, ctx: &mut TraverseCtx<'a>) {
		if let Some(binding) = self.fragment_binding.filter(|binding| binding.generated) {
			let import = self.import_declaration(binding, ctx);
			node.body.insert(0, import);
		}
	}
}
