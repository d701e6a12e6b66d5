use oxc::{
  allocator::Allocator,
  ast::ast::{
    Argument, ArrayExpressionElement, AssignmentOperator, AssignmentTarget, BindingPatternKind,
    CallExpression, Class, ClassElement, Declaration, ExportDefaultDeclarationKind, Expression,
    ObjectPropertyKind, Program, Statement, UnaryOperator, VariableDeclaration,
  },
  parser::Parser,
  span::SourceType,
};
use rustc_hash::FxHashSet;

/// Identifiers a compiled module body uses to pull in a dependency.
const REQUIRE_CALLEES: [&str; 4] = ["require", "_$$_REQUIRE", "_$$_IMPORT_DEFAULT", "_$$_IMPORT_ALL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleBodyAnalysis {
  /// Nothing but directives, comments and empty statements.
  pub is_empty: bool,
  pub has_side_effects: bool,
}

impl ModuleBodyAnalysis {
  const UNKNOWN: Self = Self { is_empty: false, has_side_effects: true };
}

/// Decide whether evaluating the top level of `code` can be observed from outside.
///
/// Requiring a dependency is not counted: the dependency's own side effects are tracked on
/// the graph. Code that fails to parse is assumed to have side effects.
pub fn analyze_module_body(code: &str) -> ModuleBodyAnalysis {
  let allocator = Allocator::default();
  for source_type in [SourceType::mjs(), SourceType::cjs()] {
    let ret = Parser::new(&allocator, code, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
      continue;
    }
    return analyze_program(&ret.program);
  }
  ModuleBodyAnalysis::UNKNOWN
}

fn analyze_program(program: &Program) -> ModuleBodyAnalysis {
  let is_empty = program.body.iter().all(|stmt| matches!(stmt, Statement::EmptyStatement(_)));
  if is_empty {
    return ModuleBodyAnalysis { is_empty, has_side_effects: false };
  }

  let mut purity = Purity::default();
  for stmt in &program.body {
    if !purity.is_pure_statement(stmt) {
      return ModuleBodyAnalysis { is_empty, has_side_effects: true };
    }
    // A binding only counts once its initializer has run.
    purity.collect_require_bindings(stmt);
  }
  ModuleBodyAnalysis { is_empty, has_side_effects: false }
}

/// Tracks top-level bindings initialized from a dependency `require`, like `_foo` in
/// `var _foo = _$$_REQUIRE(_dependencyMap[0]);`. Reading their properties is pure.
#[derive(Default)]
struct Purity {
  require_bindings: FxHashSet<String>,
}

impl Purity {
  fn collect_require_bindings(&mut self, stmt: &Statement) {
    let decl = match stmt {
      Statement::VariableDeclaration(decl) => decl,
      Statement::ExportNamedDeclaration(export) => match &export.declaration {
        Some(Declaration::VariableDeclaration(decl)) => decl,
        _ => return,
      },
      _ => return,
    };
    for declarator in &decl.declarations {
      let BindingPatternKind::BindingIdentifier(ident) = &declarator.id.kind else {
        continue;
      };
      if declarator.init.as_ref().is_some_and(is_dependency_require) {
        self.require_bindings.insert(ident.name.to_string());
      } else {
        self.require_bindings.remove(ident.name.as_str());
      }
    }
  }

  fn is_pure_statement(&self, stmt: &Statement) -> bool {
    match stmt {
      Statement::EmptyStatement(_)
      | Statement::FunctionDeclaration(_)
      | Statement::ImportDeclaration(_)
      | Statement::ExportAllDeclaration(_) => true,
      Statement::ClassDeclaration(class) => self.is_pure_class(class),
      Statement::VariableDeclaration(decl) => self.is_pure_variable_declaration(decl),
      Statement::ExpressionStatement(stmt) => self.is_pure_top_level_expression(&stmt.expression),
      Statement::ExportNamedDeclaration(decl) => {
        decl.declaration.as_ref().map_or(true, |decl| self.is_pure_declaration(decl))
      }
      Statement::ExportDefaultDeclaration(decl) => match &decl.declaration {
        ExportDefaultDeclarationKind::FunctionDeclaration(_) => true,
        ExportDefaultDeclarationKind::ClassDeclaration(class) => self.is_pure_class(class),
        kind => kind.as_expression().is_some_and(|expr| self.is_pure_expression(expr)),
      },
      _ => false,
    }
  }

  fn is_pure_declaration(&self, decl: &Declaration) -> bool {
    match decl {
      Declaration::VariableDeclaration(decl) => self.is_pure_variable_declaration(decl),
      Declaration::FunctionDeclaration(_) => true,
      Declaration::ClassDeclaration(class) => self.is_pure_class(class),
      _ => false,
    }
  }

  fn is_pure_variable_declaration(&self, decl: &VariableDeclaration) -> bool {
    decl.declarations.iter().all(|declarator| {
      // Destructuring may run getters.
      matches!(declarator.id.kind, BindingPatternKind::BindingIdentifier(_))
        && declarator.init.as_ref().map_or(true, |init| self.is_pure_expression(init))
    })
  }

  fn is_pure_class(&self, class: &Class) -> bool {
    let is_pure_value =
      |value: Option<&Expression>| value.map_or(true, |value| self.is_pure_expression(value));
    class.decorators.is_empty()
      && class.super_class.as_ref().map_or(true, |super_class| {
        matches!(super_class, Expression::Identifier(_)) || is_dependency_require(super_class)
      })
      && class.body.body.iter().all(|element| match element {
        ClassElement::StaticBlock(_) => false,
        ClassElement::MethodDefinition(method) => !method.computed,
        ClassElement::PropertyDefinition(prop) => {
          !prop.computed && (!prop.r#static || is_pure_value(prop.value.as_ref()))
        }
        ClassElement::AccessorProperty(prop) => {
          !prop.computed && (!prop.r#static || is_pure_value(prop.value.as_ref()))
        }
        ClassElement::TSIndexSignature(_) => true,
      })
  }

  fn is_pure_expression(&self, expr: &Expression) -> bool {
    match expr {
      Expression::BooleanLiteral(_)
      | Expression::NullLiteral(_)
      | Expression::NumericLiteral(_)
      | Expression::BigIntLiteral(_)
      | Expression::StringLiteral(_)
      | Expression::RegExpLiteral(_)
      | Expression::Identifier(_)
      | Expression::FunctionExpression(_)
      | Expression::ArrowFunctionExpression(_) => true,
      Expression::TemplateLiteral(template) => template.expressions.is_empty(),
      Expression::ClassExpression(class) => self.is_pure_class(class),
      Expression::ParenthesizedExpression(expr) => self.is_pure_expression(&expr.expression),
      Expression::UnaryExpression(expr) => {
        matches!(
          expr.operator,
          UnaryOperator::Void
            | UnaryOperator::LogicalNot
            | UnaryOperator::Typeof
            | UnaryOperator::UnaryNegation
        ) && self.is_pure_expression(&expr.argument)
      }
      Expression::ArrayExpression(array) => array.elements.iter().all(|element| match element {
        ArrayExpressionElement::SpreadElement(_) => false,
        ArrayExpressionElement::Elision(_) => true,
        element => element.as_expression().is_some_and(|expr| self.is_pure_expression(expr)),
      }),
      Expression::ObjectExpression(object) => object.properties.iter().all(|prop| match prop {
        ObjectPropertyKind::ObjectProperty(prop) => {
          !prop.computed && self.is_pure_expression(&prop.value)
        }
        ObjectPropertyKind::SpreadProperty(_) => false,
      }),
      Expression::StaticMemberExpression(member) => self.is_pure_member_object(&member.object),
      Expression::CallExpression(_) => is_dependency_require(expr),
      _ => false,
    }
  }

  /// `_foo.bar`, `_foo.bar.baz` and `_$$_IMPORT_DEFAULT(...).default`.
  fn is_pure_member_object(&self, object: &Expression) -> bool {
    match object {
      Expression::Identifier(ident) => self.require_bindings.contains(ident.name.as_str()),
      Expression::StaticMemberExpression(member) => self.is_pure_member_object(&member.object),
      object => is_dependency_require(object),
    }
  }

  /// Statements that only set up the module's own exports.
  fn is_pure_top_level_expression(&self, expr: &Expression) -> bool {
    match expr {
      Expression::StringLiteral(_) => true,
      Expression::AssignmentExpression(assign) => {
        assign.operator == AssignmentOperator::Assign
          && is_exports_target(&assign.left)
          && (self.is_pure_expression(&assign.right)
            || self.is_pure_top_level_expression(&assign.right))
      }
      Expression::SequenceExpression(seq) => {
        seq.expressions.iter().all(|expr| self.is_pure_top_level_expression(expr))
      }
      Expression::CallExpression(call) => self.is_define_exports_property(call),
      expr => is_dependency_require(expr),
    }
  }

  /// `Object.defineProperty(exports, "name", { ... })`
  fn is_define_exports_property(&self, call: &CallExpression) -> bool {
    let Expression::StaticMemberExpression(callee) = &call.callee else {
      return false;
    };
    let is_object_define = callee.property.name.as_str() == "defineProperty"
      && matches!(&callee.object, Expression::Identifier(ident) if ident.name.as_str() == "Object");
    is_object_define
      && call.arguments.first().and_then(Argument::as_expression).is_some_and(is_exports_object)
      && call
        .arguments
        .iter()
        .all(|arg| arg.as_expression().is_some_and(|expr| self.is_pure_expression(expr)))
  }
}

fn is_exports_object(expr: &Expression) -> bool {
  match expr {
    Expression::Identifier(ident) => ident.name.as_str() == "exports",
    Expression::StaticMemberExpression(member) => {
      member.property.name.as_str() == "exports"
        && matches!(&member.object, Expression::Identifier(ident) if ident.name.as_str() == "module")
    }
    _ => false,
  }
}

fn is_exports_target(target: &AssignmentTarget) -> bool {
  match target {
    AssignmentTarget::StaticMemberExpression(member) => {
      is_exports_object(&member.object)
        || (member.property.name.as_str() == "exports"
          && matches!(&member.object, Expression::Identifier(ident) if ident.name.as_str() == "module"))
    }
    AssignmentTarget::ComputedMemberExpression(member) => {
      is_exports_object(&member.object) && matches!(member.expression, Expression::StringLiteral(_))
    }
    _ => false,
  }
}

/// `_$$_REQUIRE(_dependencyMap[0])`, `require("./foo")` and friends.
fn is_dependency_require(expr: &Expression) -> bool {
  let Expression::CallExpression(call) = expr else {
    return false;
  };
  let Expression::Identifier(callee) = &call.callee else {
    return false;
  };
  if !REQUIRE_CALLEES.contains(&callee.name.as_str()) || call.arguments.len() != 1 {
    return false;
  }
  match call.arguments[0].as_expression() {
    Some(Expression::StringLiteral(_)) => true,
    Some(Expression::ComputedMemberExpression(member)) => {
      matches!(&member.object, Expression::Identifier(ident) if ident.name.as_str().ends_with("dependencyMap"))
        && matches!(member.expression, Expression::NumericLiteral(_))
    }
    _ => false,
  }
}
