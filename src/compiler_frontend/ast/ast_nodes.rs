use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Variable(String),

    // '=' is a binary operator as well, the lhs must be a variable
    Binary {
        operator: char,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    Call {
        callee: String,
        arguments: Vec<Expr>,
    },

    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    // for var_name = start, end, step in body
    For {
        var_name: String,
        start: Box<Expr>,
        end: Box<Expr>,
        step: Option<Box<Expr>>,
        body: Box<Expr>,
    },

    // var a = 1, b in body
    VarIn {
        bindings: Vec<VarBinding>,
        body: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarBinding {
    pub name: String,
    pub initializer: Option<Expr>,
}

impl Expr {
    pub fn new(kind: ExprKind, location: TextLocation) -> Self {
        Expr { kind, location }
    }

    pub fn number(value: f64) -> Self {
        Expr::new(ExprKind::Number(value), TextLocation::default())
    }

    pub fn variable(name: &str) -> Self {
        Expr::new(ExprKind::Variable(name.to_owned()), TextLocation::default())
    }

    pub fn binary(operator: char, lhs: Expr, rhs: Expr) -> Self {
        Expr::new(
            ExprKind::Binary {
                operator,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            TextLocation::default(),
        )
    }

    pub fn call(callee: &str, arguments: Vec<Expr>) -> Self {
        Expr::new(
            ExprKind::Call {
                callee: callee.to_owned(),
                arguments,
            },
            TextLocation::default(),
        )
    }

    pub fn for_loop(var_name: &str, start: Expr, end: Expr, step: Option<Expr>, body: Expr) -> Self {
        Expr::new(
            ExprKind::For {
                var_name: var_name.to_owned(),
                start: Box::new(start),
                end: Box::new(end),
                step: step.map(Box::new),
                body: Box::new(body),
            },
            TextLocation::default(),
        )
    }
}

/// The name and parameters of a function, either defined in the language or provided by the host
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub parameters: Vec<String>,
    pub location: TextLocation,
}

impl Prototype {
    pub fn new(name: &str, parameters: &[&str]) -> Self {
        Prototype {
            name: name.to_owned(),
            parameters: parameters.iter().map(|param| param.to_string()).collect(),
            location: TextLocation::default(),
        }
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub prototype: Prototype,
    pub body: Expr,
}

/// One statement of input
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    Definition(FunctionDef),
    Extern(Prototype),

    // Evaluated immediately through an anonymous wrapper function
    Expression(Expr),
}

impl TopLevel {
    pub fn location(&self) -> TextLocation {
        match self {
            TopLevel::Definition(def) => def.prototype.location,
            TopLevel::Extern(prototype) => prototype.location,
            TopLevel::Expression(expr) => expr.location,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(value) => write!(f, "{value}"),
            ExprKind::Variable(name) => write!(f, "{name}"),
            ExprKind::Binary { operator, lhs, rhs } => write!(f, "({lhs} {operator} {rhs})"),
            ExprKind::Call { callee, arguments } => {
                write!(f, "{callee}(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            }
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => write!(f, "(if {condition} then {then_branch} else {else_branch})"),
            ExprKind::For {
                var_name,
                start,
                end,
                step,
                body,
            } => {
                write!(f, "(for {var_name} = {start}, {end}")?;
                if let Some(step) = step {
                    write!(f, ", {step}")?;
                }
                write!(f, " in {body})")
            }
            ExprKind::VarIn { bindings, body } => {
                write!(f, "(var ")?;
                for (i, binding) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", binding.name)?;
                    if let Some(initializer) = &binding.initializer {
                        write!(f, " = {initializer}")?;
                    }
                }
                write!(f, " in {body})")
            }
        }
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.parameters.join(" "))
    }
}

impl fmt::Display for TopLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopLevel::Definition(def) => write!(f, "def {} {}", def.prototype, def.body),
            TopLevel::Extern(prototype) => write!(f, "extern {prototype}"),
            TopLevel::Expression(expr) => write!(f, "{expr}"),
        }
    }
}
