use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Eq, Hash, PartialEq, Clone, Copy)]
pub enum ErrorMetaDataKey {
    VariableName,
    FunctionName,
    OperatorSymbol,
    CompilationStage,

    // Arity information for calls and declarations
    ExpectedArity,
    FoundArity,

    // Optional suggestions
    PrimarySuggestion,     // One-line fix or top-level idea
    AlternativeSuggestion, // Secondary alternative
}

#[derive(Debug, Clone)]
pub struct CompilerError {
    pub msg: String,

    // Only statements parsed from text have a meaningful location.
    // Errors raised by the engine use the default location.
    pub location: TextLocation,
    pub error_type: ErrorType,

    // Structured detail so callers (and tests) don't have to pick apart the message
    pub metadata: HashMap<ErrorMetaDataKey, String>,
}

impl CompilerError {
    pub fn new(
        msg: impl Into<String>,
        location: TextLocation,
        error_type: ErrorType,
    ) -> CompilerError {
        CompilerError {
            msg: msg.into(),
            location,
            error_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: ErrorMetaDataKey, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value.into());
        self
    }

    pub fn metadata_value(&self, key: ErrorMetaDataKey) -> Option<&str> {
        self.metadata.get(&key).map(String::as_str)
    }

    /// Create a new syntax error with a clear explanation
    pub fn new_syntax_error(msg: impl Into<String>, location: TextLocation) -> Self {
        CompilerError::new(msg, location, ErrorType::Syntax)
    }

    /// The engine refused to link or compile a unit
    pub fn link_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, TextLocation::default(), ErrorType::Link)
            .with_metadata(ErrorMetaDataKey::CompilationStage, "Finalize")
    }

    /// A symbol could not be found in the engine after a successful link
    pub fn lookup_error(symbol: &str) -> Self {
        CompilerError::new(
            format!("Symbol '{symbol}' is missing from the engine after linking"),
            TextLocation::default(),
            ErrorType::Lookup,
        )
        .with_metadata(ErrorMetaDataKey::FunctionName, symbol)
    }

    /// Executed code trapped or returned something that isn't a number
    pub fn runtime_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, TextLocation::default(), ErrorType::Runtime)
            .with_metadata(ErrorMetaDataKey::CompilationStage, "Execution")
    }

    /// Create a compiler error (internal bug, not user's fault)
    pub fn compiler_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, TextLocation::default(), ErrorType::Compiler)
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, TextLocation::default(), ErrorType::Config)
    }

    pub fn file_error(path: &Path, msg: impl Into<String>) -> Self {
        CompilerError::new(
            format!("{}: {}", path.display(), msg.into()),
            TextLocation::default(),
            ErrorType::File,
        )
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", error_type_to_str(&self.error_type), self.msg)
    }
}

impl std::error::Error for CompilerError {}

/// What went wrong.
/// The lowering variants are the failure values threaded back through every
/// recursive lowering call, the rest come from the engine and the driver.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ErrorType {
    Syntax,

    // Lowering
    UnknownIdentifier,
    InvalidAssignmentTarget,
    UnknownOperator,
    UnknownFunction,
    ArityUnknown,
    ArityMismatch,
    FunctionRedefinition,

    // Engine
    Link,
    Lookup,
    Runtime,

    // Driver
    Config,
    File,
    Compiler,
}

pub fn error_type_to_str(e_type: &ErrorType) -> &'static str {
    match e_type {
        ErrorType::Syntax => "Syntax Error",
        ErrorType::UnknownIdentifier => "Unknown Variable",
        ErrorType::InvalidAssignmentTarget => "Invalid Assignment",
        ErrorType::UnknownOperator => "Unknown Operator",
        ErrorType::UnknownFunction => "Unknown Function",
        ErrorType::ArityUnknown => "Unknown Arity",
        ErrorType::ArityMismatch => "Wrong Number Of Arguments",
        ErrorType::FunctionRedefinition => "Function Redefinition",
        ErrorType::Link => "Link Error",
        ErrorType::Lookup => "Lookup Error",
        ErrorType::Runtime => "Runtime Error",
        ErrorType::Config => "Malformed Config",
        ErrorType::File => "File Error",
        ErrorType::Compiler => "Compiler Bug",
    }
}

/// Returns a new CompilerError for syntax violations.
///
/// Usage:
/// `return_syntax_error!("message", location, {
///     PrimarySuggestion => "Did you forget a ')'?",
/// })`;
#[macro_export]
macro_rules! return_syntax_error {
    ($msg:expr, $loc:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $loc,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Syntax,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $(
                    map.insert(
                        $crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key,
                        String::from($value),
                    );
                )*
                map
            },
        })
    };
    ($msg:expr, $loc:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::new_syntax_error(
            $msg, $loc,
        ))
    };
}

/// Returns a new CompilerError for a failure while lowering a statement.
/// The first argument is the ErrorType variant.
///
/// Usage:
/// `return_codegen_error!(UnknownIdentifier, "Unknown variable name", location, { VariableName => name })`;
#[macro_export]
macro_rules! return_codegen_error {
    ($kind:ident, $msg:expr, $loc:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $loc,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::$kind,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $(
                    map.insert(
                        $crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key,
                        $value.to_string(),
                    );
                )*
                map
            },
        })
    };
    ($kind:ident, $msg:expr, $loc:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::new(
            $msg,
            $loc,
            $crate::compiler_frontend::compiler_errors::ErrorType::$kind,
        ))
    };
}

/// Returns a new CompilerError for internal compiler bugs.
///
/// Compiler errors indicate bugs in the compiler itself, not user code issues.
#[macro_export]
macro_rules! return_compiler_error {
    ($fmt:expr, $($arg:expr),+ $(,)?) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::compiler_error(
            format!($fmt, $($arg),+),
        ));
    }};
    ($msg:expr) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::compiler_error(
            $msg,
        ));
    }};
}
