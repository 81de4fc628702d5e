use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorMetaDataKey, ErrorType};
use saying::say;

/// Prints an error along with the offending line when the source text is available
pub fn print_formatted_error(e: &CompilerError, source_code: Option<&str>) {
    let line_number = e.location.start_pos.line_number.max(0) as usize;

    let line = source_code
        .and_then(|source| source.lines().nth(line_number))
        .unwrap_or_default()
        .to_string();

    match e.error_type {
        ErrorType::Syntax => {
            say!("\n(╯°□°)╯  🔥🔥 ", Red "Syntax", " 🔥🔥  Σ(°△°;) ");
            say!(Dark Magenta "Line ", Bright {line_number + 1});
        }

        ErrorType::UnknownIdentifier
        | ErrorType::InvalidAssignmentTarget
        | ErrorType::UnknownOperator => {
            say!("\n(ಠ_ಠ) ", Red { error_label(e) });
            say!(Dark Magenta "Line ", Bright {line_number + 1});
        }

        ErrorType::UnknownFunction
        | ErrorType::ArityUnknown
        | ErrorType::ArityMismatch
        | ErrorType::FunctionRedefinition => {
            say!("\nヽ(˶°o°)ﾉ  🔥🔥🔥 ", Red { error_label(e) }, " 🔥🔥🔥  ╰(°□°╰) ");
            say!(Dark Magenta "Line ", Bright {line_number + 1});
        }

        ErrorType::Link | ErrorType::Lookup => {
            say!("\n(ﾉ☉_⚆)ﾉ  🔥 ", Yellow { error_label(e) }, " 🔥 ╰(° O °)╯ ");
            say!(Red e.msg);
            return;
        }

        ErrorType::Runtime => {
            say!("\n(╯°Д°)╯  🔥🔥 ", Red "Runtime", " 🔥🔥  ╰(°□°╰) ");
            say!(Red e.msg);
            return;
        }

        ErrorType::File => {
            say!(Yellow "🏚 Can't find/read file or directory: ", e.msg);
            return;
        }

        ErrorType::Config => {
            say!(Yellow "CONFIG FILE ISSUE- ");
            say!(Dark Yellow e.msg);
            return;
        }

        ErrorType::Compiler => {
            say!("\nヽ༼☉ ‿ ⚆༽ﾉ  🔥🔥🔥🔥 ", Yellow "COMPILER BUG - ");
            say!(Dark Yellow "compiler developer skill issue (not your fault)");
        }
    }

    say!(Red e.msg);

    if let Some(suggestion) = e.metadata_value(ErrorMetaDataKey::PrimarySuggestion) {
        say!(Green "Suggestion: ", suggestion);
    }

    if line.is_empty() {
        return;
    }

    println!("\n{line}");

    // spaces before the relevant part of the line
    print!("{}", " ".repeat(e.location.start_pos.char_column.max(0) as usize));

    let length_of_underline =
        (e.location.end_pos.char_column - e.location.start_pos.char_column).max(1) as usize;
    say!(Red { "^".repeat(length_of_underline) });
}

fn error_label(e: &CompilerError) -> &'static str {
    crate::compiler_frontend::compiler_errors::error_type_to_str(&e.error_type)
}
