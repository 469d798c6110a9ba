use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where one exists,
/// how to fix it. Designed to be readable by both humans and LLM agents.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::ParseFailed { file, reason } => format!("\
# Error: Parse Failed

Could not parse `{}` as JSON: {reason}
", file.display()),

        Error::PointerNotFound { file, pointer } => format!("\
# Error: Pointer Not Found

`{pointer}` does not resolve inside `{}`.

## Fix

List the references the document does contain:

    schemaview refs {}
", file.display(), file.display()),

        Error::TomlDe(e) => format!("\
# Error: Invalid Config

`.schemaview.toml` is not valid TOML: {e}
"),

        Error::Watch { reason } => format!("\
# Error: Watch Failed

{reason}
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
    }
}
