use serde::Serialize;

/// Output the comprehensive schemaview reference document.
pub fn run(json: bool) {
    let reference = build_reference();
    if json {
        print_json(&reference);
    } else {
        print_markdown(&reference);
    }
}

// ── Reference data ────────────────────────────────────────────────────

#[derive(Serialize)]
struct CommandInfo {
    description: &'static str,
    name: &'static str,
    usage: &'static str,
}

#[derive(Serialize)]
struct ExitCodeInfo {
    code: u8,
    meaning: &'static str,
}

#[derive(Serialize)]
struct Reference {
    commands: Vec<CommandInfo>,
    config_keys: Vec<&'static str>,
    exit_codes: Vec<ExitCodeInfo>,
    ref_forms: Vec<&'static str>,
    version: &'static str,
}

fn build_reference() -> Reference {
    Reference {
        commands: vec![
            CommandInfo {
                description: "Verify every $ref in a schema or directory resolves",
                name: "check",
                usage: "schemaview check <schema-or-dir>",
            },
            CommandInfo {
                description: "Print a synthesized example value as JSON",
                name: "example",
                usage: "schemaview example <schema> [pointer]",
            },
            CommandInfo {
                description: "List every $ref with its form and resolution status",
                name: "refs",
                usage: "schemaview refs <schema>",
            },
            CommandInfo {
                description: "Export a standalone HTML view",
                name: "render",
                usage: "schemaview render <schema> -o <out.html>",
            },
            CommandInfo {
                description: "Render the schema tree in the terminal",
                name: "view",
                usage: "schemaview view <schema> [--depth N] [--lines] [--no-descriptions]",
            },
            CommandInfo {
                description: "Re-render on filesystem changes",
                name: "watch",
                usage: "schemaview watch <schema>",
            },
        ],
        config_keys: vec!["view.max_depth", "view.show_descriptions"],
        exit_codes: vec![
            ExitCodeInfo { code: 0, meaning: "all references resolved" },
            ExitCodeInfo { code: 1, meaning: "unresolved refs (target file loaded, fragment missing)" },
            ExitCodeInfo { code: 2, meaning: "missing files (unreadable or invalid JSON)" },
        ],
        ref_forms: vec![
            "#/<seg>/<seg>           local fragment, walked from the document root",
            "<file>.json             whole-file reference, relative to the referencing file",
            "<file>.json#/<seg>/...  fragment inside another file",
        ],
        version: env!("CARGO_PKG_VERSION"),
    }
}

// ── Output ────────────────────────────────────────────────────────────

fn print_json(reference: &Reference) {
    println!("{}", serde_json::to_string_pretty(reference).unwrap_or_default());
}

fn print_markdown(reference: &Reference) {
    println!("# schemaview {}", reference.version);
    println!();
    println!("Multi-file JSON Schema viewer: loads a root document and every file");
    println!("reachable through cross-file $ref values, then renders the result.");
    println!();

    println!("## Commands");
    println!();
    for command in &reference.commands {
        println!("- `{}` — {}", command.usage, command.description);
    }
    println!();

    println!("## Recognized $ref forms");
    println!();
    for form in &reference.ref_forms {
        println!("    {form}");
    }
    println!();

    println!("## Exit codes (check)");
    println!();
    for exit in &reference.exit_codes {
        println!("- {} — {}", exit.code, exit.meaning);
    }
    println!();

    println!("## Config (`.schemaview.toml`)");
    println!();
    for key in &reference.config_keys {
        println!("- `{key}`");
    }
}
