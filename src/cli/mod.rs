pub mod context;
pub mod contact_commands;
pub mod file_commands;

use crate::config::AppConfig;
use crate::db::schema;
use context::CLIContext;

/// Run the interactive REPL.
pub fn run(config: AppConfig) {
    println!("Contacts");
    println!("Type 'help' for commands, 'exit' to quit.");
    println!();

    let conn = match schema::open(&config.db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            return;
        }
    };

    let ctx = CLIContext::new(conn, config);
    if let Err(e) = ctx.catalog.ensure_dir() {
        eprintln!(
            "Error creating {}: {}",
            ctx.catalog.dir().display(),
            e
        );
        return;
    }

    repl_loop(&ctx);
}

fn repl_loop(ctx: &CLIContext) {
    loop {
        let input = match ctx.read_line("> ") {
            Some(s) => s,
            None => break,
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, args) = parse_command(input);

        match command {
            "help" | "?" => print_help(ctx),
            "quit" | "exit" | "q" => break,

            // Contacts
            "add" | "new" => contact_commands::add(ctx, args),
            "list" | "ls" => contact_commands::list(ctx, args),
            "search" | "find" => contact_commands::search(ctx, args),
            "search-json" => contact_commands::search_json(ctx, args),
            "edit" => contact_commands::edit(ctx, args),
            "delete" | "rm" => contact_commands::delete(ctx, args),

            // XML files
            "upload" => file_commands::upload(ctx, args),
            "files" => file_commands::list(ctx),
            "view-file" => file_commands::view(ctx, args),
            "download" => file_commands::download(ctx, args),

            _ => println!("Unknown command: {}. Type 'help' for commands.", command),
        }
    }
}

/// Split input into the command word and the rest of the line.
fn parse_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(|c: char| c == ' ' || c == '\t') {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

fn print_help(ctx: &CLIContext) {
    println!(r#"
COMMANDS:

  Contacts:
    add [name]              Add a contact (choose database or XML file)
    list [db|xml]           List contacts from the database (default) or XML file
    search <query>          Search database contacts by name, phone, email or address
    search-json <query>     Same search, printed as JSON
    edit <id>               Edit a database contact
    delete <id>             Delete a database contact

  XML files:
    upload <path>           Upload an XML file into the catalog
    files                   List XML files and their contacts
    view-file <filename>    Show contacts in one XML file
    download <filename> [dest]
                            Copy an XML file out of the catalog

  Other:
    help                    Show this help
    exit / quit / q         Exit

TIPS:
  - XML records cannot be edited or deleted; only database contacts can
  - The same name, phone and email can only be saved once to the database"#);
    println!();
    println!("{}", storage_summary(&ctx.config));
}

/// Where data lives and how large uploads may be, as configured.
fn storage_summary(config: &AppConfig) -> String {
    format!(
        "STORAGE:\n  Database:     {}\n  XML files:    {}\n  Upload limit: {}",
        config.db_path.display(),
        config.contacts_dir().display(),
        CLIContext::format_size(config.max_upload_bytes)
    )
}
