use std::path::{Path, PathBuf};

use crate::cli::context::CLIContext;
use crate::model::PartialContact;
use crate::ops::file_ops;

pub fn upload(ctx: &CLIContext, args: &str) {
    let path = if !args.is_empty() {
        args.to_string()
    } else {
        match ctx.prompt("Path to XML file: ") {
            Some(s) if !s.is_empty() => s,
            _ => return,
        }
    };

    let path = Path::new(&path);
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            println!("Error: cannot read {}: {}", path.display(), e);
            return;
        }
    };
    let original_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let outcome = file_ops::upload_xml(&ctx.catalog, &original_name, &bytes);
    ctx.print_outcome(&outcome);
}

pub fn list(ctx: &CLIContext) {
    let files = file_ops::list_files(&ctx.catalog);
    if files.is_empty() {
        println!("No XML files yet. Use 'upload' to add one.");
        return;
    }

    println!("XML files in {} ({}):", ctx.catalog.dir().display(), files.len());
    for listing in &files {
        let info = &listing.info;
        let status = if info.is_valid { "valid" } else { "INVALID" };
        println!();
        println!(
            "  {} ({}, {}) - {} contact(s)",
            info.filename,
            CLIContext::format_size(info.size_bytes),
            status,
            listing.contacts_count()
        );
        print_partial_contacts(&listing.contacts);
    }
}

pub fn view(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: view-file <filename>");
        return;
    }
    match file_ops::view_file(&ctx.catalog, args) {
        Ok(contacts) if contacts.is_empty() => println!("{} holds no contacts.", args),
        Ok(contacts) => {
            println!("Contacts in {} ({}):", args, contacts.len());
            print_partial_contacts(&contacts);
        }
        Err(outcome) => ctx.print_outcome(&outcome),
    }
}

/// `download <filename> [dest]` copies a catalog file out, by default into
/// the current directory.
pub fn download(ctx: &CLIContext, args: &str) {
    let mut parts = args.splitn(2, char::is_whitespace);
    let filename = parts.next().unwrap_or("").trim();
    if filename.is_empty() {
        println!("Usage: download <filename> [destination]");
        return;
    }

    let file = match file_ops::download_file(&ctx.catalog, filename) {
        Ok(f) => f,
        Err(outcome) => {
            ctx.print_outcome(&outcome);
            return;
        }
    };

    let dest = match parts.next().map(str::trim).filter(|s| !s.is_empty()) {
        Some(d) if Path::new(d).is_dir() => Path::new(d).join(&file.filename),
        Some(d) => PathBuf::from(d),
        None => PathBuf::from(&file.filename),
    };

    match std::fs::write(&dest, &file.bytes) {
        Ok(()) => println!(
            "Saved {} ({}, {}) to {}",
            file.filename,
            file.content_type,
            CLIContext::format_size(file.bytes.len() as u64),
            dest.display()
        ),
        Err(e) => println!("Error: cannot write {}: {}", dest.display(), e),
    }
}

fn print_partial_contacts(contacts: &[PartialContact]) {
    for c in contacts {
        let show = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).unwrap_or("-").to_string();
        println!(
            "    {} | {} | {} | {}",
            show(&c.name),
            show(&c.phone),
            show(&c.email),
            show(&c.address)
        );
    }
}
