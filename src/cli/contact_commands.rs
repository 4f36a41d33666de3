use crate::cli::context::CLIContext;
use crate::model::*;
use crate::ops::contact_ops;
use crate::queries::contact_queries::{self, ContactListing};

pub fn add(ctx: &CLIContext, args: &str) {
    println!("Adding a new contact (address is optional)");
    println!();

    let name = if !args.is_empty() {
        args.to_string()
    } else {
        match ctx.prompt("Full name: ") {
            Some(s) => s,
            None => return,
        }
    };
    let Some(phone) = ctx.prompt("Phone: ") else { return };
    let Some(email) = ctx.prompt("Email: ") else { return };
    let Some(address) = ctx.prompt("Address: ") else { return };
    let Some(target) = ctx.prompt("Save to (db/xml) [db]: ") else { return };

    let save_to = if target.is_empty() {
        SaveTarget::Db
    } else {
        match SaveTarget::parse(&target) {
            Some(t) => t,
            None => {
                println!("Unknown target '{}'. Use 'db' or 'xml'.", target);
                return;
            }
        }
    };

    let form = ContactForm {
        name,
        phone,
        email,
        address: Some(address),
        save_to,
    };
    let outcome = contact_ops::submit(&ctx.conn, &ctx.xml_store, &form);
    ctx.print_outcome(&outcome);
}

pub fn list(ctx: &CLIContext, args: &str) {
    let source = if args.is_empty() {
        DataSource::Db
    } else {
        match DataSource::parse(args) {
            Some(s) => s,
            None => {
                println!("Unknown source '{}'. Use 'db' or 'xml'.", args);
                return;
            }
        }
    };

    let listing = contact_queries::list_for_source(&ctx.conn, &ctx.xml_store, source);
    if listing.is_empty() {
        println!("No contacts yet. Use 'add' to create one.");
        return;
    }

    match listing {
        ContactListing::Db(contacts) => {
            println!("Contacts in the database ({}):", contacts.len());
            println!();
            print_contacts(&contacts);
        }
        ContactListing::Xml(contacts) => {
            println!("Contacts in the XML file ({}):", contacts.len());
            println!();
            for c in &contacts {
                println!("  {} | {} | {}{}", c.name, c.phone, c.email, address_suffix(&c.address));
            }
        }
    }
}

pub fn search(ctx: &CLIContext, args: &str) {
    match contact_queries::search(&ctx.conn, args) {
        Ok(contacts) if contacts.is_empty() => println!("No contacts match '{}'", args),
        Ok(contacts) => {
            println!("Found {} contact(s):", contacts.len());
            print_contacts(&contacts);
        }
        Err(e) => println!("Error: {}", e),
    }
}

pub fn search_json(ctx: &CLIContext, args: &str) {
    match contact_queries::search_json(&ctx.conn, args)
        .and_then(|v| Ok(serde_json::to_string_pretty(&v)?))
    {
        Ok(json) => println!("{}", json),
        Err(e) => println!("Error: {}", e),
    }
}

pub fn edit(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else { return };
    println!("Editing contact {} (press Enter to keep a value, '-' to clear the address)", contact.id);

    let Some(name) = ctx.prompt_with_default("Full name", &contact.name) else { return };
    let Some(phone) = ctx.prompt_with_default("Phone", &contact.phone) else { return };
    let Some(email) = ctx.prompt_with_default("Email", &contact.email) else { return };
    let current_address = contact.address.clone().unwrap_or_default();
    let Some(address) = ctx.prompt_with_default("Address", &current_address) else { return };
    let address = if address == "-" { String::new() } else { address };

    let outcome = contact_ops::edit(&ctx.conn, contact.id, &name, &phone, &email, Some(&address));
    ctx.print_outcome(&outcome);
}

pub fn delete(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else { return };
    if !ctx.confirm(&format!("Delete {} <{}>?", contact.name, contact.email)) {
        println!("Cancelled.");
        return;
    }
    let outcome = contact_ops::remove(&ctx.conn, contact.id);
    ctx.print_outcome(&outcome);
}

fn print_contacts(contacts: &[Contact]) {
    for c in contacts {
        println!(
            "  #{} {} | {} | {}{} (added {})",
            c.id,
            c.name,
            c.phone,
            c.email,
            address_suffix(c.address.as_deref().unwrap_or("")),
            c.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn address_suffix(address: &str) -> String {
    if address.is_empty() {
        String::new()
    } else {
        format!(" | {}", address)
    }
}
