use rusqlite::Connection;
use std::io::{self, Write};

use crate::catalog::FileCatalog;
use crate::config::AppConfig;
use crate::model::{Contact, Id};
use crate::ops::{contact_ops, Outcome};
use crate::xml::XmlContactStore;

pub struct CLIContext {
    pub conn: Connection,
    pub config: AppConfig,
    pub xml_store: XmlContactStore,
    pub catalog: FileCatalog,
}

impl CLIContext {
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        let xml_store = XmlContactStore::new(config.primary_xml_path());
        let catalog = FileCatalog::from_config(&config);
        Self {
            conn,
            config,
            xml_store,
            catalog,
        }
    }

    /// Prompt and read a line from stdin. Returns None on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }

    /// Read a line, trimmed.
    pub fn prompt(&self, prompt: &str) -> Option<String> {
        self.read_line(prompt).map(|s| s.trim().to_string())
    }

    /// Prompt showing the current value; Enter keeps it.
    pub fn prompt_with_default(&self, label: &str, current: &str) -> Option<String> {
        let input = self.prompt(&format!("{} [{}]: ", label, current))?;
        Some(if input.is_empty() {
            current.to_string()
        } else {
            input
        })
    }

    pub fn confirm(&self, question: &str) -> bool {
        matches!(
            self.prompt(&format!("{} (y/N): ", question)).as_deref(),
            Some("y") | Some("Y") | Some("yes")
        )
    }

    /// Look up a contact by the id typed on the command line.
    pub fn find_contact(&self, args: &str) -> Option<Contact> {
        let id: Id<Contact> = match args.trim().parse() {
            Ok(id) => id,
            Err(_) => {
                println!("Please give a numeric contact id.");
                return None;
            }
        };
        match contact_ops::find_contact(&self.conn, id) {
            Ok(c) => Some(c),
            Err(e) => {
                println!("{}", e);
                None
            }
        }
    }

    pub fn print_outcome(&self, outcome: &Outcome) {
        if outcome.success {
            println!("{}", outcome.message);
        } else {
            println!("Error: {}", outcome.message);
        }
    }

    pub fn format_size(bytes: u64) -> String {
        match bytes {
            n if n < 1024 => format!("{} B", n),
            n if n < 1024 * 1024 => format!("{:.1} KB", n as f64 / 1024.0),
            n => format!("{:.1} MB", n as f64 / (1024.0 * 1024.0)),
        }
    }
}
