use xmlcontacts::config::{AppConfig, Invocation};

fn main() {
    let config = match AppConfig::default()
        .with_env(|key| std::env::var(key).ok())
        .and_then(|c| c.with_args(std::env::args().skip(1)))
    {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information.");
            std::process::exit(1);
        }
    };

    if let Err(e) = xmlcontacts::logging::init_logging(&config.log_level) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    xmlcontacts::cli::run(config);
}

fn print_usage() {
    println!("Contacts - save contacts to a database or an XML file");
    println!();
    println!("Usage: xmlcontacts [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>             Database file path (default: .data/contacts.db)");
    println!("  -m, --media-root <DIR>      Media directory (default: .data/media)");
    println!("      --max-upload-bytes <N>  Largest accepted upload (default: 5242880)");
    println!("      --log-level <LEVEL>     trace|debug|info|warn|error|off (default: warn)");
    println!("  -h, --help                  Show this help");
    println!();
    println!("Environment: XMLCONTACTS_DB, XMLCONTACTS_MEDIA_ROOT,");
    println!("             XMLCONTACTS_MAX_UPLOAD_BYTES, XMLCONTACTS_LOG_LEVEL");
}
