use std::path::PathBuf;

pub const CONTACTS_DIR_NAME: &str = "contacts_xml";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Runtime settings, passed explicitly to everything that needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub media_root: PathBuf,
    pub max_upload_bytes: u64,
    pub log_level: String,
}

/// What `main` should do after reading the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(AppConfig),
    Help,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data = PathBuf::from(".data");
        Self {
            db_path: data.join("contacts.db"),
            media_root: data.join("media"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: "warn".into(),
        }
    }
}

impl AppConfig {
    /// Directory holding the primary XML document and uploaded files.
    pub fn contacts_dir(&self) -> PathBuf {
        self.media_root.join(CONTACTS_DIR_NAME)
    }

    pub fn primary_xml_path(&self) -> PathBuf {
        self.contacts_dir().join(crate::xml::PRIMARY_FILE_NAME)
    }

    /// Overlay `XMLCONTACTS_*` variables from `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("XMLCONTACTS_DB") {
            self.db_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("XMLCONTACTS_MEDIA_ROOT") {
            self.media_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("XMLCONTACTS_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = parse_size(&v)
                .map_err(|e| format!("XMLCONTACTS_MAX_UPLOAD_BYTES: {}", e))?;
        }
        if let Some(v) = lookup("XMLCONTACTS_LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(self)
    }

    /// Overlay command-line flags.
    pub fn with_args<I>(mut self, args: I) -> Result<Invocation, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" | "-d" => {
                    self.db_path = PathBuf::from(require_value(&arg, args.next())?);
                }
                "--media-root" | "-m" => {
                    self.media_root = PathBuf::from(require_value(&arg, args.next())?);
                }
                "--max-upload-bytes" => {
                    let v = require_value(&arg, args.next())?;
                    self.max_upload_bytes =
                        parse_size(&v).map_err(|e| format!("{}: {}", arg, e))?;
                }
                "--log-level" => {
                    self.log_level = require_value(&arg, args.next())?;
                }
                "--help" | "-h" => return Ok(Invocation::Help),
                other => return Err(format!("Unknown argument: {}", other)),
            }
        }
        Ok(Invocation::Run(self))
    }
}

fn require_value(flag: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{} requires a value", flag))
}

fn parse_size(s: &str) -> Result<u64, String> {
    match s.trim().parse::<u64>() {
        Ok(0) => Err("must be positive".into()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
