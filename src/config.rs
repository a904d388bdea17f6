use clap::Parser;

/// The default upload path for the `fs` document storage.
const DEFAULT_UPLOAD_PATH: &str = "upload";
/// The default address to listen on.
const DEFAULT_ADDRESS: &str = "0.0.0.0:5000";
/// The default maximum request body size for uploads, in bytes.
const DEFAULT_UPLOAD_LIMIT: usize = 50_000_000;

#[derive(Debug, Parser)]
#[command(name = "pdfshelf", version = "0.1", about = "Serve a catalog of PDF documents", long_about = None)]
pub struct StartArgs {
    /// Database URL.
    #[arg(short, long)]
    db_url: Option<String>,

    /// RUST_LOG string to use as the env filter.
    #[arg(short, long)]
    log: Option<String>,

    /// Storage root for uploaded documents.
    #[arg(short, long)]
    upload_path: Option<String>,

    /// Address to listen on.
    #[arg(short, long)]
    address: Option<String>,

    /// CORS allowed origins.
    #[arg(long)]
    cors_allowed_origins: Option<String>,

    /// Maximum upload request size in bytes.
    #[arg(long)]
    upload_limit: Option<usize>,
}

/// Implement a getter method on [StartArgs], using the `$var` environment variable as a fallback
/// and either panic or default if neither the argument nor the environment variable is set.
macro_rules! arg {
    ($id:ident, $var:literal, panic $msg:literal) => {
        impl StartArgs {
            pub fn $id(&self) -> String {
                match &self.$id {
                    Some(val) => val.to_string(),
                    None => match std::env::var($var) {
                        Ok(val) => val,
                        Err(_) => panic!($msg),
                    },
                }
            }
        }
    };
    ($id:ident, $var:literal, default $value:expr) => {
        impl StartArgs {
            pub fn $id(&self) -> String {
                match &self.$id {
                    Some(val) => val.to_string(),
                    None => match std::env::var($var) {
                        Ok(val) => val,
                        Err(_) => $value,
                    },
                }
            }
        }
    };
}

impl StartArgs {
    /// Origins allowed by CORS. Empty means any origin is allowed.
    pub fn allowed_origins(&self) -> Vec<String> {
        let origins = match &self.cors_allowed_origins {
            Some(origins) => origins.clone(),
            None => std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        };

        origins
            .split(',')
            .filter_map(|o| (!o.is_empty()).then_some(String::from(o)))
            .collect()
    }

    pub fn upload_limit(&self) -> usize {
        match self.upload_limit {
            Some(limit) => limit,
            None => match std::env::var("UPLOAD_LIMIT") {
                Ok(limit) => limit
                    .parse()
                    .expect("UPLOAD_LIMIT must be a number of bytes"),
                Err(_) => DEFAULT_UPLOAD_LIMIT,
            },
        }
    }
}

arg!(db_url,          "DATABASE_URL",    panic   "Database url not found; Pass --db-url or set DATABASE_URL");
arg!(log,             "RUST_LOG",        default "info".to_string());
arg!(upload_path,     "UPLOAD_PATH",     default DEFAULT_UPLOAD_PATH.to_string());
arg!(address,         "ADDRESS",         default DEFAULT_ADDRESS.to_string());

#[cfg(test)]
mod tests {
    use super::StartArgs;
    use clap::Parser;

    #[test]
    fn arguments_take_precedence() {
        let args = StartArgs::parse_from([
            "pdfshelf",
            "--upload-path",
            "books",
            "--address",
            "127.0.0.1:8080",
            "--cors-allowed-origins",
            "http://a.com,,http://b.com",
            "--upload-limit",
            "1024",
        ]);

        assert_eq!("books", args.upload_path());
        assert_eq!("127.0.0.1:8080", args.address());
        assert_eq!(vec!["http://a.com", "http://b.com"], args.allowed_origins());
        assert_eq!(1024, args.upload_limit());
    }
}
