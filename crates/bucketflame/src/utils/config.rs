//! Configuration and constants for the library and CLI.

use std::time::Duration;

/// Default timeout for HTTP requests (profile fetch, symbol server)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Current summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Name of the synthetic category used when no rule matches
pub const CATCH_ALL_CATEGORY: &str = "*";

/// Bucket names are `category:detail`; the category ends at the first separator
pub const CATEGORY_SEPARATOR: char = ':';

/// Public Mozilla symbolication endpoint
pub const DEFAULT_SYMBOL_SERVER: &str = "https://symbolication.services.mozilla.com";

/// Default location of the summary JSON
pub const DEFAULT_SUMMARY_PATH: &str = "artifacts/summary.json";

/// Environment variable holding a rule table path
pub const RULES_ENV_VAR: &str = "BUCKETFLAME_RULES";

/// Environment variable holding a symbol server URL
pub const SYMBOL_SERVER_ENV_VAR: &str = "BUCKETFLAME_SYMBOL_SERVER";

// Field names for the string table (older processed profiles use `stringTable`)
pub const STRING_TABLE_FIELD_NAMES: &[&str] = &["stringArray", "stringTable"];
