mod name_pattern;
mod name_regex;
mod session_token;
mod vcenter_server;

pub use name_pattern::{DEFAULT_NAME_PATTERN, NamePattern};
pub use name_regex::NameRegex;
pub use session_token::SessionToken;
pub use vcenter_server::VcenterServer;

pub(crate) use vcenter_server::validate_vcenter_server;
