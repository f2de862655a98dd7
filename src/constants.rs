/// Package name.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
/// Default configuration file name.
pub const CONFIG_NAME: &str = "config.yaml";
/// Global exclude list file name.
pub const GLOBAL_EXCLUDE_NAME: &str = "global_exclude.txt";
/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "SENDREPO_CONFIG";
/// Environment variable overriding the global exclude file location.
pub const GLOBAL_EXCLUDE_ENV: &str = "SENDREPO_EXCLUDE";
/// Default ssh port used when a project does not set one.
pub const DEFAULT_PORT: u16 = 22;
/// Format of the `{timestamp}` template variable.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
/// The transfer tool.
pub const TRANSFER_PROGRAM: &str = "rsync";
