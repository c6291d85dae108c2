pub mod find;
pub mod find_checksum;
pub mod get;
pub mod publish;
pub mod purge;
pub mod send;

/// Exit code for "scan finished, nothing matched".
pub const EXIT_NO_MATCH: i32 = 2;
