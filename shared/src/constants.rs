/// Label prefixes used in the QR payload, one per line.
pub const NAME_LABEL: &str = "Name:";
pub const BRANCH_LABEL: &str = "Branch/Division:";
pub const ROLL_NUMBER_LABEL: &str = "Roll Number:";

/// Text layout of every persisted or exported timestamp (local time, seconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
