/// Identifiers issued by the remote API are integers.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts (BRL).
pub type Money = rust_decimal::Decimal;
