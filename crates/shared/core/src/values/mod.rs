use rust_decimal::Decimal;

/// Price value - uses Decimal for precision
///
/// Zero is reserved: a zero price on a quote means "no quote available yet".
pub type Price = Decimal;

/// Order volume in whole units
pub type Quantity = u64;

/// Simulation time in ticks
pub type Timestamp = u64;
