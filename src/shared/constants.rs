/// Rows returned by the top spenders report unless the caller asks otherwise
pub const DEFAULT_TOP_SPENDERS_LIMIT: i64 = 10;

/// Hard cap on rows returned by the recent orders report
pub const MAX_RECENT_ORDERS: i64 = 1000;

/// Products with fewer units than this on hand are low stock
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Decimal places kept for prices (`NUMERIC(12,2)`)
pub const PRICE_SCALE: u32 = 2;

/// Prices must stay strictly below this: ten integer digits
pub const PRICE_UPPER_BOUND: i64 = 10_000_000_000;
