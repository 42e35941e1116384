// Season summary builder: turns MoneyPuck's raw skater summary into the
// normalized per-season stats files the dashboard reads.

pub mod export;
pub mod raw;
pub mod rates;
pub mod refresh;
pub mod summary;
pub mod zscore;
