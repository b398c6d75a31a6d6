mod fund_flow;
pub use self::fund_flow::{FundFlowIndicator, SectorType};

mod market;
pub use self::market::{Market, MinutePeriod};
