//! Market identifiers and bar periods for per-stock queries.

use std::fmt;
use std::str::FromStr;

/// Exchange a stock code trades on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Market {
    Shanghai,
    Shenzhen,
}

impl Market {
    /// Infers the market from the code prefix: `6xxxxx` codes trade in
    /// Shanghai, everything else in Shenzhen.
    pub fn infer(code: &str) -> Market {
        if code.starts_with('6') {
            Market::Shanghai
        } else {
            Market::Shenzhen
        }
    }

    /// Lowercase exchange prefix used in Sina-style symbols (`sh600519`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Market::Shanghai => "sh",
            Market::Shenzhen => "sz",
        }
    }

    /// Numeric market id used in EastMoney `secid` parameters.
    pub fn secid(&self) -> u8 {
        match self {
            Market::Shanghai => 1,
            Market::Shenzhen => 0,
        }
    }
}

impl FromStr for Market {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sh" => Ok(Market::Shanghai),
            "sz" => Ok(Market::Shenzhen),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Minute-bar aggregation period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MinutePeriod {
    #[default]
    One,
    Five,
    Fifteen,
    Thirty,
    Sixty,
}

impl MinutePeriod {
    /// The `scale` parameter value for the kline endpoint.
    pub fn scale(&self) -> &'static str {
        match self {
            MinutePeriod::One => "1",
            MinutePeriod::Five => "5",
            MinutePeriod::Fifteen => "15",
            MinutePeriod::Thirty => "30",
            MinutePeriod::Sixty => "60",
        }
    }
}

impl FromStr for MinutePeriod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(MinutePeriod::One),
            "5" => Ok(MinutePeriod::Five),
            "15" => Ok(MinutePeriod::Fifteen),
            "30" => Ok(MinutePeriod::Thirty),
            "60" => Ok(MinutePeriod::Sixty),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MinutePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scale())
    }
}
