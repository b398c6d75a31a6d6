//! Typed parameters for the EastMoney fund-flow ranking endpoints.

use std::fmt;
use std::str::FromStr;

/// Ranking window for fund-flow queries. The wire literals are the Chinese
/// labels the provider's own frontend sends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FundFlowIndicator {
    /// 今日 — today's session. This is the default.
    #[default]
    Today,
    /// 3日
    ThreeDay,
    /// 5日
    FiveDay,
    /// 10日
    TenDay,
}

impl FundFlowIndicator {
    /// Field code of the net main-force inflow amount for this window,
    /// also used as the ranking sort key.
    pub fn amount_fid(&self) -> &'static str {
        match self {
            FundFlowIndicator::Today => "f62",
            FundFlowIndicator::ThreeDay => "f267",
            FundFlowIndicator::FiveDay => "f164",
            FundFlowIndicator::TenDay => "f174",
        }
    }

    /// Field code of the matching net-inflow percentage.
    pub fn percent_fid(&self) -> &'static str {
        match self {
            FundFlowIndicator::Today => "f184",
            FundFlowIndicator::ThreeDay => "f268",
            FundFlowIndicator::FiveDay => "f165",
            FundFlowIndicator::TenDay => "f175",
        }
    }
}

impl FromStr for FundFlowIndicator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "今日" => Ok(FundFlowIndicator::Today),
            "3日" => Ok(FundFlowIndicator::ThreeDay),
            "5日" => Ok(FundFlowIndicator::FiveDay),
            "10日" => Ok(FundFlowIndicator::TenDay),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FundFlowIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FundFlowIndicator::Today => "今日",
            FundFlowIndicator::ThreeDay => "3日",
            FundFlowIndicator::FiveDay => "5日",
            FundFlowIndicator::TenDay => "10日",
        };
        write!(f, "{}", s)
    }
}

/// Which sector universe a sector fund-flow ranking covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SectorType {
    /// 概念资金流 — concept boards. This is the default.
    #[default]
    Concept,
    /// 行业资金流 — industry boards.
    Industry,
    /// 地域资金流 — regional boards.
    Region,
}

impl SectorType {
    /// Market-filter expression selecting this universe.
    pub fn fs(&self) -> &'static str {
        match self {
            SectorType::Concept => "m:90+t:3",
            SectorType::Industry => "m:90+t:2",
            SectorType::Region => "m:90+t:1",
        }
    }
}

impl FromStr for SectorType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "概念资金流" => Ok(SectorType::Concept),
            "行业资金流" => Ok(SectorType::Industry),
            "地域资金流" => Ok(SectorType::Region),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SectorType::Concept => "概念资金流",
            SectorType::Industry => "行业资金流",
            SectorType::Region => "地域资金流",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_literals_round_trip() {
        for s in ["今日", "3日", "5日", "10日"] {
            let ind: FundFlowIndicator = s.parse().unwrap();
            assert_eq!(ind.to_string(), s);
        }
        assert!("昨日".parse::<FundFlowIndicator>().is_err());
    }

    #[test]
    fn indicator_field_codes() {
        assert_eq!(FundFlowIndicator::Today.amount_fid(), "f62");
        assert_eq!(FundFlowIndicator::TenDay.percent_fid(), "f175");
    }

    #[test]
    fn sector_type_filters() {
        assert_eq!(SectorType::Concept.fs(), "m:90+t:3");
        assert_eq!("行业资金流".parse::<SectorType>(), Ok(SectorType::Industry));
    }
}
