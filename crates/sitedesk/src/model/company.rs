use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a company document in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A firm participating in one or more projects (architects, engineers,
/// contractors, owners).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub trade: String,
    pub city: String,
}

/// Closed update document for a company. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub trade: Option<String>,
    pub city: Option<String>,
}

impl CompanyUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.trade.is_none() && self.city.is_none()
    }

    pub(crate) fn apply(self, company: &mut Company) {
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(trade) = self.trade {
            company.trade = trade;
        }
        if let Some(city) = self.city {
            company.city = city;
        }
    }
}
