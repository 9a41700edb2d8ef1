//! Purpose: Search criteria sent as the `searchedValues` json and the registry's well-known ids.
//! Exports: `SearchCriteria`, `Untergliederung`, `Taetigkeit`.
//! Role: Typed helpers over a free-form criteria object; any registry filter key is allowed.
//! Invariants: The default criteria select active members of type MITGLIED.
//! Invariants: Empty criteria are replaced by the default ones at search time.
use serde_json::{Map, Value};

/// Age-group (`untergliederungId`) identifiers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Untergliederung {
    Woelfling,
    Jungpfadfinder,
    Pfadfinder,
    Rover,
    Stavo,
}

impl Untergliederung {
    pub fn id(self) -> u32 {
        match self {
            Untergliederung::Woelfling => 1,
            Untergliederung::Jungpfadfinder => 2,
            Untergliederung::Pfadfinder => 3,
            Untergliederung::Rover => 4,
            Untergliederung::Stavo => 5,
        }
    }
}

/// Activity (`taetigkeitId`) identifiers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Taetigkeit {
    Leiter,
    Kurat,
}

impl Taetigkeit {
    pub fn id(self) -> u32 {
        match self {
            Taetigkeit::Leiter => 6,
            Taetigkeit::Kurat => 1011,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchCriteria {
    values: Map<String, Value>,
}

impl SearchCriteria {
    /// Criteria with no filters; searching with them falls back to `active_members`.
    pub fn new() -> Self {
        Self { values: Map::new() }
    }

    pub fn active_members() -> Self {
        Self::new()
            .with("mglStatusId", "AKTIV")
            .with("mglTypeId", "MITGLIED")
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn untergliederung(self, untergliederung: Untergliederung) -> Self {
        self.with("untergliederungId", untergliederung.id())
    }

    pub fn taetigkeit(self, taetigkeit: Taetigkeit) -> Self {
        self.with("taetigkeitId", taetigkeit.id())
    }

    pub fn nachname(self, nachname: impl Into<String>) -> Self {
        self.with("nachname", nachname.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub(crate) fn effective(&self) -> SearchCriteria {
        if self.is_empty() {
            Self::active_members()
        } else {
            self.clone()
        }
    }

    pub(crate) fn to_query_value(&self) -> String {
        Value::Object(self.values.clone()).to_string()
    }
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self::active_members()
    }
}

impl From<Map<String, Value>> for SearchCriteria {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}
