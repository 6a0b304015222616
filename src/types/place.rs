use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// Request fragment a check runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Body,
    Params,
    Query,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Body => "body",
            Location::Params => "params",
            Location::Query => "query",
        }
    }
}

/// Validation context reported with every error: the request fragment plus
/// the path of nested fields, rendered as `body.address.geo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Place {
    location: Location,
    path: Vec<String>,
}

impl Place {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            path: Vec::new(),
        }
    }

    pub fn body() -> Self {
        Self::new(Location::Body)
    }

    pub fn params() -> Self {
        Self::new(Location::Params)
    }

    pub fn query() -> Self {
        Self::new(Location::Query)
    }

    pub fn child(&self, field: &str) -> Self {
        let mut path = self.path.clone();
        path.push(field.to_string());
        Self {
            location: self.location,
            path,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Nesting level below the request fragment (0 at the top).
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn is_body_rooted(&self) -> bool {
        self.location == Location::Body
    }

    /// Whitelists apply anywhere under the body and at the top of the query.
    pub fn enforces_whitelist(&self) -> bool {
        match self.location {
            Location::Body => true,
            Location::Query => self.path.is_empty(),
            Location::Params => false,
        }
    }
}

impl Default for Place {
    fn default() -> Self {
        Self::body()
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.location.as_str())?;
        for segment in &self.path {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Place {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split('.');
        let location = match segments.next() {
            Some("body") => Location::Body,
            Some("params") => Location::Params,
            Some("query") => Location::Query,
            _ => return Err(SchemaError::invalid_place(s)),
        };

        let path: Vec<String> = segments.map(str::to_string).collect();
        if path.iter().any(String::is_empty) {
            return Err(SchemaError::invalid_place(s));
        }

        Ok(Self { location, path })
    }
}

impl Serialize for Place {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Place {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
