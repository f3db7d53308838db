use std::fmt;
use std::str::FromStr;

/// The request sub-container a field must be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Body,
    Query,
    /// Path parameters. `"path"` is accepted as an alias when parsing.
    Params,
}

impl Location {
    /// Order in which located schemas are validated.
    pub const ALL: [Location; 3] = [Location::Body, Location::Query, Location::Params];

    pub fn name(self) -> &'static str {
        match self {
            Location::Body => "body",
            Location::Query => "query",
            Location::Params => "params",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "body" => Ok(Location::Body),
            "query" => Ok(Location::Query),
            "params" | "path" => Ok(Location::Params),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_params() {
        assert_eq!("path".parse::<Location>(), Ok(Location::Params));
        assert_eq!("params".parse::<Location>(), Ok(Location::Params));
    }

    #[test]
    fn rejects_unknown() {
        assert_eq!("header".parse::<Location>(), Err("header".to_string()));
    }
}
