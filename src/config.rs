//! City configuration: the read-only mapping from city to source CSV file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::DataError;

/// One of the three cities with published trip data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYork,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYork, City::Washington];

    pub fn name(&self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYork => "New York",
            City::Washington => "Washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        City::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DataError::UnknownCity {
                city: s.to_string(),
            })
    }
}

/// Read-only table mapping each city to its source CSV, rooted at a data
/// directory. Passed into the loader explicitly rather than living in
/// module state.
#[derive(Debug, Clone)]
pub struct CityData {
    data_dir: PathBuf,
}

impl CityData {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        CityData {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn file_name(city: City) -> &'static str {
        match city {
            City::Chicago => "chicago.csv",
            City::NewYork => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Full path of the source CSV for a city.
    pub fn path(&self, city: City) -> PathBuf {
        self.data_dir.join(Self::file_name(city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_from_str_case_insensitive() {
        assert_eq!("chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!("NEW YORK".parse::<City>().unwrap(), City::NewYork);
        assert_eq!(" Washington ".parse::<City>().unwrap(), City::Washington);
    }

    #[test]
    fn test_city_from_str_rejects_unknown() {
        assert!("Boston".parse::<City>().is_err());
        assert!("".parse::<City>().is_err());
    }

    #[test]
    fn test_path_joins_data_dir_and_file_name() {
        let config = CityData::new("data");
        assert_eq!(
            config.path(City::NewYork),
            PathBuf::from("data/new_york_city.csv")
        );
    }
}
