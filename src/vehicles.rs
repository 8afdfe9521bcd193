use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RunError;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    pub year: Year,
    pub color: String,
    pub plate: String,
    pub vin: String,
}

impl Vehicle {
    pub fn name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ({})", self.make, self.model, self.plate)
    }
}

/// Catalogs in the wild carry the year both as a number and as text.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(untagged)]
pub enum Year {
    Number(u32),
    Text(String),
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Year::Number(year) => write!(f, "{}", year),
            Year::Text(year) => write!(f, "{}", year),
        }
    }
}

/// Vehicles in catalog order; a missing catalog is an empty one.
pub fn load(path: &Path) -> Result<Vec<Vehicle>, RunError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
