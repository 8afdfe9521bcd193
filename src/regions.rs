//! Where a rented vehicle may be driven: the countries beyond the home
//! jurisdiction and the road surfaces allowed.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Always permitted, named first in the contract.
pub const HOME_JURISDICTION: &str = "Kazakhstan";

#[derive(Display, EnumIter, Debug, PartialEq, Clone, Copy)]
pub enum Country {
    Kyrgyzstan,
    Uzbekistan,
    Tajikistan,
}

impl Country {
    /// Label used in the contract text.
    pub fn legal(&self) -> &'static str {
        match self {
            Country::Kyrgyzstan => "Kyrgyzstan",
            Country::Uzbekistan => "Uzbekistan",
            Country::Tajikistan => "Tajikistan",
        }
    }

    /// Label used in the ancillary documents and on the console.
    pub fn local(&self) -> &'static str {
        match self {
            Country::Kyrgyzstan => "Кыргызстан",
            Country::Uzbekistan => "Узбекистан",
            Country::Tajikistan => "Таджикистан",
        }
    }
}

#[derive(Display, EnumIter, Debug, PartialEq, Clone, Copy)]
pub enum RoadType {
    Paved,
    Gravel,
    #[strum(serialize = "Dirt Tracks")]
    DirtTracks,
    #[strum(serialize = "Off-Road")]
    OffRoad,
    Asphalt,
}

/// Options chosen by a comma separated list of 1-based indices.
///
/// Tokens that are not plain numbers or fall outside the option list are
/// skipped. Order and repetitions of the input are kept.
pub fn pick<T: IntoEnumIterator + Copy>(input: &str) -> Vec<T> {
    let options: Vec<T> = T::iter().collect();
    input
        .split(',')
        .map(str::trim)
        .filter(|token| {
            !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
        })
        .filter_map(|token| token.parse::<usize>().ok())
        .filter(|index| (1..=options.len()).contains(index))
        .map(|index| options[index - 1])
        .collect()
}

/// Numbered option lines for a prompt.
pub fn menu<T: IntoEnumIterator, F: Fn(&T) -> String>(label: F) -> Vec<String> {
    T::iter()
        .enumerate()
        .map(|(i, option)| format!("{}. {}", i + 1, label(&option)))
        .collect()
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct RegionSelection {
    pub legal: Vec<&'static str>,
    pub display: Vec<&'static str>,
}

impl RegionSelection {
    pub fn countries(countries: &[Country]) -> Self {
        Self {
            legal: countries.iter().map(Country::legal).collect(),
            display: countries.iter().map(Country::local).collect(),
        }
    }
}

pub fn select(input: &str) -> RegionSelection {
    RegionSelection::countries(&pick::<Country>(input))
}

/// Returns the contract territory string, which always leads with the home
/// jurisdiction, and the display string listing only the additional
/// countries.
pub fn format_country_strings(
    legal: &[&str],
    display: &[&str],
) -> (String, String) {
    let legal_string = std::iter::once(HOME_JURISDICTION)
        .chain(legal.iter().copied())
        .collect::<Vec<_>>()
        .join(", ");
    (legal_string, display.join(", "))
}

pub fn format_roads(roads: &[RoadType]) -> String {
    if roads.is_empty() {
        return RoadType::Paved.to_string();
    }
    roads
        .iter()
        .map(RoadType::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
