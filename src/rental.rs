use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::calendar;
use crate::document::Placeholders;
use crate::regions::{self, RegionSelection, RoadType};
use crate::vehicles::Vehicle;

/// Placeholder tokens recognised in templates.
pub mod tokens {
    use const_format::concatcp;

    macro_rules! token {
        ($name:literal) => {
            concatcp!("{{", $name, "}}")
        };
    }

    pub const CONTRACT_DATE: &str = token!("CONTRACT_DATE");
    pub const CONTRACT_NUMBER: &str = token!("CONTRACT_NUMBER");

    pub const CLIENT_NAME: &str = token!("CLIENT_NAME");
    pub const DATE_OF_BIRTH: &str = token!("DATE_OF_BIRTH");
    pub const ADDRESS: &str = token!("ADDRESS");
    pub const PHONE: &str = token!("PHONE");
    pub const EMAIL: &str = token!("EMAIL");
    pub const PASSPORT_NUMBER: &str = token!("PASSPORT_NUMBER");
    pub const PASSPORT_ISSUE_DATE: &str = token!("PASSPORT_ISSUE_DATE");
    pub const PASSPORT_ISSUE_BY: &str = token!("PASSPORT_ISSUE_BY");
    pub const DRIVER_LICENSE: &str = token!("DRIVER_LICENSE");

    pub const RENTAL_START: &str = token!("RENTAL_START");
    pub const RENTAL_END: &str = token!("RENTAL_END");
    pub const RENTAL_DAYS: &str = token!("RENTAL_DAYS");
    pub const RENTAL_RATE: &str = token!("RENTAL_RATE");
    pub const TOTAL_AMOUNT: &str = token!("TOTAL_AMOUNT");
    pub const SECURITY_DEPOSIT: &str = token!("SECURITY_DEPOSIT");

    pub const CAR_MAKE: &str = token!("CAR_MAKE");
    pub const CAR_MODEL: &str = token!("CAR_MODEL");
    pub const CAR_NAME: &str = token!("CAR_NAME");
    pub const CAR_YEAR: &str = token!("CAR_YEAR");
    pub const CAR_COLOR: &str = token!("CAR_COLOR");
    pub const CAR_PLATE: &str = token!("CAR_PLATE");
    pub const CAR_VIN: &str = token!("CAR_VIN");

    pub const ALLOWED_TERRITORIES: &str = token!("ALLOWED_TERRITORIES");
    pub const ADDITIONAL_COUNTRIES: &str = token!("ADDITIONAL_COUNTRIES");
    pub const TYPES_OF_ROADS: &str = token!("TYPES_OF_ROADS");

    pub const DRIVER_NAMES: [&str; 3] = [
        token!("DRIVER1_NAME"),
        token!("DRIVER2_NAME"),
        token!("DRIVER3_NAME"),
    ];
    pub const DRIVER_LICENSES: [&str; 3] = [
        token!("DRIVER1_LICENSE"),
        token!("DRIVER2_LICENSE"),
        token!("DRIVER3_LICENSE"),
    ];
}

pub const MAX_DRIVERS: usize = tokens::DRIVER_NAMES.len();

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Client {
    pub name: String,
    pub date_of_birth: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub passport: Passport,
    pub license: String,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Passport {
    pub number: String,
    pub issue_date: String,
    pub issued_by: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Driver {
    pub name: String,
    pub license: String,
}

/// Everything agreed with the client before a contract number is issued.
#[derive(Debug, PartialEq, Clone)]
pub struct Rental {
    pub client: Client,
    pub vehicle: Vehicle,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub rate: Decimal,
    pub deposit: Decimal,
    pub drivers: Vec<Driver>,
    pub roads: Vec<RoadType>,
    pub regions: RegionSelection,
}

impl Rental {
    pub fn days(&self) -> i64 {
        calendar::inclusive_days(self.start, self.end)
    }

    pub fn total(&self) -> Decimal {
        self.rate * Decimal::from(self.days())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Contract {
    pub number: u64,
    pub date: NaiveDate,
    pub rental: Rental,
}

impl Contract {
    pub fn new(number: u64, date: NaiveDate, rental: Rental) -> Self {
        Self {
            number,
            date,
            rental,
        }
    }

    pub fn placeholders(&self) -> Placeholders {
        use tokens::*;

        let rental = &self.rental;
        let client = &rental.client;
        let vehicle = &rental.vehicle;
        let (territories, countries) = regions::format_country_strings(
            &rental.regions.legal,
            &rental.regions.display,
        );

        let mut map = Placeholders::new();
        map.insert(CONTRACT_DATE, calendar::format_date(self.date));
        map.insert(CONTRACT_NUMBER, self.number);

        map.insert(CLIENT_NAME, &client.name);
        map.insert(DATE_OF_BIRTH, &client.date_of_birth);
        map.insert(ADDRESS, &client.address);
        map.insert(PHONE, &client.phone);
        map.insert(EMAIL, &client.email);
        map.insert(PASSPORT_NUMBER, &client.passport.number);
        map.insert(PASSPORT_ISSUE_DATE, &client.passport.issue_date);
        map.insert(PASSPORT_ISSUE_BY, &client.passport.issued_by);
        map.insert(DRIVER_LICENSE, &client.license);

        map.insert(RENTAL_START, calendar::format_date(rental.start));
        map.insert(RENTAL_END, calendar::format_date(rental.end));
        map.insert(RENTAL_DAYS, rental.days());
        map.insert(RENTAL_RATE, money(rental.rate));
        map.insert(TOTAL_AMOUNT, money(rental.total()));
        map.insert(SECURITY_DEPOSIT, money(rental.deposit));

        map.insert(CAR_MAKE, &vehicle.make);
        map.insert(CAR_MODEL, &vehicle.model);
        map.insert(CAR_NAME, vehicle.name());
        map.insert(CAR_YEAR, &vehicle.year);
        map.insert(CAR_COLOR, &vehicle.color);
        map.insert(CAR_PLATE, &vehicle.plate);
        map.insert(CAR_VIN, &vehicle.vin);

        map.insert(ALLOWED_TERRITORIES, territories);
        map.insert(ADDITIONAL_COUNTRIES, countries);
        map.insert(TYPES_OF_ROADS, regions::format_roads(&rental.roads));

        // Every slot is set so unused driver lines come out blank.
        for slot in 0..MAX_DRIVERS {
            let driver = rental.drivers.get(slot);
            map.insert(
                DRIVER_NAMES[slot],
                driver.map_or("", |d| d.name.as_str()),
            );
            map.insert(
                DRIVER_LICENSES[slot],
                driver.map_or("", |d| d.license.as_str()),
            );
        }
        map
    }
}

pub fn money(amount: Decimal) -> String {
    let cents =
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", cents)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::regions::Country;
    use crate::vehicles::Year;
    use rust_decimal_macros::dec;

    fn dmy(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    pub fn camry() -> Vehicle {
        Vehicle {
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: Year::Number(2021),
            color: "White".to_string(),
            plate: "123ABC02".to_string(),
            vin: "JT2BF22K1W0123456".to_string(),
        }
    }

    pub fn rental() -> Rental {
        Rental {
            client: Client {
                name: "Ivanov Ivan".to_string(),
                date_of_birth: "12.03.1985".to_string(),
                address: "Almaty, Abay ave 10".to_string(),
                phone: "+7 701 000 00 00".to_string(),
                email: "ivanov@example.com".to_string(),
                passport: Passport {
                    number: "N1234567".to_string(),
                    issue_date: "01.02.2015".to_string(),
                    issued_by: "MVD RK".to_string(),
                },
                license: "AB123456".to_string(),
            },
            vehicle: camry(),
            start: dmy(1, 1, 2024),
            end: dmy(5, 1, 2024),
            rate: dec!(50),
            deposit: dec!(200),
            drivers: Vec::new(),
            roads: Vec::new(),
            regions: RegionSelection::default(),
        }
    }

    fn contract(rental: Rental) -> Contract {
        Contract::new(7, dmy(31, 12, 2023), rental)
    }

    #[test]
    fn five_day_rental_amounts() {
        let map = contract(rental()).placeholders();
        assert_eq!(map.get(tokens::RENTAL_DAYS), Some("5"));
        assert_eq!(map.get(tokens::TOTAL_AMOUNT), Some("250.00"));
        assert_eq!(map.get(tokens::SECURITY_DEPOSIT), Some("200.00"));
        assert_eq!(map.get(tokens::RENTAL_RATE), Some("50.00"));
    }

    #[test]
    fn fractional_rate_rounds_to_cents() {
        let mut terms = rental();
        terms.rate = dec!(33.335);
        terms.end = terms.start;
        assert_eq!(terms.days(), 1);
        assert_eq!(money(terms.total()), "33.34");
    }

    #[test]
    fn inverted_dates_give_negative_total() {
        let mut terms = rental();
        std::mem::swap(&mut terms.start, &mut terms.end);
        assert_eq!(terms.days(), -3);
        assert_eq!(money(terms.total()), "-150.00");
    }

    #[test]
    fn contract_and_vehicle_fields() {
        let map = contract(rental()).placeholders();
        assert_eq!(map.get(tokens::CONTRACT_NUMBER), Some("7"));
        assert_eq!(map.get(tokens::CONTRACT_DATE), Some("31.12.2023"));
        assert_eq!(map.get(tokens::RENTAL_START), Some("01.01.2024"));
        assert_eq!(map.get(tokens::RENTAL_END), Some("05.01.2024"));
        assert_eq!(map.get(tokens::CAR_NAME), Some("Toyota Camry"));
        assert_eq!(map.get(tokens::CAR_YEAR), Some("2021"));
        assert_eq!(map.get(tokens::PASSPORT_ISSUE_BY), Some("MVD RK"));
        assert_eq!(map.get("{{CLIENT_NAME}}"), Some("Ivanov Ivan"));
    }

    #[test]
    fn all_driver_slots_present() {
        let mut terms = rental();
        terms.drivers.push(Driver {
            name: "Petrov Petr".to_string(),
            license: "CD765432".to_string(),
        });
        let map = contract(terms).placeholders();

        assert_eq!(map.get("{{DRIVER1_NAME}}"), Some("Petrov Petr"));
        assert_eq!(map.get("{{DRIVER1_LICENSE}}"), Some("CD765432"));
        for slot in 1..MAX_DRIVERS {
            assert_eq!(map.get(tokens::DRIVER_NAMES[slot]), Some(""));
            assert_eq!(map.get(tokens::DRIVER_LICENSES[slot]), Some(""));
        }
    }

    #[test]
    fn regions_and_roads() {
        let mut terms = rental();
        terms.regions = RegionSelection::countries(&[Country::Uzbekistan]);
        terms.roads = vec![RoadType::Gravel, RoadType::Asphalt];
        let map = contract(terms).placeholders();

        assert_eq!(
            map.get(tokens::ALLOWED_TERRITORIES),
            Some("Kazakhstan, Uzbekistan")
        );
        assert_eq!(map.get(tokens::ADDITIONAL_COUNTRIES), Some("Узбекистан"));
        assert_eq!(map.get(tokens::TYPES_OF_ROADS), Some("Gravel, Asphalt"));
    }

    #[test]
    fn defaults_without_selection() {
        let map = contract(rental()).placeholders();
        assert_eq!(map.get(tokens::ALLOWED_TERRITORIES), Some("Kazakhstan"));
        assert_eq!(map.get(tokens::ADDITIONAL_COUNTRIES), Some(""));
        assert_eq!(map.get(tokens::TYPES_OF_ROADS), Some("Paved"));
    }

    #[test]
    fn tokens_do_not_contain_each_other() {
        let map = contract(rental()).placeholders();
        let tokens: Vec<&str> = map.iter().map(|(token, _)| token).collect();
        assert_eq!(tokens.len(), 33);
        for a in tokens.iter() {
            for b in tokens.iter().filter(|b| b != &a) {
                assert!(!b.contains(a), "{} contains {}", b, a);
            }
        }
    }
}
