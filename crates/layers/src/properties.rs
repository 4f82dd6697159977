//! Property aliases for the boundary and populated-place datasets.
//!
//! Natural Earth, GADM and hand-made state files disagree on key casing and
//! naming; these lists cover the variants the bundled datasets use.

use foundation::fields::FieldAliases;

pub const COUNTRY_NAME: FieldAliases =
    FieldAliases::new("country.name", &["name", "NAME", "admin", "ADMIN"]);

pub const COUNTRY_ADMIN: FieldAliases = FieldAliases::new("country.admin", &["admin", "ADMIN"]);

pub const SUBNATIONAL_NAME: FieldAliases = FieldAliases::new(
    "subnational.name",
    &["name", "NAME", "NAME_1", "st_nm", "STATE"],
);

pub const PLACE_NAME: FieldAliases =
    FieldAliases::new("place.name", &["NAME", "NAMEASCII", "LS_NAME", "GN_ASCII"]);

pub const PLACE_POPULATION: FieldAliases =
    FieldAliases::new("place.population", &["POP_MAX", "GN_POP"]);
