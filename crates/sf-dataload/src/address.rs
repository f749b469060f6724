//! Address display-name derivation for account loading.

use crate::error::{Error, ErrorKind, Result};
use crate::field::scalar_to_string;
use crate::row::ConvertibleCsvRow;

/// Maximum length of a derived address name.
const MAX_ADDRESS_NAME: usize = 80;

/// Derive an address display name from a row's address columns.
///
/// Reads the street, city and country columns named by the caller; fails
/// `DataValidation` when all three are empty.
pub fn address_name(
    row: &ConvertibleCsvRow,
    account_name: &str,
    street_column: &str,
    city_column: &str,
    country_column: &str,
) -> Result<String> {
    address_name_parts(
        account_name,
        &scalar_to_string(&row.get(street_column)),
        &scalar_to_string(&row.get(city_column)),
        &scalar_to_string(&row.get(country_column)),
    )
}

/// Derive an address display name from its parts:
/// `account_name[, street][, city]`, truncated to 80 characters and
/// trimmed. Newlines in the street are stripped. The country participates
/// only in the all-empty check.
pub fn address_name_parts(
    account_name: &str,
    street: &str,
    city: &str,
    country: &str,
) -> Result<String> {
    if street.is_empty() && city.is_empty() && country.is_empty() {
        return Err(Error::new(ErrorKind::DataValidation {
            reason: "Useless Address".to_string(),
            value: None,
        }));
    }

    let street: String = street.chars().filter(|&c| c != '\n').collect();

    let mut name = account_name.to_string();
    if !street.is_empty() {
        name.push_str(", ");
        name.push_str(&street);
    }
    if !city.is_empty() {
        name.push_str(", ");
        name.push_str(&city);
    }

    Ok(name
        .chars()
        .take(MAX_ADDRESS_NAME)
        .collect::<String>()
        .trim()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_account_street_and_city() {
        assert_eq!(
            address_name_parts("Acme", "10 High St", "London", "UK").unwrap(),
            "Acme, 10 High St, London"
        );
        assert_eq!(
            address_name_parts("Acme", "", "London", "").unwrap(),
            "Acme, London"
        );
        assert_eq!(address_name_parts("Acme", "", "", "UK").unwrap(), "Acme");
    }

    #[test]
    fn test_strips_newlines_from_street() {
        assert_eq!(
            address_name_parts("Acme", "10 High St\nFloor 2", "London", "").unwrap(),
            "Acme, 10 High StFloor 2, London"
        );
    }

    #[test]
    fn test_all_empty_address_is_useless() {
        let err = address_name_parts("Acme", "", "", "").unwrap_err();
        assert!(err.is_data_validation());
        assert!(err.to_string().contains("Useless Address"));
    }

    #[test]
    fn test_truncates_to_80_chars() {
        let street = "x".repeat(100);
        let name = address_name_parts("Acme", &street, "London", "").unwrap();
        assert_eq!(name.chars().count(), 80);
    }

    #[test]
    fn test_row_variant_reads_named_columns() {
        let row = ConvertibleCsvRow::new(
            vec!["Street".into(), "City".into(), "Country".into()],
            vec!["10 High St".into(), "London".into(), "UK".into()],
            0,
            vec![],
            vec![],
        );
        assert_eq!(
            address_name(&row, "Acme", "Street", "City", "Country").unwrap(),
            "Acme, 10 High St, London"
        );
    }
}
