pub mod af2;
pub mod all;
pub mod demo;
pub mod graft;
pub mod hhsearch;
pub mod prep;
pub mod qc;

use crate::error::{CliError, Result};

/// Parses a comma-separated list of 1-based repair sites.
pub(crate) fn parse_sites(text: &str) -> Result<Vec<isize>> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse()
                .map_err(|_| CliError::Argument(format!("invalid site '{token}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sites_accepts_comma_separated_positions() {
        assert_eq!(parse_sites("110").unwrap(), vec![110]);
        assert_eq!(parse_sites(" 45 , 120 ,").unwrap(), vec![45, 120]);
    }

    #[test]
    fn parse_sites_rejects_non_integers() {
        assert!(matches!(
            parse_sites("110,abc"),
            Err(CliError::Argument(_))
        ));
    }
}
