//! Common types and utilities shared across CLI commands.

use chrono::NaiveDate;
use clap::ValueEnum;
use quadcover::catalog::TargetSelector;
use quadcover::download::parse_date;

/// How command results are printed to stdout.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One quadkey per line, with a short summary on stderr
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date_arg(text: &str) -> Result<NaiveDate, String> {
    parse_date(text).map_err(|e| e.to_string())
}

/// Parse a `--point` argument: `label=lat,lon` or `lat,lon`.
pub fn parse_point_arg(text: &str) -> Result<TargetSelector, String> {
    match text.parse::<TargetSelector>() {
        Ok(selector @ TargetSelector::Point { .. }) => Ok(selector),
        Ok(_) => Err(format!("'{}' is not a lat,lon point", text)),
        Err(e) => Err(e.to_string()),
    }
}

/// Parse a positive radius in metres.
pub fn parse_radius_arg(text: &str) -> Result<f64, String> {
    let radius: f64 = text
        .parse()
        .map_err(|_| format!("'{}' is not a number", text))?;
    if !radius.is_finite() || radius <= 0.0 {
        return Err(format!("radius must be positive, got {}", radius));
    }
    Ok(radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(
            parse_date_arg("2021-07-01"),
            Ok(NaiveDate::from_ymd_opt(2021, 7, 1).unwrap())
        );
        assert!(parse_date_arg("07/01/2021").is_err());
    }

    #[test]
    fn test_parse_point_arg() {
        match parse_point_arg("home=43.65,-79.38").unwrap() {
            TargetSelector::Point { label, location } => {
                assert_eq!(label, "home");
                assert!((location.lat() - 43.65).abs() < 1e-12);
            }
            other => panic!("unexpected selector {:?}", other),
        }
        assert!(parse_point_arg("SFO").is_err());
        assert!(parse_point_arg("home=95,0").is_err());
    }

    #[test]
    fn test_parse_radius_arg() {
        assert_eq!(parse_radius_arg("1500"), Ok(1500.0));
        assert!(parse_radius_arg("0").is_err());
        assert!(parse_radius_arg("-3").is_err());
        assert!(parse_radius_arg("far").is_err());
    }
}
