//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::parser::TARGET_SEPARATOR;
use super::settings::ConfigFile;

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn delimiter_to_string(delimiter: char) -> String {
    match delimiter {
        '\t' => "tab".to_string(),
        '|' => "pipe".to_string(),
        c => c.to_string(),
    }
}

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let country = config.catalog.country.as_deref().unwrap_or("");
    let kind = config.catalog.kind.as_deref().unwrap_or("");
    let select = config
        .targets
        .selectors
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(&format!(" {} ", TARGET_SEPARATOR));
    let start = config
        .download
        .start
        .map(|d| d.to_string())
        .unwrap_or_default();
    let end = config
        .download
        .end
        .map(|d| d.to_string())
        .unwrap_or_default();
    let quadkey_list = config
        .output
        .quadkey_list
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[coverage]
; Disc radius around each target, in metres (default: 1000)
radius_m = {}
; Zoom level of the coverage set (1-23, default: 18)
fine_zoom = {}
; Zoom level of the download grouping key (1-fine_zoom, default: 7)
coarse_zoom = {}
; Polygon sides per quarter circle when approximating the disc (default: 16)
quadrant_segments = {}

[catalog]
; Delimited file of named locations with latitude/longitude columns
; Leave empty to use coordinate targets only
path = {}
; Field delimiter: a single character, 'tab' or 'pipe'
delimiter = {}
; Keep only records from this country (empty = all)
country = {}
; Keep only records of this type (empty = all)
type = {}

[targets]
; Targets separated by '|':
;   SFO or iata:SFO   - catalogue record by IATA code
;   name:Denver       - first catalogue record whose name contains the text
;   home=47.6,-122.3  - a labelled coordinate
select = {}

[download]
; Download daily activity files after computing coverage
enabled = {}
; Inclusive date range (YYYY-MM-DD)
start = {}
end = {}
bucket = {}
; Placeholders: {{bucket}} {{year}} {{month}} {{day}} {{date}} {{quadkey}}
url_template = {}
; Request timeout in seconds
timeout = {}

[output]
; Root of the downloaded file tree (<directory>/YYYY/MM/DD/<quadkey>.csv)
directory = {}
; Fine quadkey list (empty = <directory>/z<fine_zoom>_quadkeys.txt)
quadkey_list = {}

[logging]
file = {}
"#,
        config.coverage.radius_m,
        config.coverage.fine_zoom,
        config.coverage.coarse_zoom,
        config.coverage.quadrant_segments,
        catalog_path,
        delimiter_to_string(config.catalog.delimiter),
        country,
        kind,
        select,
        config.download.enabled,
        start,
        end,
        config.download.bucket,
        config.download.url_template,
        config.download.timeout_secs,
        path_to_string(&config.output.directory),
        quadkey_list,
        path_to_string(&config.logging.file),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::parse_ini;
    use ini::Ini;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_reparses_to_itself() {
        let config = ConfigFile::default();
        let text = to_config_string(&config);
        let ini = Ini::load_from_str(&text).unwrap();

        assert_eq!(parse_ini(&ini).unwrap(), config);
    }

    #[test]
    fn test_modified_config_survives_save() {
        let mut config = ConfigFile::default();
        config.coverage.radius_m = 1234.5;
        config.catalog.path = None;
        config.catalog.delimiter = '|';
        config.targets.selectors = vec!["home=47.6,-122.3".parse().unwrap()];
        config.download.enabled = false;
        config.output.quadkey_list = Some(PathBuf::from("/tmp/list.txt"));

        let ini = Ini::load_from_str(&to_config_string(&config)).unwrap();
        assert_eq!(parse_ini(&ini).unwrap(), config);
    }

    #[test]
    fn test_contains_every_section() {
        let text = to_config_string(&ConfigFile::default());
        for section in [
            "[coverage]",
            "[catalog]",
            "[targets]",
            "[download]",
            "[output]",
            "[logging]",
        ] {
            assert!(text.contains(section), "missing {}", section);
        }
    }
}
