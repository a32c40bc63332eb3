use crate::model::{Catalog, CatalogError, OfferRecord, RawRow, SmartphoneRecord};
use csv::{ReaderBuilder, Trim};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const OFFERS_FILE: &str = "offres.csv";
const SMARTPHONES_FILE: &str = "smartphones.csv";
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Catalog snapshot source backed by two CSV files in one directory.
pub struct CsvCatalogStore {
    base_path: PathBuf,
}

impl CsvCatalogStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Reads `offres.csv` and `smartphones.csv`. A missing or unreadable file
    /// yields an empty list without affecting the other one.
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let offers: Vec<OfferRecord> = self
            .rows_or_empty(OFFERS_FILE)
            .iter()
            .map(OfferRecord::from_row)
            .collect();
        let smartphones: Vec<SmartphoneRecord> = self
            .rows_or_empty(SMARTPHONES_FILE)
            .iter()
            .map(SmartphoneRecord::from_row)
            .collect();

        let catalog = Catalog::new(offers, smartphones);
        info!(
            "Catalog loaded from {}: {} offers, {} smartphones, version {:?}",
            self.base_path.display(),
            catalog.offers.len(),
            catalog.smartphones.len(),
            catalog.version
        );
        Ok(catalog)
    }

    fn rows_or_empty(&self, file: &str) -> Vec<RawRow> {
        match read_rows(&self.base_path.join(file)) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Skipping catalog file {}: {}", file, e);
                Vec::new()
            }
        }
    }
}

/// Picks the candidate delimiter that occurs most often in the header line.
fn detect_delimiter(sample: &str) -> u8 {
    let header = sample.lines().next().unwrap_or("");
    let mut best = (b',', 0);
    for &delimiter in &DELIMITERS {
        let count = header.bytes().filter(|&b| b == delimiter).count();
        if count > best.1 {
            best = (delimiter, count);
        }
    }
    best.0
}

fn read_rows(path: &Path) -> Result<Vec<RawRow>, CatalogError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Catalog file {} not found, using an empty list", path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(CatalogError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };
    // Non UTF-8 exports (Latin-1 spreadsheets) keep their rows with replaced characters.
    let content = String::from_utf8_lossy(&bytes);
    let content = content.trim_start_matches('\u{feff}');

    let csv_err = |source: csv::Error| CatalogError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(csv_err)?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn delimiter_sniffing() {
        assert_eq!(detect_delimiter("id;cta;prix_dh\n1;*3;50"), b';');
        assert_eq!(detect_delimiter("id,cta,prix_dh\n1,*3,50"), b',');
        assert_eq!(detect_delimiter("id\tcta\n"), b'\t');
        assert_eq!(detect_delimiter("id\n1"), b',');
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn comma_wins_ties() {
        assert_eq!(detect_delimiter("a,b;c"), b',');
    }

    #[test]
    fn missing_files_give_an_empty_catalog() {
        let dir = tempdir().unwrap();
        let catalog = CsvCatalogStore::new(dir.path()).load().unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.version, None);
    }

    #[test]
    fn latin1_file_does_not_drop_the_other_one() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("offres.csv"), "id;cta;prix_dh\n1;*3;50\n").unwrap();
        let mut phones = b"id,marque,gamme\n10,Samsung,Entr".to_vec();
        phones.extend_from_slice(&[0xE9, 0x65, b'\n']);
        fs::write(dir.path().join("smartphones.csv"), phones).unwrap();

        let catalog = CsvCatalogStore::new(dir.path()).load().unwrap();
        assert_eq!(catalog.offers.len(), 1);
        assert_eq!(catalog.offers[0].cta.as_deref(), Some("*3"));
        assert_eq!(catalog.smartphones.len(), 1);
        assert_eq!(catalog.smartphones[0].brand.as_deref(), Some("Samsung"));
    }

    #[test]
    fn unreadable_file_gives_an_empty_list_for_that_file_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("offres.csv"), "id;cta;prix_dh\n1;*3;50\n").unwrap();
        fs::create_dir(dir.path().join("smartphones.csv")).unwrap();

        let catalog = CsvCatalogStore::new(dir.path()).load().unwrap();
        assert_eq!(catalog.offers.len(), 1);
        assert!(catalog.smartphones.is_empty());
    }

    #[test]
    fn loads_semicolon_offers_and_comma_smartphones() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("offres.csv"),
            "\u{feff}id;cta;famille;libelle;volume;minutes;sms;validite_jours;prix_dh;zone;link;version_catalogue\n\
             1;*3;RISQUE_Churn;Pass 3;1024;-1;;7;50;;https://x/1;2026-10\n\
             2;*3;RISQUE_Churn;Pass 3 plus; 2048 ;60;10;30;abc;Europe;;\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("smartphones.csv"),
            "id,marque,modele,capacite,prix_dh,gamme,link\n\
             10,Samsung,Galaxy A15,128Go,1999,entree,\n",
        )
        .unwrap();

        let catalog = CsvCatalogStore::new(dir.path()).load().unwrap();
        assert_eq!(catalog.offers.len(), 2);
        assert_eq!(catalog.smartphones.len(), 1);
        assert_eq!(catalog.version.as_deref(), Some("2026-10"));

        let first = &catalog.offers[0];
        assert_eq!(first.id.as_deref(), Some("1"));
        assert_eq!(first.volume_mb, Some(1024.0));
        assert_eq!(first.sms_count, None);
        assert_eq!(first.price, Some(50.0));

        let second = &catalog.offers[1];
        assert_eq!(second.volume_mb, Some(2048.0));
        assert_eq!(second.price, None);
        assert_eq!(second.zone.as_deref(), Some("Europe"));
        assert_eq!(second.link, None);

        let phone = &catalog.smartphones[0];
        assert_eq!(phone.brand.as_deref(), Some("Samsung"));
        assert_eq!(phone.price, Some(1999.0));
    }
}
