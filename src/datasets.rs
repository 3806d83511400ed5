//! CSV loaders for rating logs and title catalogs.

use std::path::Path;

use csv;
use failure;

use data::{Catalog, Rating, Ratings};

/// Load rating records from a CSV file.
///
/// The file must carry a header row with `userId`, `movieTitle` and
/// `rating` columns.
pub fn load_ratings<P: AsRef<Path>>(path: P) -> Result<Ratings, failure::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let ratings: Vec<Rating> = reader.deserialize().collect::<Result<Vec<_>, _>>()?;

    Ok(Ratings::from(ratings))
}

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    title: String,
}

/// Load the title catalog from a CSV file with a `title` column.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, failure::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let titles: Vec<String> = reader
        .deserialize()
        .map(|record| record.map(|x: CatalogRecord| x.title))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Catalog::from_titles(titles))
}
