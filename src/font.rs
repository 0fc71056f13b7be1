//! Font loading and discovery
//!
//! Uses fontdb to find system fonts by family name with fallback support.

use anyhow::bail;
use fontdb::{Database, Family, ID, Query, Style, Weight};
use std::sync::OnceLock;

use rush::config::FontConfig;

/// Global font database (loaded once)
static FONT_DB: OnceLock<Database> = OnceLock::new();

fn font_db() -> &'static Database {
    FONT_DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        log::info!("Loaded {} system fonts", db.faces().count());
        db
    })
}

/// Font file contents plus the face to use from it
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub data: Vec<u8>,
    /// Face index inside a collection (.ttc); 0 for single-face files
    pub index: u32,
}

/// Read the file backing a face, keeping its collection index
fn load_face(db: &Database, face_id: ID) -> Option<LoadedFont> {
    let face = db.face(face_id)?;

    let data = match &face.source {
        fontdb::Source::File(path) => std::fs::read(path).ok()?,
        fontdb::Source::Binary(data) => data.as_ref().as_ref().to_vec(),
        fontdb::Source::SharedFile(_path, data) => data.as_ref().as_ref().to_vec(),
    };

    Some(LoadedFont {
        data,
        index: face.index,
    })
}

/// Load the best face matching a family
fn load_family(family: Family<'_>) -> Option<LoadedFont> {
    let db = font_db();

    let query = Query {
        families: &[family],
        weight: Weight::NORMAL,
        style: Style::Normal,
        ..Default::default()
    };

    load_face(db, db.query(&query)?)
}

/// Load the first configured family found on the system, then any monospace face
pub fn load_font(config: &FontConfig) -> anyhow::Result<LoadedFont> {
    for family in &config.family {
        if let Some(font) = load_family(Family::Name(family)) {
            log::info!("Loaded font: {} (face {})", family, font.index);
            return Ok(font);
        }
        log::debug!("Font family {:?} not found", family);
    }

    if let Some(font) = load_family(Family::Monospace) {
        log::info!("Using system monospace font (none of {:?} found)", config.family);
        return Ok(font);
    }

    bail!("no usable font: tried {:?} and the system monospace family", config.family)
}
