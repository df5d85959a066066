//! Utilities for loading the full balance dataset from the game's map archive.
//!
//! The game ships its balance tables as three XML documents at the root of
//! a zip archive (`legiontd2.zip` under the game's `StreamingAssets/Maps`
//! directory). A load opens the archive, decodes all three tables into
//! memory, and releases the archive before returning; there is no
//! streaming or partial load.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::defs::{Global, UnitDef, WaveDef};
use crate::error::{Error, Result};
use crate::game_types::UnitIndex;

/// The archive entry holding the unit table.
pub const UNITS_ENTRY: &str = "units.xml";
/// The archive entry holding the singleton globals table.
pub const GLOBALS_ENTRY: &str = "globals.xml";
/// The archive entry holding the wave table.
pub const WAVES_ENTRY: &str = "waves.xml";

/// The fully loaded dataset: every unit, the singleton balance record, and
/// every wave. Built in one pass and read-only afterwards.
#[derive(Debug, Clone)]
pub struct GameData {
    pub units: Vec<UnitDef>,
    pub global: Global,
    pub waves: Vec<WaveDef>,
}

impl GameData {
    /// Load the dataset from a zip archive on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_archive(file)
    }

    /// Load the dataset from an already-open zip archive.
    ///
    /// All three entries must be present; a missing entry or an empty
    /// globals table aborts the load. Unit and wave order follows file
    /// order.
    pub fn from_archive<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let units = parse_table(&read_entry(&mut archive, UNITS_ENTRY)?, UNITS_ENTRY, |node| {
            node.has_tag_name(UnitDef::TAG).then(|| UnitDef::from_node(node))
        })?;
        let globals = parse_table(
            &read_entry(&mut archive, GLOBALS_ENTRY)?,
            GLOBALS_ENTRY,
            |node| node.has_tag_name(Global::TAG).then(|| Global::from_node(node)),
        )?;
        let waves = parse_table(&read_entry(&mut archive, WAVES_ENTRY)?, WAVES_ENTRY, |node| {
            node.has_tag_name(WaveDef::TAG).then(|| WaveDef::from_node(node))
        })?;

        let global = globals.into_iter().next().ok_or_else(|| Error::EmptyTable {
            entry: GLOBALS_ENTRY.to_owned(),
        })?;

        debug!(
            units = units.len(),
            waves = waves.len(),
            "loaded balance dataset"
        );

        Ok(Self {
            units,
            global,
            waves,
        })
    }

    /// Linear lookup of a unit by identifier.
    pub fn find_unit(&self, id: &str) -> Option<&UnitDef> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Linear lookup of a wave by level number.
    pub fn find_wave(&self, level_num: i32) -> Option<&WaveDef> {
        self.waves.iter().find(|w| w.level_num == level_num)
    }

    /// Build an id-keyed index for resolving wave unit references in bulk.
    pub fn unit_index(&self) -> UnitIndex<'_> {
        UnitIndex::new(&self.units)
    }
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut entry = archive.by_name(name).map_err(|err| match err {
        ZipError::FileNotFound => Error::EntryNotFound(name.to_owned()),
        other => Error::Zip(other),
    })?;
    let mut text = String::new();
    entry.read_to_string(&mut text)?;
    Ok(text)
}

/// Parse one table document: every matching child of the document root, in
/// file order.
fn parse_table<T>(
    xml: &str,
    entry: &str,
    assemble: impl Fn(roxmltree::Node<'_, '_>) -> Option<Result<T>>,
) -> Result<Vec<T>> {
    let doc = roxmltree::Document::parse(xml).map_err(|err| Error::Xml {
        entry: entry.to_owned(),
        err,
    })?;
    doc.root_element()
        .children()
        .filter_map(assemble)
        .collect()
}
