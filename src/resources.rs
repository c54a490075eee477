use crate::errors::{DataLoadError, ResourceError, ResourceResult};
use schema::{MoveData, SpeciesData};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

const BUILTIN_MOVES: &str = include_str!("../data/moves.ron");
const BUILTIN_SPECIES: &str = include_str!("../data/species.ron");

// Embedded reference data - parsed once on first use
static BUILTIN_STORE: LazyLock<Arc<ResourceStore>> = LazyLock::new(|| {
    let store = ResourceStore::from_ron_strs(BUILTIN_MOVES, BUILTIN_SPECIES)
        .unwrap_or_else(|err| panic!("embedded battle data is invalid: {}", err));
    Arc::new(store)
});

pub fn move_key(move_id: &str) -> String {
    format!("move-{}", move_id)
}

pub fn species_key(species_id: &str) -> String {
    format!("pokemon-{}", species_id)
}

#[derive(Debug, Clone)]
enum Resource {
    Move(Arc<MoveData>),
    Species(Arc<SpeciesData>),
}

/// Typed key-value store for battle reference data.
///
/// Keys follow the `move-<id>` / `pokemon-<id>` convention; values are shared
/// so every participant knowing a move points at the same data.
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    entries: HashMap<String, Resource>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The store built from the data files shipped with the crate.
    pub fn builtin() -> Arc<ResourceStore> {
        Arc::clone(&BUILTIN_STORE)
    }

    /// Loads `moves.ron` and `species.ron` from a data directory.
    pub fn load_dir(data_path: &Path) -> Result<Self, DataLoadError> {
        let read = |file: &str| {
            let path = data_path.join(file);
            std::fs::read_to_string(&path).map_err(|source| DataLoadError::Io { path, source })
        };
        let moves = read("moves.ron")?;
        let species = read("species.ron")?;
        Self::from_ron_strs(&moves, &species)
    }

    pub fn from_ron_strs(moves: &str, species: &str) -> Result<Self, DataLoadError> {
        let mut store = Self::new();
        for data in parse_list::<MoveData>(moves, "moves.ron")? {
            store.insert_move(data);
        }
        for data in parse_list::<SpeciesData>(species, "species.ron")? {
            store.insert_species(data);
        }
        Ok(store)
    }

    /// Inserts or replaces a move under `move-<id>`.
    pub fn insert_move(&mut self, data: MoveData) -> Arc<MoveData> {
        let data = Arc::new(data);
        self.entries
            .insert(move_key(&data.id), Resource::Move(Arc::clone(&data)));
        data
    }

    /// Inserts or replaces a species under `pokemon-<id>`.
    pub fn insert_species(&mut self, data: SpeciesData) -> Arc<SpeciesData> {
        let data = Arc::new(data);
        self.entries
            .insert(species_key(&data.id), Resource::Species(Arc::clone(&data)));
        data
    }

    pub fn move_data(&self, move_id: &str) -> ResourceResult<Arc<MoveData>> {
        let key = move_key(move_id);
        match self.entries.get(&key) {
            Some(Resource::Move(data)) => Ok(Arc::clone(data)),
            _ => Err(ResourceError::NotFound { key }),
        }
    }

    pub fn species(&self, species_id: &str) -> ResourceResult<Arc<SpeciesData>> {
        let key = species_key(species_id);
        match self.entries.get(&key) {
            Some(Resource::Species(data)) => Ok(Arc::clone(data)),
            _ => Err(ResourceError::NotFound { key }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_list<T: DeserializeOwned>(text: &str, origin: &str) -> Result<Vec<T>, DataLoadError> {
    ron::from_str(text).map_err(|source| DataLoadError::Parse {
        origin: origin.to_string(),
        source,
    })
}
