use std::path::PathBuf;

use anyhow::Result;
use sha2::Digest;
use uuid::Uuid;

use crate::filter::{FilterCriteria, FromOperator, MatchOperator, TagFilter, STATUS};

/// Derives a stable id from a seed string, builtin presets keep the same id
/// across runs.
pub fn uuid_from_seed(seed: &str) -> Uuid {
    let digest_bytes: [u8; 32] = sha2::Sha256::digest(seed).into();
    let uuid_bytes: [u8; 16] = digest_bytes[0..16].try_into().unwrap();
    Uuid::from_bytes(uuid_bytes)
}

/// A named, reusable set of search criteria.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchPreset {
    pub id: Uuid,
    pub name: String,
    pub criteria: FilterCriteria,
    /// Builtin presets are not editable and are not saved in persistent data.
    pub is_builtin: bool,
}

pub fn builtin_presets() -> Vec<SearchPreset> {
    vec![
        SearchPreset {
            id: uuid_from_seed("builtin:error-spans"),
            name: "Error spans".to_string(),
            criteria: FilterCriteria {
                tags: vec![TagFilter {
                    id: uuid_from_seed("builtin:error-spans:tag"),
                    key: Some(STATUS.to_string()),
                    value: Some("error".to_string()),
                    operator: MatchOperator::EqualTo,
                }],
                ..FilterCriteria::default()
            },
            is_builtin: true,
        },
        SearchPreset {
            id: uuid_from_seed("builtin:slow-spans"),
            name: "Slow spans (> 500ms)".to_string(),
            criteria: FilterCriteria {
                from: Some("500ms".to_string()),
                from_operator: FromOperator::GreaterThan,
                tags: Vec::new(),
                ..FilterCriteria::default()
            },
            is_builtin: true,
        },
        SearchPreset {
            id: uuid_from_seed("builtin:error-tag"),
            name: "Spans tagged error".to_string(),
            criteria: FilterCriteria {
                tags: vec![TagFilter {
                    id: uuid_from_seed("builtin:error-tag:tag"),
                    key: Some("error".to_string()),
                    value: None,
                    operator: MatchOperator::EqualTo,
                }],
                ..FilterCriteria::default()
            },
            is_builtin: true,
        },
    ]
}

/// Persistent data structure that holds user-defined search presets.
/// If the data structure changes, it should be versioned to maintain compatibility with data saved
/// using older versions of tracemap.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum PersistentData {
    V1(PersistentDataV1),
}

impl Default for PersistentData {
    fn default() -> Self {
        PersistentData::V1(PersistentDataV1::default())
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PersistentDataV1 {
    presets: Vec<SearchPreset>,
}

pub fn save_presets(presets: &[SearchPreset]) -> Result<()> {
    let mut user_presets = presets.to_vec();
    user_presets.retain(|preset| !preset.is_builtin);

    let data = PersistentData::V1(PersistentDataV1 {
        presets: user_presets,
    });
    write_data(&data)
}

pub fn load_presets() -> Result<Vec<SearchPreset>> {
    let data = read_data()?;
    let saved = match data {
        PersistentData::V1(data) => data.presets,
    };

    // Builtin presets are not saved, they go in front of the user's own
    Ok(builtin_presets().into_iter().chain(saved).collect())
}

fn write_data(data: &PersistentData) -> Result<()> {
    let preset_file = preset_file_path();
    println!("Writing search presets to {}", preset_file.display());

    // Create the directory if it doesn't exist
    std::fs::create_dir_all(preset_data_folder())?;

    // First write the data to a temporary file
    let write_file_path = temporary_write_file_path();
    let mut file = std::fs::File::create(&write_file_path)?;
    serde_json::to_writer_pretty(&mut file, &data)?;
    file.sync_all()?;

    // Then move the temporary file to the final location
    // Makes things more robust against crashes
    std::fs::rename(&write_file_path, preset_file_path())?;

    Ok(())
}

fn read_data() -> Result<PersistentData> {
    let path = preset_file_path();
    println!("Reading search presets from {}", path.display());
    if !path.try_exists()? {
        println!("File not found, using default data");
        return Ok(PersistentData::default());
    }
    let file = std::fs::File::open(&path)?;
    let data: PersistentData = serde_json::from_reader(file)?;
    Ok(data)
}

fn preset_data_folder() -> PathBuf {
    directories::ProjectDirs::from("org", "tracemap", "tracemap")
        .unwrap()
        .data_dir()
        .to_path_buf()
}

fn preset_file_path() -> PathBuf {
    preset_data_folder().join("search_presets.json")
}

fn temporary_write_file_path() -> PathBuf {
    let random_number: u64 = rand::random();
    preset_data_folder().join(format!("temporary_search_presets{}.json", random_number))
}
