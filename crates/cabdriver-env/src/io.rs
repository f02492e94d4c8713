use std::{fs, path::Path};

use crate::{EnvError, TimeMatrix};

/// Load a time matrix from nested YAML sequences on disk.
pub fn load_time_matrix_yaml(path: impl AsRef<Path>) -> Result<TimeMatrix, EnvError> {
    let yaml = fs::read_to_string(path)?;
    let matrix: TimeMatrix = serde_yaml::from_str(&yaml)?;
    Ok(matrix)
}

/// Serialize and write a time matrix as nested YAML sequences.
pub fn save_time_matrix_yaml(path: impl AsRef<Path>, matrix: &TimeMatrix) -> Result<(), EnvError> {
    let yaml = serde_yaml::to_string(matrix)?;
    fs::write(path, yaml)?;
    Ok(())
}

/// Load a time matrix from a nested JSON array, e.g. `json.dump(tm.tolist(), f)`.
pub fn load_time_matrix_json(path: impl AsRef<Path>) -> Result<TimeMatrix, EnvError> {
    let json = fs::read_to_string(path)?;
    let matrix: TimeMatrix = serde_json::from_str(&json)?;
    Ok(matrix)
}

/// Serialize and write a time matrix as a nested JSON array.
pub fn save_time_matrix_json(path: impl AsRef<Path>, matrix: &TimeMatrix) -> Result<(), EnvError> {
    let json = serde_json::to_string(matrix)?;
    fs::write(path, json)?;
    Ok(())
}
