use std::path::PathBuf;

/// clap value parser for `--migrations-dir`.
pub fn validate_dir(path: &str) -> Result<PathBuf, String> {
    let pb = PathBuf::from(path);
    if pb.is_dir() {
        Ok(pb)
    } else {
        Err(format!("{} is not a valid directory", path))
    }
}
