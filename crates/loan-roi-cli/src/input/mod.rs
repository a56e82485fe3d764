pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a record from `--input <file>`, falling back to piped stdin.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    stdin::read_stdin()?
        .ok_or_else(|| format!("--input <file.json> or stdin required for {what}").into())
}
