//! The CLI's copy of a session, persisted between invocations

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::auth::Session;
use crate::error::Result;

/// Read the stored session; a missing file means signed out
pub fn load(path: &Path) -> Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Write the session, readable by the owner only from the moment it exists
pub fn save(path: &Path, session: &Session) -> Result<()> {
    let content = serde_json::to_string_pretty(session)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let mut file = options.open(path)?;
        // An older file keeps its mode through `open`
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(content.as_bytes())?;
    }
    #[cfg(not(unix))]
    {
        let mut file = options.open(path)?;
        file.write_all(content.as_bytes())?;
    }
    Ok(())
}

/// Returns whether there was anything to remove
pub fn remove(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}
