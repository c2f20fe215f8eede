use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use tracing::{info, warn};

/// In-memory allow-list of referral codes gating account signup, backed by
/// a newline-delimited file.
///
/// The file append in `admit` and the set insert are not transactional; a
/// crash between them loses the in-memory entry until restart. Assumes a
/// single-instance deployment — nothing invalidates this cache from other
/// processes.
pub struct RefcodeGate {
    path: PathBuf,
    codes: Mutex<HashSet<String>>,
}

impl RefcodeGate {
    /// Load the code set from `path`. An unreadable or empty file yields an
    /// empty set — the gate fails closed to "no valid codes", never fatal.
    pub fn load(path: &Path) -> Self {
        let codes = read_codes(path);
        info!(
            "Referral gate loaded {} code(s) from {}",
            codes.len(),
            path.display()
        );
        Self {
            path: path.to_path_buf(),
            codes: Mutex::new(codes),
        }
    }

    /// Re-read the backing file, replacing the in-memory set.
    pub fn reload(&self) -> Result<()> {
        let fresh = read_codes(&self.path);
        *self
            .codes
            .lock()
            .map_err(|e| anyhow!("refcode lock poisoned: {}", e))? = fresh;
        Ok(())
    }

    /// Membership test. Codes are reusable; checking never consumes.
    pub fn check(&self, code: &str) -> bool {
        self.codes
            .lock()
            .map(|codes| codes.contains(code))
            .unwrap_or(false)
    }

    /// Append a new code to the backing file, then admit it in memory.
    pub fn admit(&self, code: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(file, "\n{code}")?;
        self.codes
            .lock()
            .map_err(|e| anyhow!("refcode lock poisoned: {}", e))?
            .insert(code.to_string());
        Ok(())
    }
}

fn read_codes(path: &Path) -> HashSet<String> {
    match fs::read_to_string(path) {
        Ok(text) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
        Err(e) => {
            warn!(
                "Could not read referral codes from {}: {}; starting empty",
                path.display(),
                e
            );
            HashSet::new()
        }
    }
}
