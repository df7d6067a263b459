use super::{ToolError, run_command};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Invocation settings for the homology search pair: an MSA build followed by
/// a profile search against a structure-template database.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// MSA-building executable.
    pub hhblits_exe: PathBuf,
    /// Profile-search executable.
    pub hhsearch_exe: PathBuf,
    /// Sequence database for the MSA build (e.g. a UniRef/Uniclust30 build).
    pub db_uniref: PathBuf,
    /// Template database for the profile search (e.g. pdb70).
    pub db_pdb: PathBuf,
    /// CPU threads handed to both tools.
    pub threads: u32,
    /// MSA build iterations.
    pub iterations: u32,
}

impl SearchSettings {
    pub fn new(db_uniref: PathBuf, db_pdb: PathBuf) -> Self {
        Self {
            hhblits_exe: PathBuf::from("hhblits"),
            hhsearch_exe: PathBuf::from("hhsearch"),
            db_uniref,
            db_pdb,
            threads: 4,
            iterations: 3,
        }
    }

    /// Runs the search for `fasta`, leaving `query.a3m` and the hit report
    /// `pdb_hits.hhr` in `outdir`. Returns the hit-report path.
    pub fn search(&self, fasta: &Path, outdir: &Path) -> Result<PathBuf, ToolError> {
        fs::create_dir_all(outdir)?;
        let a3m = outdir.join("query.a3m");
        let hhr = outdir.join("pdb_hits.hhr");

        let mut msa = Command::new(&self.hhblits_exe);
        msa.arg("-i")
            .arg(fasta)
            .arg("-oa3m")
            .arg(&a3m)
            .arg("-d")
            .arg(&self.db_uniref)
            .arg("-cpu")
            .arg(self.threads.to_string())
            .arg("-n")
            .arg(self.iterations.to_string());
        run_command(&mut msa, &self.hhblits_exe.to_string_lossy())?;

        let mut profile_search = Command::new(&self.hhsearch_exe);
        profile_search
            .arg("-i")
            .arg(&a3m)
            .arg("-d")
            .arg(&self.db_pdb)
            .arg("-o")
            .arg(&hhr)
            .arg("-cpu")
            .arg(self.threads.to_string());
        run_command(&mut profile_search, &self.hhsearch_exe.to_string_lossy())?;

        Ok(hhr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_conventional_binaries_and_defaults() {
        let settings = SearchSettings::new(PathBuf::from("/db/uniref"), PathBuf::from("/db/pdb70"));
        assert_eq!(settings.hhblits_exe, PathBuf::from("hhblits"));
        assert_eq!(settings.hhsearch_exe, PathBuf::from("hhsearch"));
        assert_eq!(settings.threads, 4);
        assert_eq!(settings.iterations, 3);
    }

    #[test]
    fn missing_binary_maps_to_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings =
            SearchSettings::new(PathBuf::from("/db/uniref"), PathBuf::from("/db/pdb70"));
        settings.hhblits_exe = PathBuf::from("definitely-not-a-real-binary-1b8f");

        let fasta = dir.path().join("q.fasta");
        fs::write(&fasta, ">q\nGGG\n").unwrap();
        let err = settings.search(&fasta, dir.path()).unwrap_err();
        assert!(matches!(err, ToolError::Launch { .. }));
    }
}
