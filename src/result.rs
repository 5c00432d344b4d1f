use crate::hash::Digest;
use serde::Serialize;

/// Outcome of hashing one input, as printed by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct HashReport {
    /// File path, `-` for stdin, or `<text>`
    pub source: String,
    pub message_bytes: u64,
    pub blocks: u64,
    pub digest: Digest,
    /// Seed used instead of the standard initial hash, hex encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    pub threaded: bool,
    pub elapsed_secs: f64,
}

impl std::fmt::Display for HashReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {}", self.digest, self.source)
    }
}

impl HashReport {
    /// Multi-line form for `--verbose` runs
    pub fn detailed(&self) -> String {
        let mut s = format!(
            r#"Source:   {}
Bytes:    {}
Blocks:   {}
Mode:     {}
Elapsed:  {:.6}s"#,
            self.source,
            self.message_bytes,
            self.blocks,
            if self.threaded { "pipeline" } else { "inline" },
            self.elapsed_secs
        );
        if let Some(seed) = &self.seed {
            s.push_str(&format!("\nSeed:     {}", seed));
        }
        s.push_str(&format!("\nSHA-256:  {}", self.digest));
        s
    }
}
