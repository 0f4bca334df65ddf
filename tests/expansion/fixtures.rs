//! Shared dataset and configuration.

use std::io::Write;

use mirnet::{Dataset, MemoryStore, NetworkConfig};
use tempfile::NamedTempFile;

pub const TP53: u64 = 7157;
pub const TRP53: u64 = 22059;
pub const MDM2: u64 = 4193;
pub const GENEA: u64 = 101;
pub const HUB: u64 = 200;
pub const GENEA_GENEB: u64 = 1_000_000_005;

pub const CONFIG: &str = r#"
symbol_namespace = "hgnc.symbol"

[[tables]]
name = "HPRD"
src = "protein"
tgt = "protein"
release = "9"

[[tables]]
name = "CORUM"
src = "protein"
tgt = "complex"
release = "3"

[polarity]
HPRD = 1
"#;

pub const DATASET: &str = r#"{
  "namespaces": [
    {"id": 1, "name": "hgnc.symbol", "label": "HGNC symbol"},
    {"id": 2, "name": "uniprot"},
    {"id": 3, "name": "synonym"}
  ],
  "aliases": [
    {"shared_id": 7157, "namespace": 1, "alias": "TP53"},
    {"shared_id": 7157, "namespace": 2, "alias": "P04637"},
    {"shared_id": 7157, "namespace": 3, "alias": "p53"},
    {"shared_id": 22059, "namespace": 1, "alias": "Trp53"},
    {"shared_id": 22059, "namespace": 3, "alias": "p53"},
    {"shared_id": 4193, "namespace": 1, "alias": "MDM2"},
    {"shared_id": 4193, "namespace": 2, "alias": "Q00987"},
    {"shared_id": 101, "namespace": 1, "alias": "GENEA"},
    {"shared_id": 102, "namespace": 1, "alias": "GENEB"},
    {"shared_id": 200, "namespace": 1, "alias": "HUB"}
  ],
  "annotations": [
    {"shared_id": 7157, "symbol": "TP53", "species": 9606, "description": "tumor protein p53"},
    {"shared_id": 22059, "symbol": "Trp53", "species": 10090},
    {"shared_id": 4193, "symbol": "MDM2", "species": 9606},
    {"shared_id": 101, "symbol": "GENEA", "species": 9606},
    {"shared_id": 102, "symbol": "GENEB", "species": 9606},
    {"shared_id": 200, "symbol": "HUB", "species": 9606},
    {"shared_id": 1000000005, "symbol": "GENEA:GENEB", "species": 9606}
  ],
  "taxa": [
    {"taxon": 9606, "names": ["human", "Homo sapiens"]},
    {"taxon": 10090, "names": ["mouse"]}
  ],
  "tables": [
    {"name": "HPRD", "rows": [
      {"source": 7157, "target": 4193, "evidence_ids": "8875929"}
    ]},
    {"name": "CORUM", "rows": [
      {"source": 200, "target": 1000000005, "evidence_ids": "1"},
      {"source": 200, "target": 101, "evidence_ids": "2"}
    ]}
  ]
}"#;

pub fn config() -> NetworkConfig {
    NetworkConfig::from_toml_str(CONFIG).unwrap()
}

pub fn dataset() -> Dataset {
    Dataset::from_json_str(DATASET).unwrap()
}

pub fn store() -> MemoryStore {
    MemoryStore::new(dataset())
}

/// Write `contents` to a temporary file kept alive by the returned handle.
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
