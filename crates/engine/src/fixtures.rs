//! Small human/mouse dataset shared by the unit tests.

use mirnet_core::{Alias, Annotation, Namespace, NetworkConfig, RawInteraction, SharedId};
use mirnet_store::{Dataset, MemoryStore, TableRows, TaxonNames};

pub const TP53: u64 = 7157;
pub const TRP53: u64 = 22059;
pub const MDM2: u64 = 4193;
pub const CDK4: u64 = 1019;
pub const CCND1: u64 = 595;
pub const MIR21: u64 = 406991;
pub const PTEN: u64 = 5728;
pub const UNKNOWN: u64 = 1_000_000_000;
pub const CDK4_CCND1: u64 = 1_000_000_001;
pub const PTEN_DIMER: u64 = 1_000_000_002;

pub const CONFIG: &str = r#"
[[tables]]
name = "HPRD"
src = "protein"
tgt = "protein"
release = "9"

[[tables]]
name = "miRTarBase"
src = "mirna"
tgt = "protein"
release = "6.1"
"#;

pub fn config() -> NetworkConfig {
    NetworkConfig::from_toml_str(CONFIG).unwrap()
}

fn alias(id: u64, namespace: u32, alias: &str) -> Alias {
    Alias {
        shared_id: SharedId(id),
        namespace,
        alias: alias.to_string(),
    }
}

fn annotation(id: u64, symbol: &str, species: Option<u32>) -> Annotation {
    Annotation {
        shared_id: SharedId(id),
        symbol: symbol.to_string(),
        species,
        description: String::new(),
    }
}

fn row(source: u64, target: u64, evidence: &str) -> RawInteraction {
    RawInteraction {
        source: Some(SharedId(source)),
        target: Some(SharedId(target)),
        evidence_ids: Some(evidence.to_string()),
        ..Default::default()
    }
}

pub fn dataset() -> Dataset {
    let namespaces = ["hgnc.symbol", "uniprot", "mirbase", "synonym"]
        .iter()
        .zip(1..)
        .map(|(name, id)| Namespace {
            id,
            name: name.to_string(),
            label: String::new(),
        })
        .collect();

    Dataset {
        namespaces,
        aliases: vec![
            alias(TP53, 1, "TP53"),
            alias(TP53, 2, "P04637"),
            alias(TP53, 4, "p53"),
            alias(TRP53, 1, "Trp53"),
            alias(TRP53, 4, "p53"),
            alias(MDM2, 1, "MDM2"),
            alias(CDK4, 1, "CDK4"),
            alias(CCND1, 1, "CCND1"),
            alias(MIR21, 1, "MIR21"),
            alias(MIR21, 3, "hsa-miR-21-5p"),
            alias(PTEN, 1, "PTEN"),
        ],
        annotations: vec![
            annotation(TP53, "TP53", Some(9606)),
            annotation(TRP53, "Trp53", Some(10090)),
            annotation(MDM2, "MDM2", Some(9606)),
            annotation(CDK4, "CDK4", Some(9606)),
            annotation(CCND1, "CCND1", Some(9606)),
            annotation(MIR21, "MIR21", Some(9606)),
            annotation(PTEN, "PTEN", Some(9606)),
            annotation(CDK4_CCND1, "CDK4:CCND1", Some(9606)),
            annotation(PTEN_DIMER, "PTEN:PTEN", Some(9606)),
        ],
        taxa: vec![
            TaxonNames {
                taxon: 9606,
                names: vec!["human".to_string(), "Homo sapiens".to_string()],
            },
            TaxonNames {
                taxon: 10090,
                names: vec!["mouse".to_string()],
            },
        ],
        tables: vec![
            TableRows {
                name: "HPRD".to_string(),
                rows: vec![
                    row(TP53, MDM2, "8875929"),
                    row(MDM2, CDK4_CCND1, "1111"),
                    RawInteraction {
                        target: Some(SharedId(MDM2)),
                        ..Default::default()
                    },
                    row(TP53, UNKNOWN, "2222"),
                    row(PTEN, PTEN_DIMER, "3333"),
                ],
            },
            TableRows {
                name: "miRTarBase".to_string(),
                rows: vec![row(MIR21, PTEN, "19573080"), row(MIR21, TP53, "4444")],
            },
        ],
    }
}

pub fn store() -> MemoryStore {
    MemoryStore::new(dataset())
}
