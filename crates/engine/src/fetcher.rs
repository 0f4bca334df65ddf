//! Interaction retrieval for a set of anchor ids.
//!
//! Tables are selected per hook molecule type and role from the derived
//! [`TableIndex`]; every selected table is queried once, on the union of the
//! columns its roles require. Rows are validated into [`InteractionRow`]s but
//! not deduplicated.

use std::collections::{BTreeMap, BTreeSet};

use mirnet_core::{
    AnchorColumns, Evidence, IdClass, InteractionRow, NetError, NetResult, NetworkConfig,
    RawInteraction, ResolvedRestriction, Role, SharedId, TableConfig, TableIndex,
};
use mirnet_store::RecordStore;
use tracing::{debug, warn};

/// Retrieves interaction rows touching a set of anchors.
#[derive(Debug)]
pub struct InteractionFetcher<'c, S> {
    store: S,
    config: &'c NetworkConfig,
    index: TableIndex,
}

impl<'c, S: RecordStore> InteractionFetcher<'c, S> {
    /// Build a fetcher over `store` for the tables in `config`.
    pub fn new(store: S, config: &'c NetworkConfig) -> Self {
        Self {
            store,
            config,
            index: config.table_index(),
        }
    }

    /// Plan which tables to query, and on which columns.
    ///
    /// Returned in configuration order.
    pub fn plan(&self, restrict: &ResolvedRestriction) -> Vec<(&'c TableConfig, AnchorColumns)> {
        let mut columns: BTreeMap<usize, (bool, bool)> = BTreeMap::new();
        for &hook in &restrict.hooks {
            for &role in &restrict.roles {
                for &i in self.index.tables_for(hook, role) {
                    let table = &self.config.tables[i];
                    if !restrict.admits_database(&table.name)
                        || !restrict.admits_pair(table.src, table.tgt)
                    {
                        continue;
                    }
                    let entry = columns.entry(i).or_insert((false, false));
                    match role {
                        Role::Src if restrict.partners.contains(&table.tgt) => entry.0 = true,
                        Role::Tgt if restrict.partners.contains(&table.src) => entry.1 = true,
                        Role::TwoWay => *entry = (true, true),
                        _ => {}
                    }
                }
            }
        }
        columns
            .into_iter()
            .filter_map(|(i, cols)| {
                let anchor = match cols {
                    (true, true) => AnchorColumns::Either,
                    (true, false) => AnchorColumns::Source,
                    (false, true) => AnchorColumns::Target,
                    (false, false) => return None,
                };
                Some((&self.config.tables[i], anchor))
            })
            .collect()
    }

    /// Fetch every interaction touching one of the anchors.
    ///
    /// The unknown-entity sentinel is never used as an anchor. Malformed rows
    /// are logged and skipped; store failures abort.
    pub fn fetch<M>(
        &self,
        anchors: &BTreeMap<SharedId, M>,
        restrict: &ResolvedRestriction,
    ) -> NetResult<Vec<InteractionRow>> {
        let ids: BTreeSet<SharedId> = anchors
            .keys()
            .copied()
            .filter(|id| id.classify(self.config.unknown_entity) != IdClass::UnknownEntity)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        let mut malformed = 0usize;
        for (table, columns) in self.plan(restrict) {
            for raw in self.store.lookup_interactions(&table.name, columns, &ids)? {
                match validate_row(raw, table) {
                    Ok(row) => rows.push(row),
                    Err(e) => {
                        malformed += 1;
                        warn!(target: "mirnet::fetcher", table = %table.name, error = %e, "skipping row");
                    }
                }
            }
        }
        debug!(
            target: "mirnet::fetcher",
            anchors = ids.len(),
            rows = rows.len(),
            malformed,
            "fetched interactions"
        );
        Ok(rows)
    }
}

/// Turn a raw store row into an [`InteractionRow`] of `table`.
pub fn validate_row(raw: RawInteraction, table: &TableConfig) -> NetResult<InteractionRow> {
    let source = raw
        .source
        .ok_or_else(|| NetError::malformed_row(format!("{}: missing source id", table.name)))?;
    let target = raw
        .target
        .ok_or_else(|| NetError::malformed_row(format!("{}: missing target id", table.name)))?;
    Ok(InteractionRow {
        source,
        target,
        source_type: table.src,
        target_type: table.tgt,
        evidence: Evidence {
            database: table.name.clone(),
            release: table.release.clone(),
            reldate: table.reldate.clone(),
            evidence_ids: raw.evidence_ids.unwrap_or_default(),
            source_alias: raw.source_alias,
            target_alias: raw.target_alias,
        },
    })
}
