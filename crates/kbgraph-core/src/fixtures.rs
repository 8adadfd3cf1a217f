//! Snapshot fixtures for tests.
//!
//! The builder writes through its own connection; the store handed back by
//! [`SnapshotBuilder::into_store`] is query-only like any other.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::config::KnowledgeConfig;
use crate::store::KnowledgeStore;

/// Tables the engine reads. Similarity and neighbor data are plain tables here
/// so tests can pin exact counts; the real snapshot may expose them as views.
pub const SNAPSHOT_SCHEMA: &str = r"
CREATE TABLE commands (
    id TEXT PRIMARY KEY,
    full_path TEXT NOT NULL,
    description TEXT NOT NULL
);
CREATE TABLE flags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    command_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL
);
CREATE TABLE command_resource_links (
    command_id TEXT NOT NULL,
    resource TEXT NOT NULL,
    verb TEXT NOT NULL,
    command_kind TEXT NOT NULL,
    PRIMARY KEY (command_id, resource, verb, command_kind)
);
CREATE TABLE command_filter_paths (
    command_id TEXT NOT NULL,
    resource TEXT NOT NULL,
    flag_name TEXT NOT NULL,
    path TEXT NOT NULL,
    target_resource TEXT NOT NULL,
    target_field TEXT,
    hop_count INTEGER NOT NULL,
    match_kind TEXT NOT NULL,
    modifier TEXT,
    PRIMARY KEY (command_id, flag_name, path)
);
CREATE TABLE resources (
    name TEXT PRIMARY KEY,
    label_fields TEXT,
    server_types TEXT
);
CREATE TABLE resource_fields (
    resource TEXT NOT NULL,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    is_label INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (resource, name)
);
CREATE TABLE resource_field_targets (
    resource TEXT NOT NULL,
    field TEXT NOT NULL,
    target_resource TEXT NOT NULL,
    PRIMARY KEY (resource, field, target_resource)
);
CREATE TABLE summary_resource_targets (
    summary_resource TEXT NOT NULL,
    primary_resource TEXT NOT NULL,
    condition TEXT
);
CREATE TABLE summary_dimensions (
    summary_resource TEXT NOT NULL,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    PRIMARY KEY (summary_resource, name, kind)
);
CREATE TABLE summary_metrics (
    summary_resource TEXT NOT NULL,
    name TEXT NOT NULL,
    PRIMARY KEY (summary_resource, name)
);
CREATE TABLE resource_metapath_similarity (
    source_resource TEXT NOT NULL,
    target_resource TEXT NOT NULL,
    path_kind TEXT NOT NULL,
    shared_features INTEGER NOT NULL
);
CREATE TABLE resource_neighbor_scores (
    source_resource TEXT NOT NULL,
    target_resource TEXT NOT NULL,
    score REAL NOT NULL,
    evidence_count INTEGER NOT NULL,
    relationship_count INTEGER NOT NULL DEFAULT 0,
    summary_count INTEGER NOT NULL DEFAULT 0,
    filter_path_count INTEGER NOT NULL DEFAULT 0,
    shared_command_field_count INTEGER NOT NULL DEFAULT 0,
    shared_summary_dimension_count INTEGER NOT NULL DEFAULT 0,
    shared_summary_metric_count INTEGER NOT NULL DEFAULT 0,
    shared_filter_target_count INTEGER NOT NULL DEFAULT 0
);
";

/// One `command_filter_paths` row.
#[derive(Debug, Clone, Copy)]
pub struct FilterPathSeed<'a> {
    pub command_id: &'a str,
    pub resource: &'a str,
    pub flag: &'a str,
    pub path: &'a str,
    pub target_resource: &'a str,
    pub target_field: Option<&'a str>,
    pub hop_count: i64,
    pub match_kind: &'a str,
    pub modifier: Option<&'a str>,
}

pub struct SnapshotBuilder {
    conn: Connection,
}

impl SnapshotBuilder {
    pub fn in_memory() -> Self {
        Self::with_connection(Connection::open_in_memory().expect("open in-memory snapshot"))
    }

    pub fn at_path(path: impl AsRef<Path>) -> Self {
        Self::with_connection(Connection::open(path).expect("open snapshot file"))
    }

    fn with_connection(conn: Connection) -> Self {
        conn.execute_batch(SNAPSHOT_SCHEMA)
            .expect("create snapshot schema");
        Self { conn }
    }

    pub fn resource(&mut self, name: &str, label_fields: &[&str]) -> &mut Self {
        let labels = serde_json::to_string(label_fields).expect("label json");
        self.exec(
            "INSERT INTO resources(name, label_fields, server_types) VALUES (?1, ?2, '[]')",
            params![name, labels],
        )
    }

    pub fn field(&mut self, resource: &str, name: &str, kind: &str, is_label: bool) -> &mut Self {
        self.exec(
            "INSERT INTO resource_fields(resource, name, kind, is_label) VALUES (?1, ?2, ?3, ?4)",
            params![resource, name, kind, i64::from(is_label)],
        )
    }

    pub fn relationship(&mut self, resource: &str, field: &str, target: &str) -> &mut Self {
        self.exec(
            "INSERT INTO resource_field_targets(resource, field, target_resource) VALUES (?1, ?2, ?3)",
            params![resource, field, target],
        )
    }

    pub fn command(&mut self, id: &str, full_path: &str, description: &str) -> &mut Self {
        self.exec(
            "INSERT INTO commands(id, full_path, description) VALUES (?1, ?2, ?3)",
            params![id, full_path, description],
        )
    }

    pub fn flag(&mut self, command_id: &str, name: &str, description: &str) -> &mut Self {
        self.exec(
            "INSERT INTO flags(command_id, name, description) VALUES (?1, ?2, ?3)",
            params![command_id, name, description],
        )
    }

    pub fn command_link(
        &mut self,
        command_id: &str,
        resource: &str,
        verb: &str,
        command_kind: &str,
    ) -> &mut Self {
        self.exec(
            "INSERT INTO command_resource_links(command_id, resource, verb, command_kind) VALUES (?1, ?2, ?3, ?4)",
            params![command_id, resource, verb, command_kind],
        )
    }

    pub fn summary_target(
        &mut self,
        summary: &str,
        primary: &str,
        condition: Option<&str>,
    ) -> &mut Self {
        self.exec(
            "INSERT INTO summary_resource_targets(summary_resource, primary_resource, condition) VALUES (?1, ?2, ?3)",
            params![summary, primary, condition],
        )
    }

    pub fn summary_dimension(&mut self, summary: &str, name: &str, kind: &str) -> &mut Self {
        self.exec(
            "INSERT INTO summary_dimensions(summary_resource, name, kind) VALUES (?1, ?2, ?3)",
            params![summary, name, kind],
        )
    }

    pub fn summary_metric(&mut self, summary: &str, name: &str) -> &mut Self {
        self.exec(
            "INSERT INTO summary_metrics(summary_resource, name) VALUES (?1, ?2)",
            params![summary, name],
        )
    }

    pub fn filter_path(&mut self, seed: FilterPathSeed<'_>) -> &mut Self {
        self.exec(
            r"
            INSERT INTO command_filter_paths(
                command_id, resource, flag_name, path, target_resource, target_field,
                hop_count, match_kind, modifier
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                seed.command_id,
                seed.resource,
                seed.flag,
                seed.path,
                seed.target_resource,
                seed.target_field,
                seed.hop_count,
                seed.match_kind,
                seed.modifier
            ],
        )
    }

    pub fn metapath(&mut self, source: &str, target: &str, kind: &str, shared: i64) -> &mut Self {
        self.exec(
            "INSERT INTO resource_metapath_similarity(source_resource, target_resource, path_kind, shared_features) VALUES (?1, ?2, ?3, ?4)",
            params![source, target, kind, shared],
        )
    }

    /// Inserts a neighbor score whose evidence is all relationship hops.
    pub fn neighbor(&mut self, source: &str, target: &str, score: f64, relationships: i64) -> &mut Self {
        self.exec(
            r"
            INSERT INTO resource_neighbor_scores(
                source_resource, target_resource, score, evidence_count, relationship_count
            )
            VALUES (?1, ?2, ?3, ?4, ?4)
            ",
            params![source, target, score, relationships],
        )
    }

    fn exec(&mut self, sql: &str, params: impl rusqlite::Params) -> &mut Self {
        self.conn.execute(sql, params).expect("seed snapshot row");
        self
    }

    /// Seeds a small job-tracking catalog shared by most tests.
    pub fn sample() -> Self {
        let mut builder = Self::in_memory();
        builder.seed_sample();
        builder
    }

    pub fn seed_sample(&mut self) -> &mut Self {
        self.resource("customers", &["company-name"])
            .resource("job-sites", &["name"])
            .resource("jobs", &["name"])
            .resource("material-transactions", &[])
            .resource("transport-summaries", &[]);

        self.field("customers", "company-name", "attribute", true)
            .field("job-sites", "name", "attribute", true)
            .field("job-sites", "customer", "relationship", false)
            .field("jobs", "name", "attribute", true)
            .field("jobs", "status", "attribute", false)
            .field("jobs", "customer", "relationship", false)
            .field("jobs", "job-site", "relationship", false);

        self.relationship("jobs", "customer", "customers")
            .relationship("jobs", "job-site", "job-sites")
            .relationship("job-sites", "customer", "customers");

        self.command("c-jobs-list", "view jobs list", "List jobs")
            .command("c-jobs-show", "view jobs show", "Show job details")
            .command("c-sites-list", "view job-sites list", "List job sites")
            .command("c-customers-list", "view customers list", "List customers")
            .command(
                "c-transport-summary",
                "summarize transport-summary create",
                "Create a transport summary",
            );

        self.command_link("c-jobs-list", "jobs", "list", "view")
            .command_link("c-jobs-show", "jobs", "show", "view")
            .command_link("c-sites-list", "job-sites", "list", "view")
            .command_link("c-customers-list", "customers", "list", "view")
            .command_link(
                "c-transport-summary",
                "transport-summaries",
                "create",
                "summarize",
            );

        self.flag("c-jobs-list", "customer", "Filter by customer ID")
            .flag("c-jobs-list", "status", "Filter by job status")
            .flag("c-jobs-list", "job-site", "Filter by job site ID")
            .flag("c-sites-list", "customer", "Filter by customer ID")
            .flag("c-customers-list", "company-name", "Filter by company name");

        self.summary_target("transport-summaries", "material-transactions", None)
            .summary_dimension("transport-summaries", "customer", "relationship")
            .summary_dimension("transport-summaries", "date", "date")
            .summary_metric("transport-summaries", "tons")
            .summary_metric("transport-summaries", "trip-count");

        self.filter_path(FilterPathSeed {
            command_id: "c-jobs-list",
            resource: "jobs",
            flag: "customer",
            path: "jobs.customer",
            target_resource: "customers",
            target_field: None,
            hop_count: 1,
            match_kind: "exact",
            modifier: None,
        })
        .filter_path(FilterPathSeed {
            command_id: "c-jobs-list",
            resource: "jobs",
            flag: "job-site",
            path: "jobs.job-site",
            target_resource: "job-sites",
            target_field: None,
            hop_count: 1,
            match_kind: "exact",
            modifier: None,
        })
        .filter_path(FilterPathSeed {
            command_id: "c-jobs-list",
            resource: "jobs",
            flag: "customer-name",
            path: "jobs.customer.company-name",
            target_resource: "customers",
            target_field: Some("company-name"),
            hop_count: 2,
            match_kind: "substring",
            modifier: None,
        })
        .filter_path(FilterPathSeed {
            command_id: "c-sites-list",
            resource: "job-sites",
            flag: "customer",
            path: "job-sites.customer",
            target_resource: "customers",
            target_field: None,
            hop_count: 1,
            match_kind: "exact",
            modifier: Some("not"),
        });

        self.metapath("customers", "jobs", "command_field", 5)
            .metapath("customers", "jobs", "filter_target", 2)
            .metapath("job-sites", "jobs", "command_field", 5)
            .metapath("job-sites", "jobs", "filter_target", 1)
            .metapath("customers", "job-sites", "command_field", 2)
            .metapath("jobs", "transport-summaries", "summary_dimension", 1);

        self.neighbor("jobs", "customers", 7.5, 2)
            .neighbor("jobs", "job-sites", 9.0, 3)
            .neighbor("jobs", "transport-summaries", 2.5, 1)
            .neighbor("customers", "jobs", 7.5, 2)
    }

    pub fn into_store(self) -> KnowledgeStore {
        KnowledgeStore::from_connection(self.conn, &KnowledgeConfig::default())
            .expect("configure fixture store")
    }

    /// Flushes and closes a file-backed snapshot.
    pub fn finish(self) {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .expect("close snapshot");
    }
}
