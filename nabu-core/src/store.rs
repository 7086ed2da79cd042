//! The fingerprint store (C6): a persistent keyed map from document-id to
//! its structural fingerprint, backed by a bundled SQLite file.
//!
//! Per the concurrency model (§5), the store is never shared between
//! workers: each caller opens its own [`FingerprintStore`] handle over the
//! same file, and SQLite's own locking makes concurrent `put`s by distinct
//! keys safe and same-key `put`s last-writer-wins.

use std::path::Path;

use md5::{Digest, Md5};
use rusqlite::{Connection, OptionalExtension, params};

use crate::document::ObjectTreeNode;
use crate::error::Result;

/// One row of the fingerprint store: a document's structural fingerprint.
#[derive(Clone, Debug, PartialEq)]
pub struct FingerprintRecord {
    /// Primary key: the document identifier.
    pub document_id: String,
    /// MD5 digest over the canonical vertex list.
    pub vertex_digest: String,
    /// MD5 digest over the canonical edge list; the structural-family key.
    pub edge_digest: String,
    /// Serialized vertex list: `(label, attributes)` pairs, in graph order.
    pub vertices: Vec<(String, Vec<String>)>,
    /// Serialized edge list: `(u, v)` label pairs, in insertion order.
    pub edges: Vec<(String, String)>,
    /// The 35-dimensional NetSimile signature.
    pub signature: Vec<f64>,
}

/// Canonical string form of a vertex list, used to derive [`FingerprintRecord::vertex_digest`].
#[must_use]
pub fn canonical_vertices(vertices: &[(String, Vec<String>)]) -> String {
    let mut out = String::new();
    for (label, attrs) in vertices {
        out.push_str(label);
        out.push('\u{1f}');
        out.push_str(&attrs.join("\u{1f}"));
        out.push('\u{1e}');
    }
    out
}

/// Canonical string form of an edge list, used to derive
/// [`FingerprintRecord::edge_digest`] — the structural-family key.
#[must_use]
pub fn canonical_edges(edges: &[(String, String)]) -> String {
    let mut out = String::new();
    for (u, v) in edges {
        out.push_str(u);
        out.push('\u{1f}');
        out.push_str(v);
        out.push('\u{1e}');
    }
    out
}

/// MD5 digest of `text`, formatted as lowercase hex.
#[must_use]
pub fn digest(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    hasher.finalize().iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Persistent handle over the fingerprint store's SQLite file.
///
/// Not `Send`/shareable across a connection pool by design: each worker
/// opens its own [`FingerprintStore::open`].
pub struct FingerprintStore {
    conn: Connection,
}

impl FingerprintStore {
    /// Open (creating if absent) the fingerprint store at `path`.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] if the file cannot be
    /// opened or the schema cannot be created.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute(
            "create table if not exists fingerprints (
                document_id   text primary key,
                vertex_digest text not null,
                edge_digest   text not null,
                vertices      blob not null,
                edges         blob not null,
                signature     blob not null
            )",
            [],
        )?;
        conn.execute(
            "create index if not exists fingerprints_edge_digest on fingerprints(edge_digest)",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Insert or replace `record`, keyed by its `document_id`.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] on I/O or encoding failure.
    pub fn put(&self, record: &FingerprintRecord) -> Result<()> {
        let vertices_blob = bincode::serialize(&record.vertices).unwrap_or_default();
        let edges_blob = bincode::serialize(&record.edges).unwrap_or_default();
        let signature_blob = bincode::serialize(&record.signature).unwrap_or_default();
        self.conn.execute(
            "insert or replace into fingerprints
                (document_id, vertex_digest, edge_digest, vertices, edges, signature)
             values (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.document_id,
                record.vertex_digest,
                record.edge_digest,
                vertices_blob,
                edges_blob,
                signature_blob,
            ],
        )?;
        Ok(())
    }

    fn row_to_record(
        document_id: String,
        vertex_digest: String,
        edge_digest: String,
        vertices_blob: Vec<u8>,
        edges_blob: Vec<u8>,
        signature_blob: Vec<u8>,
    ) -> FingerprintRecord {
        FingerprintRecord {
            document_id,
            vertex_digest,
            edge_digest,
            vertices: bincode::deserialize(&vertices_blob).unwrap_or_default(),
            edges: bincode::deserialize(&edges_blob).unwrap_or_default(),
            signature: bincode::deserialize(&signature_blob).unwrap_or_default(),
        }
    }

    /// Look up the record stored for `document_id`.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] on I/O failure.
    pub fn get(&self, document_id: &str) -> Result<Option<FingerprintRecord>> {
        let mut stmt = self.conn.prepare(
            "select document_id, vertex_digest, edge_digest, vertices, edges, signature
             from fingerprints where document_id = ?1",
        )?;
        let record = stmt
            .query_row(params![document_id], |row| {
                Ok(Self::row_to_record(
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })
            .optional()?;
        Ok(record)
    }

    /// Distinct edge-digests in the store: the structural-family list.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] on I/O failure.
    pub fn distinct_edge_digests(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("select distinct edge_digest from fingerprints order by edge_digest")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// One representative document-id and signature for the structural
    /// family identified by `edge_digest`.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] on I/O failure.
    pub fn get_family_signature(&self, edge_digest: &str) -> Result<Option<(String, Vec<f64>)>> {
        let mut stmt = self.conn.prepare(
            "select document_id, signature from fingerprints where edge_digest = ?1 limit 1",
        )?;
        let row = stmt
            .query_row(params![edge_digest], |row| {
                let document_id: String = row.get(0)?;
                let signature_blob: Vec<u8> = row.get(1)?;
                Ok((document_id, signature_blob))
            })
            .optional()?;
        Ok(row.map(|(document_id, blob)| (document_id, bincode::deserialize(&blob).unwrap_or_default())))
    }

    /// A stable-ordered slice of `limit` records starting at `offset`, for
    /// partitioned scans across workers.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] on I/O failure.
    pub fn chunk(&self, limit: usize, offset: usize) -> Result<Vec<FingerprintRecord>> {
        let mut stmt = self.conn.prepare(
            "select document_id, vertex_digest, edge_digest, vertices, edges, signature
             from fingerprints order by document_id limit ?1 offset ?2",
        )?;
        let rows = stmt.query_map(params![limit as i64, offset as i64], |row| {
            Ok(Self::row_to_record(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Total number of stored records.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] on I/O failure.
    pub fn size(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("select count(*) from fingerprints", [], |row| row.get(0))?;
        Ok(count.try_into().unwrap_or(0))
    }
}

/// Opt-in store for a document's raw object tree (`--keep-raw-tree`), keyed
/// by document-id. Grounded on the original tool's `storage/dbgw.py` `XmlDb`
/// table, kept out of [`FingerprintStore`] since the hard-core schema (§3)
/// has no tree field: `build` only opens this when the flag is set.
pub struct RawTreeStore {
    conn: Connection,
}

impl RawTreeStore {
    /// Open (creating if absent) the raw-tree store at `path`.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] if the file cannot be
    /// opened or the schema cannot be created.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute(
            "create table if not exists raw_trees (
                document_id text primary key,
                tree        blob not null
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Insert or replace the raw object tree for `document_id`.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] on I/O or encoding failure.
    pub fn put(&self, document_id: &str, tree: &ObjectTreeNode) -> Result<()> {
        let blob = bincode::serialize(tree).unwrap_or_default();
        self.conn.execute(
            "insert or replace into raw_trees (document_id, tree) values (?1, ?2)",
            params![document_id, blob],
        )?;
        Ok(())
    }

    /// Look up the raw object tree stored for `document_id`.
    ///
    /// # Errors
    /// Returns [`crate::error::NabuError::Store`] on I/O failure.
    pub fn get(&self, document_id: &str) -> Result<Option<ObjectTreeNode>> {
        let mut stmt = self
            .conn
            .prepare("select tree from raw_trees where document_id = ?1")?;
        let blob: Option<Vec<u8>> = stmt
            .query_row(params![document_id], |row| row.get(0))
            .optional()?;
        Ok(blob.and_then(|blob| bincode::deserialize(&blob).ok()))
    }
}
