//! Syntestify Storage Layer
//!
//! Implements the `TestCaseStore` trait over SQLite.
//!
//! # Architecture
//!
//! - One SQLite connection per store; callers share a store behind a mutex
//! - Schema in `schema.sql`, applied idempotently on open
//! - Batch test-case insert runs in an immediate transaction and skips rows
//!   whose trimmed content already exists for the requirement, so two
//!   concurrent generate requests cannot both land the same content
//!
//! # Examples
//!
//! ```no_run
//! use syntestify_store::SqliteStore;
//!
//! let store = SqliteStore::new("syntestify.db").unwrap();
//! // Store is now ready for project/requirement/test-case operations
//! ```

#![warn(missing_docs)]

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use syntestify_domain::traits::TestCaseStore;
use syntestify_domain::{
    Project, ProjectId, Requirement, RequirementId, TestCase, TestCaseId, TestCaseKind,
};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of `TestCaseStore`
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe; share a store behind
/// `Arc<Mutex<SqliteStore>>`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory store (useful for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Apply the schema; safe to run on an already-initialized database
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn parse_kind(s: &str) -> Result<TestCaseKind, rusqlite::Error> {
        TestCaseKind::parse(s).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                format!("unknown test case kind: {}", s).into(),
            )
        })
    }

    fn parse_id<T: std::str::FromStr>(s: &str, column: usize) -> Result<T, rusqlite::Error>
    where
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        s.parse().map_err(|e: T::Err| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
    }

    fn row_to_project(row: &rusqlite::Row<'_>) -> Result<Project, rusqlite::Error> {
        let id: String = row.get(0)?;
        Ok(Project {
            id: Self::parse_id(&id, 0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            created_at: row.get::<_, i64>(3)? as u64,
        })
    }

    fn row_to_requirement(row: &rusqlite::Row<'_>) -> Result<Requirement, rusqlite::Error> {
        let id: String = row.get(0)?;
        let project_id: String = row.get(1)?;
        Ok(Requirement {
            id: Self::parse_id(&id, 0)?,
            project_id: Self::parse_id(&project_id, 1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            created_at: row.get::<_, i64>(4)? as u64,
        })
    }

    fn row_to_test_case(row: &rusqlite::Row<'_>) -> Result<TestCase, rusqlite::Error> {
        let id: String = row.get(0)?;
        let requirement_id: String = row.get(1)?;
        let kind: String = row.get(3)?;
        Ok(TestCase {
            id: Self::parse_id(&id, 0)?,
            requirement_id: Self::parse_id(&requirement_id, 1)?,
            content: row.get(2)?,
            kind: Self::parse_kind(&kind)?,
            created_at: row.get::<_, i64>(4)? as u64,
        })
    }
}

impl TestCaseStore for SqliteStore {
    type Error = StoreError;

    fn create_project(&mut self, project: Project) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO projects (id, title, description, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                project.id.to_string(),
                &project.title,
                &project.description,
                project.created_at as i64,
            ],
        )?;
        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> Result<Option<Project>, Self::Error> {
        let project = self
            .conn
            .query_row(
                "SELECT id, title, description, created_at FROM projects WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_project,
            )
            .optional()?;
        Ok(project)
    }

    fn list_projects(&self) -> Result<Vec<Project>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, created_at FROM projects
             ORDER BY created_at ASC, id ASC",
        )?;
        let projects = stmt
            .query_map([], Self::row_to_project)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    fn delete_project(&mut self, id: ProjectId) -> Result<(), Self::Error> {
        self.conn.execute(
            "DELETE FROM projects WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }

    fn create_requirement(&mut self, requirement: Requirement) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO requirements (id, project_id, title, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                requirement.id.to_string(),
                requirement.project_id.to_string(),
                &requirement.title,
                &requirement.description,
                requirement.created_at as i64,
            ],
        )?;
        Ok(())
    }

    fn get_requirement(&self, id: RequirementId) -> Result<Option<Requirement>, Self::Error> {
        let requirement = self
            .conn
            .query_row(
                "SELECT id, project_id, title, description, created_at
                 FROM requirements WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_requirement,
            )
            .optional()?;
        Ok(requirement)
    }

    fn list_requirements(&self, project: ProjectId) -> Result<Vec<Requirement>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, title, description, created_at
             FROM requirements WHERE project_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let requirements = stmt
            .query_map(params![project.to_string()], Self::row_to_requirement)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(requirements)
    }

    fn update_requirement(
        &mut self,
        id: RequirementId,
        title: &str,
        description: &str,
    ) -> Result<bool, Self::Error> {
        let changed = self.conn.execute(
            "UPDATE requirements SET title = ?2, description = ?3 WHERE id = ?1",
            params![id.to_string(), title, description],
        )?;
        Ok(changed > 0)
    }

    fn delete_requirement(&mut self, id: RequirementId) -> Result<(), Self::Error> {
        self.conn.execute(
            "DELETE FROM requirements WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }

    fn insert_test_cases(
        &mut self,
        requirement: RequirementId,
        contents: &[String],
        kind: TestCaseKind,
    ) -> Result<Vec<TestCase>, Self::Error> {
        // Immediate transaction: the existence re-check and the inserts are
        // one atomic unit, so a concurrent writer cannot land the same
        // trimmed content between the check and the insert.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut inserted = Vec::new();
        {
            let mut existing: std::collections::HashSet<String> = {
                let mut stmt = tx.prepare(
                    "SELECT content FROM test_cases WHERE requirement_id = ?1",
                )?;
                let rows = stmt.query_map(params![requirement.to_string()], |row| {
                    row.get::<_, String>(0)
                })?;
                rows.map(|r| r.map(|c| c.trim().to_string()))
                    .collect::<Result<_, _>>()?
            };

            for content in contents {
                if existing.contains(content.trim()) {
                    continue;
                }
                let test_case = TestCase::new(requirement, content.clone(), kind);
                tx.execute(
                    "INSERT INTO test_cases (id, requirement_id, content, kind, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        test_case.id.to_string(),
                        test_case.requirement_id.to_string(),
                        &test_case.content,
                        test_case.kind.as_str(),
                        test_case.created_at as i64,
                    ],
                )?;
                existing.insert(content.trim().to_string());
                inserted.push(test_case);
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn list_test_cases(&self, requirement: RequirementId) -> Result<Vec<TestCase>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, requirement_id, content, kind, created_at
             FROM test_cases WHERE requirement_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let test_cases = stmt
            .query_map(params![requirement.to_string()], Self::row_to_test_case)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(test_cases)
    }

    fn test_case_contents(&self, requirement: RequirementId) -> Result<Vec<String>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT content FROM test_cases WHERE requirement_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let contents = stmt
            .query_map(params![requirement.to_string()], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contents)
    }

    fn delete_test_case(&mut self, id: TestCaseId) -> Result<(), Self::Error> {
        // Delete-by-filter semantics: an absent id is a no-op, not an error
        self.conn.execute(
            "DELETE FROM test_cases WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }
}
