//! Schema search: locate a record across an ordered set of candidate
//! schemas when its home schema is unknown. Absent schemas are skipped
//! silently, empty searches continue to the next candidate, search errors
//! are logged and skipped; the interactive fallback runs only after total
//! exhaustion.

use crate::error::ExportError;
use crate::policy::DecisionPolicy;
use crate::schema::SchemaCatalog;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use std::future::Future;
use tracing::warn;

/// Default candidate order when no preferred schema resolves.
pub const DEFAULT_SCHEMAS: [&str; 2] = ["file_schema", "public"];

/// Directory of existing schemas. Backed by the live catalog in production;
/// mockable for tests.
#[async_trait]
pub trait SchemaDirectory: Send + Sync {
    async fn schema_exists(&self, name: &str) -> Result<bool, ExportError>;
    async fn list_schemas(&self) -> Result<Vec<String>, ExportError>;
}

#[async_trait]
impl SchemaDirectory for PgPool {
    async fn schema_exists(&self, name: &str) -> Result<bool, ExportError> {
        SchemaCatalog::schema_exists(self, name).await
    }

    async fn list_schemas(&self) -> Result<Vec<String>, ExportError> {
        SchemaCatalog::list_schemas(self).await
    }
}

/// Search result plus the schema it was found in (to be persisted as the
/// new preferred schema by the caller). `(None, None)` means exhaustion
/// without an interactive choice.
pub type Found<T> = (Option<T>, Option<String>);

pub async fn find_in_schemas<T, D, P, F, Fut>(
    directory: &D,
    policy: &P,
    preferred: Option<&str>,
    search: F,
) -> Result<Found<T>, ExportError>
where
    D: SchemaDirectory,
    P: DecisionPolicy + ?Sized,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Option<T>, ExportError>>,
{
    let mut tried: HashSet<String> = HashSet::new();

    let mut candidates: Vec<&str> = Vec::new();
    if let Some(p) = preferred {
        candidates.push(p);
    }
    candidates.extend(DEFAULT_SCHEMAS);

    for schema in candidates {
        if !tried.insert(schema.to_string()) {
            continue;
        }
        if !directory.schema_exists(schema).await? {
            continue;
        }
        match search(schema.to_string()).await {
            Ok(Some(found)) => return Ok((Some(found), Some(schema.to_string()))),
            Ok(None) => continue,
            Err(e) => {
                warn!(schema, error = %e, "search failed in candidate schema");
                continue;
            }
        }
    }

    // Exhausted: hand the decision to the interactive collaborator.
    let all: Vec<String> = directory
        .list_schemas()
        .await?
        .into_iter()
        .filter(|s| !tried.contains(s))
        .collect();
    if all.is_empty() {
        return Ok((None, None));
    }
    let Some(chosen) = policy.choose_schema(&all).await else {
        return Ok((None, None));
    };
    match search(chosen.clone()).await {
        Ok(result) => Ok((result, Some(chosen))),
        Err(e) => {
            warn!(schema = chosen.as_str(), error = %e, "search failed in chosen schema");
            Ok((None, Some(chosen)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedDirectory {
        existing: Vec<String>,
    }

    #[async_trait]
    impl SchemaDirectory for FixedDirectory {
        async fn schema_exists(&self, name: &str) -> Result<bool, ExportError> {
            Ok(self.existing.iter().any(|s| s == name))
        }

        async fn list_schemas(&self) -> Result<Vec<String>, ExportError> {
            Ok(self.existing.clone())
        }
    }

    struct ChoosingPolicy {
        choice: Option<String>,
        invocations: AtomicUsize,
    }

    #[async_trait]
    impl DecisionPolicy for ChoosingPolicy {
        async fn confirm(&self, _q: &str) -> bool {
            false
        }

        async fn choose_schema(&self, _candidates: &[String]) -> Option<String> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            self.choice.clone()
        }
    }

    #[tokio::test]
    async fn nonexistent_preferred_falls_through_then_asks() {
        let directory = FixedDirectory { existing: vec!["gis".into(), "public".into()] };
        let policy =
            ChoosingPolicy { choice: Some("gis".into()), invocations: AtomicUsize::new(0) };
        let searched = Mutex::new(Vec::new());

        let (result, schema) = find_in_schemas(&directory, &policy, Some("file_schema"), |s| {
            searched.lock().unwrap().push(s.clone());
            async move { Ok(if s == "gis" { Some(42) } else { None }) }
        })
        .await
        .unwrap();

        // "file_schema" was preferred AND first default, tried zero times
        // (absent); "public" exists but finds nothing; only then the policy.
        assert_eq!(*searched.lock().unwrap(), ["public", "gis"]);
        assert_eq!(policy.invocations.load(Ordering::SeqCst), 1);
        assert_eq!(result, Some(42));
        assert_eq!(schema.as_deref(), Some("gis"));
    }

    #[tokio::test]
    async fn found_in_preferred_short_circuits() {
        let directory =
            FixedDirectory { existing: vec!["drawings".into(), "public".into()] };
        let policy = ChoosingPolicy { choice: None, invocations: AtomicUsize::new(0) };

        let (result, schema) = find_in_schemas(&directory, &policy, Some("drawings"), |s| {
            async move { Ok(if s == "drawings" { Some("hit") } else { None }) }
        })
        .await
        .unwrap();

        assert_eq!(result, Some("hit"));
        assert_eq!(schema.as_deref(), Some("drawings"));
        assert_eq!(policy.invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn search_error_continues_to_next_candidate() {
        let directory =
            FixedDirectory { existing: vec!["file_schema".into(), "public".into()] };
        let policy = ChoosingPolicy { choice: None, invocations: AtomicUsize::new(0) };

        let (result, schema) = find_in_schemas(&directory, &policy, None, |s| async move {
            if s == "file_schema" {
                Err(ExportError::Config("boom".into()))
            } else {
                Ok(Some(1))
            }
        })
        .await
        .unwrap();

        assert_eq!(result, Some(1));
        assert_eq!(schema.as_deref(), Some("public"));
    }

    #[tokio::test]
    async fn exhaustion_without_choice_returns_none_none() {
        let directory = FixedDirectory { existing: vec!["public".into()] };
        let policy = ChoosingPolicy { choice: None, invocations: AtomicUsize::new(0) };

        let (result, schema): Found<i32> =
            find_in_schemas(&directory, &policy, None, |_| async move { Ok(None) })
                .await
                .unwrap();

        assert_eq!(result, None);
        assert_eq!(schema, None);
    }
}
