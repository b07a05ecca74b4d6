//! Loading task snapshots from disk.
//!
//! Two layouts are accepted:
//! - a JSON array of task records
//! - JSON Lines, one task record per line (blank lines are skipped)
//!
//! Every task is validated and IDs must be unique within the snapshot.

use crate::domain::Task;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

/// Read and validate tasks from a JSON or JSON Lines file.
pub async fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let content = fs::read_to_string(path).await?;
    let tasks = parse_tasks(&content)?;
    tracing::debug!(path = %path.display(), tasks = tasks.len(), "Loaded task snapshot");
    Ok(tasks)
}

/// Parse and validate tasks from JSON array or JSON Lines text.
pub fn parse_tasks(content: &str) -> Result<Vec<Task>> {
    let tasks = if content.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Task>>(content)?
    } else {
        parse_json_lines(content)?
    };

    let mut seen = HashSet::new();
    for task in &tasks {
        task.validate()?;
        if !seen.insert(&task.id) {
            return Err(Error::InvalidTask(format!("duplicate task id '{}'", task.id)));
        }
    }

    Ok(tasks)
}

fn parse_json_lines(content: &str) -> Result<Vec<Task>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<Task>(line).map_err(|e| Error::Parse {
                line: index + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyType, TaskId};
    use tempfile::TempDir;

    #[test]
    fn test_parse_json_array() {
        let content = r#"[
            {"id": "T1", "title": "Setup infrastructure", "complexity": 2},
            {"id": "T2", "title": "Create database schema", "complexity": 3,
             "dependencies": [{"targetTaskId": "T1", "type": "depends_on"}]}
        ]"#;

        let tasks = parse_tasks(content).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].dependencies[0].target_task_id, TaskId::new("T1"));
        assert_eq!(tasks[1].dependencies[0].dep_type, DependencyType::DependsOn);
    }

    #[test]
    fn test_parse_json_lines_skips_blank_lines() {
        let content = "{\"id\": \"T1\", \"title\": \"Setup\", \"complexity\": 2}\n\n   \n{\"id\": \"T2\", \"title\": \"Deploy\", \"complexity\": 4}\n";

        let tasks = parse_tasks(content).unwrap();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2"]);
    }

    #[test]
    fn test_parse_json_lines_reports_line_number() {
        let content = "{\"id\": \"T1\", \"title\": \"Setup\"}\n\n{not json}\n";

        let err = parse_tasks(content).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let content = r#"[{"id": "T1", "title": "a"}, {"id": "T1", "title": "b"}]"#;

        let err = parse_tasks(content).unwrap_err();
        assert!(err.to_string().contains("duplicate task id 'T1'"));
    }

    #[test]
    fn test_parse_rejects_invalid_complexity() {
        let content = r#"[{"id": "T1", "title": "a", "complexity": 11}]"#;
        assert!(matches!(
            parse_tasks(content).unwrap_err(),
            Error::InvalidTask(_)
        ));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_tasks("").unwrap().is_empty());
        assert!(parse_tasks("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_tasks_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        fs::write(&path, r#"[{"id": "T1", "title": "Setup", "complexity": 2}]"#)
            .await
            .unwrap();

        let tasks = load_tasks(&path).await.unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_load_tasks_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_tasks(&temp_dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
