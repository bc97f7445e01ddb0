//! The decrypted task list: `Task` and `Vault`.
//!
//! `Vault` keeps its fields private so the id invariants hold no matter
//! who mutates it:
//!
//! - every task id is positive and unique,
//! - `next_id` is strictly greater than every id ever handed out, so ids
//!   are never reused, even after removal.
//!
//! Deserialization goes through [`VaultPayload`] and rejects any payload
//! that breaks those rules.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TodoVaultError};

/// A single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

/// The payload exactly as it appears inside the ciphertext.
#[derive(Debug, Deserialize)]
struct VaultPayload {
    next_id: u64,
    tasks: Vec<Task>,
}

/// An ordered task list plus its id counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VaultPayload")]
pub struct Vault {
    next_id: u64,
    tasks: Vec<Task>,
}

impl TryFrom<VaultPayload> for Vault {
    type Error = String;

    fn try_from(payload: VaultPayload) -> std::result::Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(payload.tasks.len());
        for task in &payload.tasks {
            if task.id == 0 {
                return Err("task id 0 is not allowed".into());
            }
            if !seen.insert(task.id) {
                return Err(format!("duplicate task id {}", task.id));
            }
            if task.id >= payload.next_id {
                return Err(format!(
                    "next_id {} is not greater than task id {}",
                    payload.next_id, task.id
                ));
            }
            if task.text.trim().is_empty() {
                return Err(format!("task #{} has empty text", task.id));
            }
        }
        if payload.next_id == 0 {
            return Err("next_id must be at least 1".into());
        }

        Ok(Self {
            next_id: payload.next_id,
            tasks: payload.tasks,
        })
    }
}

impl Default for Vault {
    fn default() -> Self {
        Self::empty()
    }
}

impl Vault {
    /// A vault with no tasks whose first id will be 1.
    pub fn empty() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Parse a decrypted payload, enforcing the id invariants.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| TodoVaultError::CorruptData(format!("payload: {e}")))
    }

    /// Serialize to the payload format stored inside the ciphertext.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| TodoVaultError::SerializationError(format!("payload: {e}")))
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Append a new task and return it.
    ///
    /// The text must contain something other than whitespace.
    pub fn add_task(&mut self, text: &str) -> Result<&Task> {
        if text.trim().is_empty() {
            return Err(TodoVaultError::InvalidTask(
                "task text cannot be empty".into(),
            ));
        }

        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| TodoVaultError::InvalidTask("task id space exhausted".into()))?;
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            done: false,
        });

        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Set the `done` flag of a task.
    pub fn set_done(&mut self, id: u64, done: bool) -> Result<()> {
        let task = self
            .get_task_mut(id)
            .ok_or(TodoVaultError::TaskNotFound(id))?;
        task.done = done;
        Ok(())
    }

    /// Flip the `done` flag of a task and return its new value.
    pub fn toggle_task(&mut self, id: u64) -> Result<bool> {
        let task = self
            .get_task_mut(id)
            .ok_or(TodoVaultError::TaskNotFound(id))?;
        task.done = !task.done;
        Ok(task.done)
    }

    /// Remove a task.  Returns `false` if no task had that id.
    pub fn remove_task(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Drop every completed task, keeping the rest in order.
    /// Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.done);
        before - self.tasks.len()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn get_task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Mutable access to a task.  Only `text` and `done` are meant to be
    /// changed; the id must stay as it is.
    pub fn get_task_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The id the next added task will get.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks not yet done.
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.done).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_vault_starts_at_one() {
        let vault = Vault::empty();
        assert_eq!(vault.next_id(), 1);
        assert!(vault.is_empty());
    }

    #[test]
    fn add_assigns_increasing_ids() {
        let mut vault = Vault::empty();
        assert_eq!(vault.add_task("a").unwrap().id, 1);
        assert_eq!(vault.add_task("b").unwrap().id, 2);
        assert_eq!(vault.next_id(), 3);
    }

    #[test]
    fn add_rejects_blank_text() {
        let mut vault = Vault::empty();
        assert!(matches!(
            vault.add_task("   "),
            Err(TodoVaultError::InvalidTask(_))
        ));
        assert_eq!(vault.next_id(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut vault = Vault::empty();
        vault.add_task("a").unwrap();
        vault.add_task("b").unwrap();
        assert!(vault.remove_task(2));
        assert!(!vault.remove_task(2));

        let id = vault.add_task("c").unwrap().id;
        assert_eq!(id, 3);
        assert!(vault.tasks().iter().all(|t| t.id < vault.next_id()));
    }

    #[test]
    fn clear_completed_keeps_pending_order() {
        let mut vault = Vault::empty();
        for text in ["a", "b", "c", "d", "e"] {
            vault.add_task(text).unwrap();
        }
        vault.set_done(2, true).unwrap();
        vault.set_done(4, true).unwrap();

        assert_eq!(vault.clear_completed(), 2);
        let ids: Vec<u64> = vault.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(vault.clear_completed(), 0);
    }

    #[test]
    fn toggle_and_set_done() {
        let mut vault = Vault::empty();
        vault.add_task("a").unwrap();
        assert!(vault.toggle_task(1).unwrap());
        assert!(!vault.toggle_task(1).unwrap());
        vault.set_done(1, true).unwrap();
        assert_eq!(vault.pending_count(), 0);
        assert!(matches!(
            vault.set_done(9, true),
            Err(TodoVaultError::TaskNotFound(9))
        ));
    }

    #[test]
    fn payload_roundtrip_keeps_order() {
        let mut vault = Vault::empty();
        vault.add_task("buy milk").unwrap();
        vault.add_task("walk dog").unwrap();
        vault.set_done(1, true).unwrap();

        let bytes = vault.to_json().unwrap();
        let parsed = Vault::from_json(&bytes).unwrap();
        assert_eq!(parsed, vault);
    }

    #[test]
    fn payload_format_matches_wire_layout() {
        let mut vault = Vault::empty();
        vault.add_task("x").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&vault.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "next_id": 2,
                "tasks": [{ "id": 1, "text": "x", "done": false }]
            })
        );
    }

    #[test]
    fn add_fails_when_ids_are_exhausted() {
        let payload = format!(r#"{{"next_id":{},"tasks":[{{"id":1,"text":"a"}}]}}"#, u64::MAX);
        let mut vault = Vault::from_json(payload.as_bytes()).unwrap();

        assert!(matches!(
            vault.add_task("b"),
            Err(TodoVaultError::InvalidTask(_))
        ));
        assert_eq!(vault.next_id(), u64::MAX);
        assert_eq!(vault.len(), 1);
    }

    #[test]
    fn payload_with_blank_text_is_corrupt() {
        let result = Vault::from_json(br#"{"next_id":2,"tasks":[{"id":1,"text":"  \t"}]}"#);
        assert!(matches!(result, Err(TodoVaultError::CorruptData(_))));
    }

    #[test]
    fn done_defaults_to_false() {
        let vault =
            Vault::from_json(br#"{"next_id":2,"tasks":[{"id":1,"text":"x"}]}"#).unwrap();
        assert!(!vault.tasks()[0].done);
    }

    #[test]
    fn malformed_payloads_are_corrupt() {
        let cases: [&[u8]; 7] = [
            br#"{"tasks":[]}"#,
            br#"{"next_id":3,"tasks":[{"id":"1","text":"x"}]}"#,
            br#"{"next_id":3,"tasks":[{"id":1,"text":"x"},{"id":1,"text":"y"}]}"#,
            br#"{"next_id":2,"tasks":[{"id":2,"text":"x"}]}"#,
            br#"{"next_id":3,"tasks":[{"id":0,"text":"x"}]}"#,
            br#"{"next_id":3,"tasks":[{"id":-1,"text":"x"}]}"#,
            b"not json",
        ];
        for case in cases {
            assert!(
                matches!(Vault::from_json(case), Err(TodoVaultError::CorruptData(_))),
                "expected corrupt data for {}",
                String::from_utf8_lossy(case)
            );
        }
    }
}
