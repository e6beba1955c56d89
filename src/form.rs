//! Live value + error state for one form instance.
//!
//! The error map's keys are always a subset of the value map's keys: both are
//! seeded from the same rule list and only rule fields are ever written.

use std::collections::BTreeMap;

use crate::validate::{Check, FieldRule};

#[derive(Debug, Clone)]
pub struct FormState {
    rules: Vec<FieldRule>,
    values: BTreeMap<&'static str, String>,
    errors: BTreeMap<&'static str, String>,
}

impl FormState {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        let values = rules.iter().map(|r| (r.field, String::new())).collect();
        Self { rules, values, errors: BTreeMap::new() }
    }

    /// Rules in declaration order (the order the front end prompts in).
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Store a new value and optimistically clear that field's error; the
    /// verdict is only recomputed on blur or submit.
    pub fn on_field_change(&mut self, field: &str, value: &str) {
        if let Some(key) = self.key_of(field) {
            self.values.insert(key, value.to_string());
            self.errors.remove(key);
        }
    }

    /// Run the field's rule against its current value and record the verdict.
    pub fn on_field_blur(&mut self, field: &str) {
        let Some(rule) = self.rules.iter().find(|r| r.field == field).copied() else {
            return;
        };
        match self.run_rule(&rule) {
            Some(msg) => self.errors.insert(rule.field, msg),
            None => self.errors.remove(rule.field),
        };
    }

    /// Run every rule, repopulating the error map from scratch.
    /// Returns true iff all fields passed. Field values are never touched.
    pub fn validate_all(&mut self) -> bool {
        let mut errors = BTreeMap::new();
        for rule in &self.rules {
            let peer = match rule.check {
                Check::MatchesField { other, .. } => self.value(other),
                _ => "",
            };
            if let Some(msg) = rule.verdict(self.value(rule.field), peer) {
                errors.insert(rule.field, msg);
            }
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Record a server-side rejection against a specific field.
    pub fn set_server_error(&mut self, field: &str, message: impl Into<String>) {
        if let Some(key) = self.key_of(field) {
            self.errors.insert(key, message.into());
        }
    }

    /// Reset every value to empty and drop all errors (post-success resets).
    pub fn reset(&mut self) {
        for v in self.values.values_mut() {
            v.clear();
        }
        self.errors.clear();
    }

    fn run_rule(&self, rule: &FieldRule) -> Option<String> {
        let peer = match rule.check {
            Check::MatchesField { other, .. } => self.value(other),
            _ => "",
        };
        rule.verdict(self.value(rule.field), peer)
    }

    fn key_of(&self, field: &str) -> Option<&'static str> {
        self.rules.iter().find(|r| r.field == field).map(|r| r.field)
    }
}
