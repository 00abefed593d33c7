//! Input validation for tournament scheduling.
//!
//! Checks structural integrity of the venue rules and the bracket before
//! scheduling. Detects:
//! - Duplicate field names
//! - Fields with a zero slot length
//! - Restrictions naming unknown fields
//! - Bracket references to unknown games, or to the game itself
//! - Circular game dependencies (DAG validation)
//! - Brackets with no first-round game
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::HashSet;

use crate::models::{BracketDefinition, GameNum, Rules};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two fields share the same name.
    DuplicateField,
    /// A field's games take no time.
    ZeroSlotLength,
    /// A restriction names a field that doesn't exist.
    InvalidFieldReference,
    /// A game draws from a game that doesn't exist.
    InvalidGameReference,
    /// A game draws from itself.
    SelfReference,
    /// The game dependency graph contains a cycle.
    CyclicDependency,
    /// No game is seeded directly.
    NoFirstRound,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the venue rules.
///
/// Checks:
/// 1. No duplicate field names
/// 2. Every field has a positive slot length
/// 3. Every field a restriction names exists
pub fn validate_rules(rules: &Rules) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for field in &rules.fields {
        if !names.insert(field.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateField,
                format!("Duplicate field name: {}", field.name),
            ));
        }
        if field.slot_length_minutes == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroSlotLength,
                format!("Field '{}' has a zero slot length", field.name),
            ));
        }
    }

    for restriction in &rules.restrictions {
        for name in restriction.fields.iter().flatten() {
            if !names.contains(name.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidFieldReference,
                    format!("Restriction references unknown field '{name}'"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the bracket layout.
///
/// Checks:
/// 1. Every winner/loser reference points to an existing game
/// 2. No game references itself
/// 3. At least one game is seeded directly
/// 4. No circular dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_bracket(bracket: &BracketDefinition) -> ValidationResult {
    let mut errors = Vec::new();

    for (game_num, game) in bracket.games().iter().enumerate() {
        for required in game.requirements() {
            if required == game_num {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfReference,
                    format!("Game {game_num} draws a team from itself"),
                ));
            } else if bracket.game(required).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidGameReference,
                    format!("Game {game_num} references unknown game {required}"),
                ));
            }
        }
    }

    if !bracket.is_empty() && bracket.get_first_round_games().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoFirstRound,
            "Bracket has no first-round game",
        ));
    }

    if let Some(cycle_err) = detect_cycles(bracket) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the game dependency graph using DFS.
///
/// Edges run from a game to the games it draws from. Self references and
/// unknown games are reported separately and skipped here.
fn detect_cycles(bracket: &BracketDefinition) -> Option<ValidationError> {
    let adj: Vec<Vec<GameNum>> = bracket
        .games()
        .iter()
        .enumerate()
        .map(|(n, g)| {
            g.requirements()
                .into_iter()
                .filter(|r| *r != n && *r < bracket.len())
                .collect()
        })
        .collect();

    let mut visited = vec![false; adj.len()];
    let mut in_stack = vec![false; adj.len()];

    for node in 0..adj.len() {
        if !visited[node] && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving game {node}"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: GameNum,
    adj: &[Vec<GameNum>],
    visited: &mut [bool],
    in_stack: &mut [bool],
) -> bool {
    visited[node] = true;
    in_stack[node] = true;

    for &next in &adj[node] {
        if in_stack[next] {
            return true; // Back edge
        }
        if !visited[next] && has_cycle_dfs(next, adj, visited, in_stack) {
            return true;
        }
    }

    in_stack[node] = false;
    false
}
